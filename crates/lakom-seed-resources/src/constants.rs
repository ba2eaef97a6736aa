//! Fixed names, ports, paths and settings shared by all resource builders.
//!
//! None of these values are derived from [`BuildParameters`][crate::BuildParameters]. Keeping
//! them in one place ensures that, for example, the Service name targeted by the webhook
//! configurations always matches the name of the Service that is actually generated.
use const_format::concatcp;

/// The name of the extension this resource set belongs to.
pub const EXTENSION_SERVICE_NAME: &str = "extension-shoot-lakom-service";

/// The name shared by the Deployment, Service, ServiceAccount, PDB, VPA and RBAC objects.
pub const SEED_RESOURCE_NAME: &str = concatcp!(EXTENSION_SERVICE_NAME, "-seed");

/// The name of both admission webhook configurations.
pub const WEBHOOK_CONFIGURATION_NAME: &str = concatcp!("gardener-", SEED_RESOURCE_NAME);

/// The base name of the Secret carrying the cosign public keys. The final name carries an
/// additional content-derived suffix.
pub const COSIGN_PUBLIC_KEYS_SECRET_BASE_NAME: &str =
    concatcp!(SEED_RESOURCE_NAME, "-cosign-public-keys");

/// The data key of the cosign public keys inside the Secret.
pub const COSIGN_PUBLIC_KEYS_DATA_KEY: &str = "cosign.pub";

/// The name of the single container running the webhook server.
pub const CONTAINER_NAME: &str = "lakom-seed";

/// Value of the `app.kubernetes.io/name` label.
pub const APP_NAME: &str = "lakom-seed";

/// Value of the `app.kubernetes.io/part-of` label.
pub const APP_PART_OF: &str = "shoot-lakom-service";

pub const PRIORITY_CLASS_NAME: &str = "gardener-system-900";
pub const IMAGE_PULL_POLICY: &str = "IfNotPresent";

pub const REPLICAS: i32 = 3;
pub const REVISION_HISTORY_LIMIT: i32 = 2;

/// The port the webhook server serves HTTPS on.
pub const SERVER_PORT: u16 = 10250;
pub const SERVER_PORT_NAME: &str = "https";

/// The port the Service exposes the webhook server on.
pub const SERVICE_PORT: u16 = 443;

pub const METRICS_PORT: u16 = 8080;
pub const METRICS_PORT_NAME: &str = "metrics";

/// The port the Service exposes the metrics endpoint on.
pub const SERVICE_METRICS_PORT: u16 = 2718;

/// The port serving both the liveness and readiness endpoints.
pub const HEALTH_PORT: u16 = 8081;
pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";
pub const LIVENESS_INITIAL_DELAY_SECONDS: u64 = 10;
pub const READINESS_INITIAL_DELAY_SECONDS: u64 = 5;

pub const CACHE_TTL: &str = "10m0s";
pub const CACHE_REFRESH_INTERVAL: &str = "30s";

pub const COSIGN_VOLUME_NAME: &str = "lakom-public-keys";
pub const COSIGN_MOUNT_PATH: &str = "/etc/lakom/cosign";
pub const COSIGN_PUBLIC_KEY_PATH: &str =
    concatcp!(COSIGN_MOUNT_PATH, "/", COSIGN_PUBLIC_KEYS_DATA_KEY);

pub const TLS_VOLUME_NAME: &str = "lakom-server-tls";
pub const TLS_MOUNT_PATH: &str = "/etc/lakom/tls";

pub const CPU_REQUEST: &str = "50m";
pub const MEMORY_REQUEST: &str = "64Mi";

/// The lower memory bound the VerticalPodAutoscaler may recommend.
pub const VPA_MIN_ALLOWED_MEMORY: &str = "32Mi";

pub const ANTI_AFFINITY_WEIGHT: i32 = 100;
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

pub const PDB_MAX_UNAVAILABLE: u16 = 1;

/// Admission webhook settings shared by the validating and the mutating configuration.
pub mod webhook {
    pub const VALIDATING_WEBHOOK_NAME: &str =
        "verify-signature.seed.lakom.service.extensions.gardener.cloud";
    pub const VALIDATING_WEBHOOK_PATH: &str = "/lakom/verify-cosign-signature";

    pub const MUTATING_WEBHOOK_NAME: &str =
        "resolve-tag.seed.lakom.service.extensions.gardener.cloud";
    pub const MUTATING_WEBHOOK_PATH: &str = "/lakom/resolve-tag-to-digest";

    pub const ADMISSION_REVIEW_VERSIONS: &[&str] = &["v1"];
    pub const TIMEOUT_SECONDS: i32 = 25;

    /// Namespaces excluded from admission, selected by their name label.
    pub const EXCLUDED_NAMESPACES: &[&str] = &["kube-system"];

    pub const RULE_API_GROUPS: &[&str] = &[""];
    pub const RULE_API_VERSIONS: &[&str] = &["v1"];
    pub const RULE_OPERATIONS: &[&str] = &["CREATE", "UPDATE"];
    pub const RULE_RESOURCES: &[&str] = &["pods", "pods/ephemeralcontainers"];
}
