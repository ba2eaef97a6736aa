use const_format::concatcp;

/// The well-known Kubernetes app key prefix.
const K8S_APP_KEY_PREFIX: &str = "app.kubernetes.io/";

/// The key prefix used by the Gardener resource manager.
const RESOURCES_KEY_PREFIX: &str = "resources.gardener.cloud/";

/// The key prefix of the network policy labels understood by Gardener.
const NETWORKING_KEY_PREFIX: &str = "networking.gardener.cloud/";

/// The well-known Kubernetes app name key `app.kubernetes.io/name`.
pub const K8S_APP_NAME_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "name");

/// The well-known Kubernetes app part-of key `app.kubernetes.io/part-of`.
pub const K8S_APP_PART_OF_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "part-of");

/// The well-known namespace name label key `kubernetes.io/metadata.name`, set on every
/// namespace by the API server.
pub const K8S_NAMESPACE_NAME_KEY: &str = "kubernetes.io/metadata.name";

/// Marks a Secret or ConfigMap as eligible for garbage collection once no object references it
/// anymore.
pub const GARBAGE_COLLECTABLE_REFERENCE_KEY: &str =
    concatcp!(RESOURCES_KEY_PREFIX, "garbage-collectable-reference");

/// The prefix of all reference annotation keys, see [`super::references`].
pub const REFERENCE_ANNOTATION_KEY_PREFIX: &str = concatcp!("reference.", RESOURCES_KEY_PREFIX);

/// Selects the high-availability settings the resource manager applies to a Deployment.
pub const HIGH_AVAILABILITY_TYPE_KEY: &str = "high-availability-config.resources.gardener.cloud/type";
pub const HIGH_AVAILABILITY_TYPE_SERVER: &str = "server";

/// Excludes a webhook configuration from remediation by the shoot webhook remediator.
pub const REMEDIATION_WEBHOOK_EXCLUDE_KEY: &str = "remediation.webhook.shoot.gardener.cloud/exclude";

/// Annotation on a Service listing the ports all webhook targets may reach.
pub const FROM_ALL_WEBHOOK_TARGETS_ALLOWED_PORTS_KEY: &str =
    "networking.resources.gardener.cloud/from-all-webhook-targets-allowed-ports";

pub const TO_BLOCKED_CIDRS_KEY: &str = concatcp!(NETWORKING_KEY_PREFIX, "to-blocked-cidrs");
pub const TO_DNS_KEY: &str = concatcp!(NETWORKING_KEY_PREFIX, "to-dns");
pub const TO_PUBLIC_NETWORKS_KEY: &str = concatcp!(NETWORKING_KEY_PREFIX, "to-public-networks");
pub const TO_RUNTIME_APISERVER_KEY: &str = concatcp!(NETWORKING_KEY_PREFIX, "to-runtime-apiserver");

/// The value of all network policy labels.
pub const NETWORKING_ALLOWED: &str = "allowed";

/// The value of boolean labels which are switched on.
pub const LABEL_VALUE_TRUE: &str = "true";
