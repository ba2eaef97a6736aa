use semver::Version;
use snafu::{ResultExt, Snafu, ensure};

type Result<T, E = ParameterError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum ParameterError {
    #[snafu(display("failed to parse Kubernetes version {input:?} as major.minor.patch"))]
    InvalidVersion {
        source: semver::Error,
        input: String,
    },

    #[snafu(display("at least one cosign public key is required"))]
    EmptyKeySet,
}

/// The raw input of a build, as supplied by the caller.
///
/// Use [`ResourceParameters::normalize`] to turn these into [`BuildParameters`], which all
/// resource builders operate on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceParameters {
    /// The namespace the webhook server is deployed to.
    pub namespace: String,

    /// The name of the Secret containing the serving certificate of the webhook server.
    pub server_tls_secret_name: String,

    /// The container image of the webhook server.
    pub image: String,

    /// PEM encoded cosign public keys, in the order they should appear in the Secret.
    pub cosign_public_keys: Vec<String>,

    /// The CA bundle the API server uses to verify the webhook server. This is not validated
    /// and can be empty.
    pub ca_bundle: Vec<u8>,

    pub use_only_image_pull_secrets: bool,
    pub allow_untrusted_images: bool,
    pub allow_insecure_registries: bool,

    /// The Kubernetes version of the target cluster, e.g. `1.27.3` or `v1.27.3`.
    pub kubernetes_version: String,
}

impl ResourceParameters {
    /// Parses the Kubernetes version and checks that at least one public key is present.
    ///
    /// No other field is validated. Empty names or malformed key material end up in the generated
    /// objects as-is and are rejected by the API server when applied.
    pub fn normalize(self) -> Result<BuildParameters> {
        let kubernetes_version = parse_kubernetes_version(&self.kubernetes_version)?;
        ensure!(!self.cosign_public_keys.is_empty(), EmptyKeySetSnafu);

        Ok(BuildParameters {
            namespace: self.namespace,
            server_tls_secret_name: self.server_tls_secret_name,
            image: self.image,
            cosign_public_keys: self.cosign_public_keys,
            ca_bundle: self.ca_bundle,
            use_only_image_pull_secrets: self.use_only_image_pull_secrets,
            allow_untrusted_images: self.allow_untrusted_images,
            allow_insecure_registries: self.allow_insecure_registries,
            kubernetes_version,
        })
    }
}

impl TryFrom<ResourceParameters> for BuildParameters {
    type Error = ParameterError;

    fn try_from(parameters: ResourceParameters) -> Result<Self> {
        parameters.normalize()
    }
}

/// Normalized, immutable input of a build.
///
/// The only way to obtain this is [`ResourceParameters::normalize`], which guarantees that the
/// Kubernetes version is parsed and the public key set is not empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildParameters {
    namespace: String,
    server_tls_secret_name: String,
    image: String,
    cosign_public_keys: Vec<String>,
    ca_bundle: Vec<u8>,
    use_only_image_pull_secrets: bool,
    allow_untrusted_images: bool,
    allow_insecure_registries: bool,
    kubernetes_version: Version,
}

impl BuildParameters {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn server_tls_secret_name(&self) -> &str {
        &self.server_tls_secret_name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// The public keys, never empty.
    pub fn cosign_public_keys(&self) -> &[String] {
        &self.cosign_public_keys
    }

    pub fn ca_bundle(&self) -> &[u8] {
        &self.ca_bundle
    }

    pub fn use_only_image_pull_secrets(&self) -> bool {
        self.use_only_image_pull_secrets
    }

    pub fn allow_untrusted_images(&self) -> bool {
        self.allow_untrusted_images
    }

    pub fn allow_insecure_registries(&self) -> bool {
        self.allow_insecure_registries
    }

    pub fn kubernetes_version(&self) -> &Version {
        &self.kubernetes_version
    }
}

/// Parses a Kubernetes version, tolerating the leading `v` of `kubectl version` and the
/// `/version` endpoint.
fn parse_kubernetes_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    Version::parse(trimmed).context(InvalidVersionSnafu { input })
}
