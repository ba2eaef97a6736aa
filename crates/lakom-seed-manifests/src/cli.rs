use std::path::PathBuf;

use clap::Parser;
use lakom_seed_resources::ResourceParameters;
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read cosign public key from {path:?}"))]
    ReadPublicKey {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to read CA bundle from {path:?}"))]
    ReadCaBundle {
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Generates the manifests deploying the Lakom admission webhook into a seed cluster.
#[derive(Debug, PartialEq, Eq, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The namespace the webhook server is deployed to.
    #[arg(long, env = "LAKOM_NAMESPACE", default_value = "kube-system")]
    pub namespace: String,

    /// The container image of the webhook server.
    #[arg(long, env = "LAKOM_IMAGE")]
    pub image: String,

    /// The name of the Secret containing the serving certificate of the webhook server.
    #[arg(long, env = "LAKOM_SERVER_TLS_SECRET_NAME")]
    pub server_tls_secret_name: String,

    /// A file containing a PEM encoded cosign public key. Can be given multiple times, the keys
    /// keep their order.
    #[arg(
        long = "cosign-public-key",
        value_name = "FILE",
        env = "LAKOM_COSIGN_PUBLIC_KEYS",
        value_delimiter = ',',
        required = true
    )]
    pub cosign_public_keys: Vec<PathBuf>,

    /// A file containing the CA bundle the API server uses to verify the webhook server.
    /// Without it, the webhook configurations carry an empty CA bundle.
    #[arg(long, value_name = "FILE", env = "LAKOM_CA_BUNDLE")]
    pub ca_bundle: Option<PathBuf>,

    /// Only use image pull secrets of the pod to access private registries.
    #[arg(long, env = "LAKOM_USE_ONLY_IMAGE_PULL_SECRETS")]
    pub use_only_image_pull_secrets: bool,

    /// Admit pods whose images carry no valid signature.
    #[arg(long, env = "LAKOM_ALLOW_UNTRUSTED_IMAGES")]
    pub allow_untrusted_images: bool,

    /// Allow pulling signatures from registries without TLS.
    #[arg(long, env = "LAKOM_ALLOW_INSECURE_REGISTRIES")]
    pub allow_insecure_registries: bool,

    /// The Kubernetes version of the seed cluster, e.g. `1.30.2`.
    #[arg(long, env = "LAKOM_KUBERNETES_VERSION")]
    pub kubernetes_version: String,

    /// Writes one file per manifest into this directory instead of printing a multi-document
    /// stream to stdout.
    #[arg(long, value_name = "DIR", env = "LAKOM_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    /// Reads all referenced files and assembles the raw build parameters.
    ///
    /// Public keys are taken verbatim, including their trailing newline. Joined with another
    /// newline, consecutive PEM blocks are separated by an empty line.
    pub fn resource_parameters(&self) -> Result<ResourceParameters> {
        let cosign_public_keys = self
            .cosign_public_keys
            .iter()
            .map(|path| std::fs::read_to_string(path).context(ReadPublicKeySnafu { path }))
            .collect::<Result<_>>()?;

        let ca_bundle = match &self.ca_bundle {
            Some(path) => std::fs::read(path).context(ReadCaBundleSnafu { path })?,
            None => Vec::new(),
        };

        Ok(ResourceParameters {
            namespace: self.namespace.clone(),
            server_tls_secret_name: self.server_tls_secret_name.clone(),
            image: self.image.clone(),
            cosign_public_keys,
            ca_bundle,
            use_only_image_pull_secrets: self.use_only_image_pull_secrets,
            allow_untrusted_images: self.allow_untrusted_images,
            allow_insecure_registries: self.allow_insecure_registries,
            kubernetes_version: self.kubernetes_version.clone(),
        })
    }
}
