use k8s_openapi::api::core::v1::{SecretVolumeSource, Volume, VolumeMount};

/// A builder to build [`Volume`] objects backed by a Secret.
///
/// The Secret name is taken as-is, an empty name results in an invalid volume which the API
/// server rejects.
#[derive(Clone, Debug, Default)]
pub struct VolumeBuilder {
    name: String,
    secret_name: Option<String>,
}

impl VolumeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_secret(&mut self, secret_name: impl Into<String>) -> &mut Self {
        self.secret_name = Some(secret_name.into());
        self
    }

    pub fn build(&self) -> Volume {
        Volume {
            name: self.name.clone(),
            secret: self.secret_name.as_ref().map(|secret_name| SecretVolumeSource {
                secret_name: Some(secret_name.clone()),
                ..SecretVolumeSource::default()
            }),
            ..Volume::default()
        }
    }
}

/// A builder to build [`VolumeMount`] objects.
#[derive(Clone, Debug, Default)]
pub struct VolumeMountBuilder {
    mount_path: String,
    name: String,
    read_only: Option<bool>,
}

impl VolumeMountBuilder {
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>) -> Self {
        Self {
            mount_path: mount_path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn build(&self) -> VolumeMount {
        VolumeMount {
            mount_path: self.mount_path.clone(),
            name: self.name.clone(),
            read_only: self.read_only,
            ..VolumeMount::default()
        }
    }
}
