use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::{Container, ContainerPort, Probe, ResourceRequirements, VolumeMount},
    apimachinery::pkg::api::resource::Quantity,
};

/// A builder to build [`Container`] objects.
#[derive(Clone, Debug, Default)]
pub struct ContainerBuilder {
    args: Option<Vec<String>>,
    container_ports: Option<Vec<ContainerPort>>,
    image: Option<String>,
    image_pull_policy: Option<String>,
    name: String,
    resources: Option<ResourceRequirements>,
    volume_mounts: Option<Vec<VolumeMount>>,
    readiness_probe: Option<Probe>,
    liveness_probe: Option<Probe>,
}

impl ContainerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.image = Some(image.into());
        self
    }

    pub fn image_pull_policy(&mut self, image_pull_policy: impl Into<String>) -> &mut Self {
        self.image_pull_policy = Some(image_pull_policy.into());
        self
    }

    pub fn args(&mut self, args: Vec<String>) -> &mut Self {
        self.args = Some(args);
        self
    }

    /// Adds a TCP port.
    pub fn add_container_port(&mut self, name: impl Into<String>, port: u16) -> &mut Self {
        self.container_ports
            .get_or_insert_with(Vec::new)
            .push(ContainerPort {
                name: Some(name.into()),
                container_port: port.into(),
                protocol: Some("TCP".to_owned()),
                ..ContainerPort::default()
            });
        self
    }

    /// Sets the resource requests of the container. Limits are left unset.
    pub fn resource_requests<'a>(
        &mut self,
        requests: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> &mut Self {
        let requests: BTreeMap<_, _> = requests
            .into_iter()
            .map(|(resource, quantity)| (resource.to_owned(), Quantity(quantity.to_owned())))
            .collect();

        self.resources = Some(ResourceRequirements {
            requests: Some(requests),
            ..ResourceRequirements::default()
        });
        self
    }

    pub fn add_volume_mount(&mut self, volume_mount: VolumeMount) -> &mut Self {
        self.volume_mounts
            .get_or_insert_with(Vec::new)
            .push(volume_mount);
        self
    }

    pub fn readiness_probe(&mut self, probe: Probe) -> &mut Self {
        self.readiness_probe = Some(probe);
        self
    }

    pub fn liveness_probe(&mut self, probe: Probe) -> &mut Self {
        self.liveness_probe = Some(probe);
        self
    }

    pub fn build(&self) -> Container {
        Container {
            args: self.args.clone(),
            image: self.image.clone(),
            image_pull_policy: self.image_pull_policy.clone(),
            name: self.name.clone(),
            ports: self.container_ports.clone(),
            resources: self.resources.clone(),
            volume_mounts: self.volume_mounts.clone(),
            readiness_probe: self.readiness_probe.clone(),
            liveness_probe: self.liveness_probe.clone(),
            ..Container::default()
        }
    }
}
