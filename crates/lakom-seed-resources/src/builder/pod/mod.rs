use indexmap::IndexMap;
use k8s_openapi::{
    api::core::v1::{
        Affinity, Container, PodAffinityTerm, PodAntiAffinity, PodSpec, PodTemplateSpec, Volume,
        WeightedPodAffinityTerm,
    },
    apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta},
};
use snafu::{Snafu, ensure};

use crate::kvp::KeyValuePairs;

pub mod container;
pub mod probe;
pub mod volume;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Snafu)]
pub enum Error {
    #[snafu(display(
        "Colliding volume name {colliding_volume_name:?} in volumes with different content"
    ))]
    VolumeNameCollision { colliding_volume_name: String },
}

/// A builder to build [`PodTemplateSpec`] objects.
///
/// Volumes are kept in an [`IndexMap`] to have a consistent ordering (so we don't produce
/// reconcile loops) which still follows the order they were added in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PodBuilder {
    automount_service_account_token: Option<bool>,
    containers: Vec<Container>,
    metadata: Option<ObjectMeta>,
    pod_anti_affinity: Option<PodAntiAffinity>,
    priority_class_name: Option<String>,
    service_account_name: Option<String>,

    /// The key is the volume name.
    volumes: IndexMap<String, Volume>,
}

impl PodBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&mut self, metadata: impl Into<ObjectMeta>) -> &mut Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn service_account_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.service_account_name = Some(value.into());
        self
    }

    /// Sets whether the service account token is mounted into the pod. This takes precedence
    /// over the setting of the ServiceAccount itself.
    pub fn automount_service_account_token(&mut self, automount: bool) -> &mut Self {
        self.automount_service_account_token = Some(automount);
        self
    }

    pub fn priority_class_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.priority_class_name = Some(value.into());
        self
    }

    pub fn pod_anti_affinity(&mut self, anti_affinity: PodAntiAffinity) -> &mut Self {
        self.pod_anti_affinity = Some(anti_affinity);
        self
    }

    /// Prefers spreading pods matching `labels` across nodes, see [`weighted_host_anti_affinity`].
    pub fn prefer_spread_across_hosts(&mut self, labels: KeyValuePairs, weight: i32) -> &mut Self {
        self.pod_anti_affinity(weighted_host_anti_affinity(labels, weight))
    }

    pub fn add_container(&mut self, container: Container) -> &mut Self {
        self.containers.push(container);
        self
    }

    /// Adds a volume. Adding the same volume twice is fine, adding a different volume with the
    /// same name is an error.
    pub fn add_volume(&mut self, volume: Volume) -> Result<&mut Self> {
        if let Some(existing_volume) = self.volumes.get(&volume.name) {
            ensure!(existing_volume == &volume, VolumeNameCollisionSnafu {
                colliding_volume_name: &volume.name,
            });
        } else {
            self.volumes.insert(volume.name.clone(), volume);
        }

        Ok(self)
    }

    pub fn build_template(&self) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: self.metadata.clone(),
            spec: Some(self.build_spec()),
        }
    }

    fn build_spec(&self) -> PodSpec {
        PodSpec {
            affinity: self.pod_anti_affinity.clone().map(|pod_anti_affinity| Affinity {
                pod_anti_affinity: Some(pod_anti_affinity),
                ..Affinity::default()
            }),
            automount_service_account_token: self.automount_service_account_token,
            containers: self.containers.clone(),
            priority_class_name: self.priority_class_name.clone(),
            service_account_name: self.service_account_name.clone(),
            volumes: (!self.volumes.is_empty()).then(|| self.volumes.values().cloned().collect()),
            ..PodSpec::default()
        }
    }
}

/// A soft anti-affinity preferring pods matching `labels` to be placed on different nodes.
pub fn weighted_host_anti_affinity(labels: KeyValuePairs, weight: i32) -> PodAntiAffinity {
    PodAntiAffinity {
        preferred_during_scheduling_ignored_during_execution: Some(vec![
            WeightedPodAffinityTerm {
                pod_affinity_term: PodAffinityTerm {
                    label_selector: Some(LabelSelector {
                        match_expressions: None,
                        match_labels: Some(labels),
                    }),
                    topology_key: crate::constants::HOSTNAME_TOPOLOGY_KEY.to_owned(),
                    ..PodAffinityTerm::default()
                },
                weight,
            },
        ]),
        ..PodAntiAffinity::default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{volume::VolumeBuilder, *};
    use crate::builder::{meta::ObjectMetaBuilder, pod::container::ContainerBuilder};

    #[test]
    fn pod_template_builder() {
        let mut builder = PodBuilder::new();
        builder
            .metadata(ObjectMetaBuilder::new().with_label("app", "lakom").build())
            .service_account_name("lakom")
            .automount_service_account_token(true)
            .priority_class_name("gardener-system-900")
            .add_container(ContainerBuilder::new("lakom").image("lakom").build());
        builder
            .add_volume(VolumeBuilder::new("b").with_secret("b").build())
            .expect("volume names are unique");
        builder
            .add_volume(VolumeBuilder::new("a").with_secret("a").build())
            .expect("volume names are unique");

        let template = builder.build_template();
        let spec = template.spec.expect("spec is set");

        assert_eq!(
            template.metadata.and_then(|metadata| metadata.labels),
            Some(BTreeMap::from([("app".to_owned(), "lakom".to_owned())]))
        );
        assert_eq!(spec.service_account_name.as_deref(), Some("lakom"));
        assert_eq!(spec.automount_service_account_token, Some(true));
        assert_eq!(spec.containers.len(), 1);
        assert!(spec.affinity.is_none());

        let volume_names: Vec<_> = spec
            .volumes
            .expect("volumes are set")
            .into_iter()
            .map(|volume| volume.name)
            .collect();
        assert_eq!(volume_names, ["b", "a"]);
    }

    #[test]
    fn volume_name_collision() {
        let mut builder = PodBuilder::new();
        builder
            .add_volume(VolumeBuilder::new("keys").with_secret("first").build())
            .expect("first volume is accepted");
        builder
            .add_volume(VolumeBuilder::new("keys").with_secret("first").build())
            .expect("identical volumes are accepted");

        let error = builder
            .add_volume(VolumeBuilder::new("keys").with_secret("second").build())
            .unwrap_err();

        assert_eq!(error, Error::VolumeNameCollision {
            colliding_volume_name: "keys".to_owned()
        });
    }

    #[test]
    fn host_anti_affinity() {
        let labels = BTreeMap::from([("app".to_owned(), "lakom".to_owned())]);
        let anti_affinity = weighted_host_anti_affinity(labels.clone(), 100);

        let terms = anti_affinity
            .preferred_during_scheduling_ignored_during_execution
            .expect("preferred terms are set");
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].weight, 100);
        assert_eq!(terms[0].pod_affinity_term.topology_key, "kubernetes.io/hostname");
        assert_eq!(
            terms[0]
                .pod_affinity_term
                .label_selector
                .as_ref()
                .and_then(|selector| selector.match_labels.clone()),
            Some(labels)
        );
        assert!(
            anti_affinity
                .required_during_scheduling_ignored_during_execution
                .is_none()
        );
    }
}
