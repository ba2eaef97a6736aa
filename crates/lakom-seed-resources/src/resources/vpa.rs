use std::collections::BTreeMap;

use k8s_openapi::{
    api::autoscaling::v1::CrossVersionObjectReference,
    apimachinery::pkg::api::resource::Quantity,
};

use crate::{
    BuildParameters,
    builder::meta::ObjectMetaBuilder,
    constants::{CONTAINER_NAME, SEED_RESOURCE_NAME, VPA_MIN_ALLOWED_MEMORY},
    crd::vpa::{
        ContainerResourcePolicy, PodResourcePolicy, UpdateMode, UpdatePolicy,
        VerticalPodAutoscaler, VerticalPodAutoscalerSpec,
    },
    kvp,
};

/// Scales the memory of the webhook server, see [`super::deployment`].
pub fn vertical_pod_autoscaler(parameters: &BuildParameters) -> VerticalPodAutoscaler {
    VerticalPodAutoscaler {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .namespace(parameters.namespace())
            .with_labels(kvp::identity_labels())
            .build(),
        spec: VerticalPodAutoscalerSpec {
            target_ref: CrossVersionObjectReference {
                api_version: Some("apps/v1".to_owned()),
                kind: "Deployment".to_owned(),
                name: SEED_RESOURCE_NAME.to_owned(),
            },
            update_policy: Some(UpdatePolicy {
                update_mode: Some(UpdateMode::Auto),
            }),
            resource_policy: Some(PodResourcePolicy {
                container_policies: vec![ContainerResourcePolicy {
                    container_name: CONTAINER_NAME.to_owned(),
                    min_allowed: BTreeMap::from([(
                        "memory".to_owned(),
                        Quantity(VPA_MIN_ALLOWED_MEMORY.to_owned()),
                    )]),
                    ..ContainerResourcePolicy::default()
                }],
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use kube::Resource;

    use super::*;
    use crate::resources::tests::parameters;

    #[test]
    fn targets_the_deployment() {
        let vpa = vertical_pod_autoscaler(&parameters());

        assert_eq!(VerticalPodAutoscaler::api_version(&()), "autoscaling.k8s.io/v1");
        assert_eq!(vpa.metadata.namespace.as_deref(), Some("kube-system"));
        assert_eq!(vpa.spec.target_ref.api_version.as_deref(), Some("apps/v1"));
        assert_eq!(vpa.spec.target_ref.kind, "Deployment");
        assert_eq!(vpa.spec.target_ref.name, "extension-shoot-lakom-service-seed");
    }

    #[test]
    fn only_memory_has_a_lower_bound() {
        let vpa = vertical_pod_autoscaler(&parameters());
        let policies = vpa
            .spec
            .resource_policy
            .expect("resource policy is set")
            .container_policies;

        assert_eq!(policies.len(), 1);
        assert_eq!(policies[0].container_name, "lakom-seed");
        assert_eq!(
            policies[0].min_allowed,
            BTreeMap::from([("memory".to_owned(), Quantity("32Mi".to_owned()))])
        );
        assert_eq!(
            vpa.spec.update_policy.and_then(|policy| policy.update_mode),
            Some(UpdateMode::Auto)
        );
    }
}
