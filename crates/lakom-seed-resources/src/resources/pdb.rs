use k8s_openapi::api::policy::v1::PodDisruptionBudget;

use crate::{
    BuildParameters,
    builder::{
        meta::ObjectMetaBuilder,
        pdb::{PodDisruptionBudgetBuilder, UnhealthyPodEvictionPolicy},
    },
    constants::{PDB_MAX_UNAVAILABLE, SEED_RESOURCE_NAME},
    kvp,
    version::supports_unhealthy_pod_eviction_policy,
};

/// Allows a single webhook server pod to be disrupted at a time.
///
/// Clusters which know the field additionally allow evicting pods which never became ready.
pub fn pod_disruption_budget(parameters: &BuildParameters) -> PodDisruptionBudget {
    let eviction_policy =
        supports_unhealthy_pod_eviction_policy(parameters.kubernetes_version())
            .then_some(UnhealthyPodEvictionPolicy::AlwaysAllow);

    PodDisruptionBudgetBuilder::new()
        .new_with_metadata(
            ObjectMetaBuilder::new()
                .name(SEED_RESOURCE_NAME)
                .namespace(parameters.namespace())
                .with_labels(kvp::identity_labels())
                .build(),
        )
        .with_selector_labels(kvp::identity_labels())
        .with_max_unavailable(PDB_MAX_UNAVAILABLE)
        .with_unhealthy_pod_eviction_policy(eviction_policy)
        .build()
}

#[cfg(test)]
mod tests {
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
    use rstest::rstest;

    use super::*;
    use crate::ResourceParameters;

    #[rstest]
    #[case("1.25.0", None)]
    #[case("1.25.9", None)]
    #[case("1.26.0", Some("AlwaysAllow"))]
    #[case("1.29.0", Some("AlwaysAllow"))]
    #[case("1.100.0", Some("AlwaysAllow"))]
    fn eviction_policy_depends_on_version(
        #[case] kubernetes_version: &str,
        #[case] expected: Option<&str>,
    ) {
        let parameters = ResourceParameters {
            cosign_public_keys: vec!["key".to_owned()],
            kubernetes_version: kubernetes_version.to_owned(),
            ..ResourceParameters::default()
        }
        .normalize()
        .expect("parameters are valid");

        let spec = pod_disruption_budget(&parameters)
            .spec
            .expect("spec is set");

        assert_eq!(spec.unhealthy_pod_eviction_policy.as_deref(), expected);
        assert_eq!(spec.max_unavailable, Some(IntOrString::Int(1)));
        assert_eq!(
            spec.selector.and_then(|selector| selector.match_labels),
            Some(kvp::identity_labels())
        );
    }
}
