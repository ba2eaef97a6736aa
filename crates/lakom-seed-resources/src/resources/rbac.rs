use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, PolicyRule, RoleRef, Subject};

use crate::{
    BuildParameters, builder::meta::ObjectMetaBuilder, constants::SEED_RESOURCE_NAME, kvp,
};

/// The webhook server reads image pull secrets of the pods it admits.
pub fn cluster_role() -> ClusterRole {
    ClusterRole {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .with_labels(kvp::identity_labels())
            .build(),
        rules: Some(vec![PolicyRule {
            api_groups: Some(vec![String::new()]),
            resources: Some(vec!["secrets".to_owned()]),
            verbs: vec!["get".to_owned()],
            ..PolicyRule::default()
        }]),
        ..ClusterRole::default()
    }
}

/// Binds the [`cluster_role`] to the ServiceAccount of the webhook server.
pub fn cluster_role_binding(parameters: &BuildParameters) -> ClusterRoleBinding {
    ClusterRoleBinding {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .with_labels(kvp::identity_labels())
            .build(),
        role_ref: RoleRef {
            api_group: "rbac.authorization.k8s.io".to_owned(),
            kind: "ClusterRole".to_owned(),
            name: SEED_RESOURCE_NAME.to_owned(),
        },
        subjects: Some(vec![Subject {
            kind: "ServiceAccount".to_owned(),
            name: SEED_RESOURCE_NAME.to_owned(),
            namespace: Some(parameters.namespace().to_owned()),
            ..Subject::default()
        }]),
    }
}
