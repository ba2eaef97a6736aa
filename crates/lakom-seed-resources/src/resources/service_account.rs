use k8s_openapi::api::core::v1::ServiceAccount;

use crate::{
    BuildParameters, builder::meta::ObjectMetaBuilder, constants::SEED_RESOURCE_NAME, kvp,
};

/// The ServiceAccount of the webhook server.
///
/// The token is not mounted by default. The Deployment explicitly opts in, see
/// [`super::deployment`].
pub fn service_account(parameters: &BuildParameters) -> ServiceAccount {
    ServiceAccount {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .namespace(parameters.namespace())
            .with_labels(kvp::identity_labels())
            .build(),
        automount_service_account_token: Some(false),
        ..ServiceAccount::default()
    }
}
