use k8s_openapi::api::admissionregistration::v1::{
    MutatingWebhookConfiguration, ValidatingWebhookConfiguration,
};

use crate::{
    BuildParameters,
    builder::{
        meta::ObjectMetaBuilder,
        webhook::{
            FailurePolicy, MatchPolicy, SideEffects, WebhookBuilder, WebhookConfiguration, rule,
        },
    },
    constants::{SEED_RESOURCE_NAME, WEBHOOK_CONFIGURATION_NAME, webhook},
    kvp::{self, consts},
};

/// The configuration of the webhook verifying image signatures of pods.
pub fn validating_webhook_configuration(
    parameters: &BuildParameters,
) -> ValidatingWebhookConfiguration {
    let mut builder = WebhookConfiguration::validating(
        ObjectMetaBuilder::new()
            .name(WEBHOOK_CONFIGURATION_NAME)
            .with_labels(configuration_labels())
            .build(),
    );
    builder.add_webhook(webhook_builder(
        parameters,
        webhook::VALIDATING_WEBHOOK_NAME,
        webhook::VALIDATING_WEBHOOK_PATH,
    ));
    builder.build()
}

/// The configuration of the webhook resolving image tags of pods to digests.
pub fn mutating_webhook_configuration(
    parameters: &BuildParameters,
) -> MutatingWebhookConfiguration {
    let mut builder = WebhookConfiguration::mutating(
        ObjectMetaBuilder::new()
            .name(WEBHOOK_CONFIGURATION_NAME)
            .with_labels(configuration_labels())
            .build(),
    );
    builder.add_webhook(webhook_builder(
        parameters,
        webhook::MUTATING_WEBHOOK_NAME,
        webhook::MUTATING_WEBHOOK_PATH,
    ));
    builder.build()
}

fn configuration_labels() -> kvp::KeyValuePairs {
    kvp::identity_labels_with([(
        consts::REMEDIATION_WEBHOOK_EXCLUDE_KEY,
        consts::LABEL_VALUE_TRUE,
    )])
}

/// Both webhooks only differ in name and path.
fn webhook_builder(parameters: &BuildParameters, name: &str, path: &str) -> WebhookBuilder {
    WebhookBuilder::new(name)
        .with_service(
            parameters.namespace(),
            SEED_RESOURCE_NAME,
            path,
            parameters.ca_bundle(),
        )
        .with_admission_review_versions(webhook::ADMISSION_REVIEW_VERSIONS.iter().copied())
        .with_failure_policy(FailurePolicy::Fail)
        .with_match_policy(MatchPolicy::Equivalent)
        .with_side_effects(SideEffects::None)
        .with_timeout_seconds(webhook::TIMEOUT_SECONDS)
        .excluding_namespaces_labelled(
            consts::K8S_NAMESPACE_NAME_KEY,
            webhook::EXCLUDED_NAMESPACES.iter().copied(),
        )
        .add_rule(rule(
            webhook::RULE_API_GROUPS.iter().copied(),
            webhook::RULE_API_VERSIONS.iter().copied(),
            webhook::RULE_OPERATIONS.iter().copied(),
            webhook::RULE_RESOURCES.iter().copied(),
        ))
}
