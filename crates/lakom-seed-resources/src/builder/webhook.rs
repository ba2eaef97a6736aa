use std::marker::PhantomData;

use k8s_openapi::{
    ByteString,
    api::admissionregistration::v1::{
        MutatingWebhook, MutatingWebhookConfiguration, RuleWithOperations, ServiceReference,
        ValidatingWebhook, ValidatingWebhookConfiguration, WebhookClientConfig,
    },
    apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement, ObjectMeta},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum SideEffects {
    #[default]
    None,
    NoneOnDryRun,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum FailurePolicy {
    #[default]
    Fail,
    Ignore,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum MatchPolicy {
    Exact,
    #[default]
    Equivalent,
}

pub struct WebhookConfiguration;

impl WebhookConfiguration {
    /// Create a validating webhook configuration
    pub fn validating(
        metadata: impl Into<ObjectMeta>,
    ) -> WebhookConfigurationBuilder<ValidatingWebhook, ValidatingWebhookConfiguration> {
        WebhookConfigurationBuilder {
            hooks: PhantomData,
            config: ValidatingWebhookConfiguration {
                metadata: metadata.into(),
                ..Default::default()
            },
        }
    }

    /// Create a mutating webhook configuration
    pub fn mutating(
        metadata: impl Into<ObjectMeta>,
    ) -> WebhookConfigurationBuilder<MutatingWebhook, MutatingWebhookConfiguration> {
        WebhookConfigurationBuilder {
            hooks: PhantomData,
            config: MutatingWebhookConfiguration {
                metadata: metadata.into(),
                ..Default::default()
            },
        }
    }
}

pub trait WebhookConfigurationExt<H> {
    fn webhooks_mut(&mut self) -> &mut Vec<H>;
}

impl WebhookConfigurationExt<ValidatingWebhook> for ValidatingWebhookConfiguration {
    fn webhooks_mut(&mut self) -> &mut Vec<ValidatingWebhook> {
        self.webhooks.get_or_insert_with(Vec::new)
    }
}

impl WebhookConfigurationExt<MutatingWebhook> for MutatingWebhookConfiguration {
    fn webhooks_mut(&mut self) -> &mut Vec<MutatingWebhook> {
        self.webhooks.get_or_insert_with(Vec::new)
    }
}

/// The [`WebhookConfigurationBuilder`] helps to create valid admission webhook
/// configurations. Webhooks can either be [validating][k8s-val] or
/// [mutating][k8s-mut].
///
/// [k8s-val]: https://kubernetes.io/docs/reference/access-authn-authz/admission-controllers/#validatingadmissionwebhook
/// [k8s-mut]: https://kubernetes.io/docs/reference/access-authn-authz/admission-controllers/#mutatingadmissionwebhook
#[derive(Debug)]
pub struct WebhookConfigurationBuilder<H, C>
where
    C: WebhookConfigurationExt<H>,
{
    hooks: PhantomData<H>,
    config: C,
}

impl<H, C> WebhookConfigurationBuilder<H, C>
where
    C: WebhookConfigurationExt<H>,
{
    pub fn add_webhook(&mut self, webhook: impl Into<H>) -> &mut Self {
        self.config.webhooks_mut().push(webhook.into());
        self
    }

    pub fn build(self) -> C {
        self.config
    }
}

/// Builds a single webhook entry. The same builder produces both [`ValidatingWebhook`]s and
/// [`MutatingWebhook`]s, as they share all fields we care about.
#[derive(Clone, Debug)]
pub struct WebhookBuilder {
    name: String,
    client_config: WebhookClientConfig,
    admission_review_versions: Vec<String>,
    failure_policy: FailurePolicy,
    match_policy: MatchPolicy,
    side_effects: SideEffects,
    timeout_seconds: Option<i32>,
    namespace_selector: Option<LabelSelector>,
    rules: Vec<RuleWithOperations>,
}

impl WebhookBuilder {
    /// The only supported AdmissionReview version is `v1`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_config: WebhookClientConfig::default(),
            admission_review_versions: vec!["v1".to_owned()],
            failure_policy: FailurePolicy::default(),
            match_policy: MatchPolicy::default(),
            side_effects: SideEffects::default(),
            timeout_seconds: None,
            namespace_selector: None,
            rules: Vec::new(),
        }
    }

    /// Calls the webhook through the in-cluster Service `namespace/name` at `path`. The API
    /// server verifies the serving certificate with `ca_bundle`, which is passed on as-is.
    pub fn with_service(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        ca_bundle: impl Into<Vec<u8>>,
    ) -> Self {
        self.client_config = WebhookClientConfig {
            ca_bundle: Some(ByteString(ca_bundle.into())),
            service: Some(ServiceReference {
                name: name.into(),
                namespace: namespace.into(),
                path: Some(path.into()),
                port: None,
            }),
            url: None,
        };
        self
    }

    pub fn with_admission_review_versions<'a>(
        mut self,
        versions: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.admission_review_versions = versions.into_iter().map(str::to_owned).collect();
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    pub fn with_side_effects(mut self, side_effects: SideEffects) -> Self {
        self.side_effects = side_effects;
        self
    }

    pub fn with_timeout_seconds(mut self, timeout_seconds: i32) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Skips all namespaces whose label `key` has one of the given `values`.
    pub fn excluding_namespaces_labelled<'a>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.namespace_selector = Some(LabelSelector {
            match_expressions: Some(vec![LabelSelectorRequirement {
                key: key.into(),
                operator: "NotIn".to_owned(),
                values: Some(values.into_iter().map(str::to_owned).collect()),
            }]),
            match_labels: None,
        });
        self
    }

    pub fn add_rule(mut self, rule: RuleWithOperations) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Creates a rule matching the given operations on the given resources.
pub fn rule<'a>(
    api_groups: impl IntoIterator<Item = &'a str>,
    api_versions: impl IntoIterator<Item = &'a str>,
    operations: impl IntoIterator<Item = &'a str>,
    resources: impl IntoIterator<Item = &'a str>,
) -> RuleWithOperations {
    fn owned<'a>(items: impl IntoIterator<Item = &'a str>) -> Option<Vec<String>> {
        Some(items.into_iter().map(str::to_owned).collect())
    }

    RuleWithOperations {
        api_groups: owned(api_groups),
        api_versions: owned(api_versions),
        operations: owned(operations),
        resources: owned(resources),
        scope: None,
    }
}

impl From<WebhookBuilder> for ValidatingWebhook {
    fn from(builder: WebhookBuilder) -> Self {
        Self {
            admission_review_versions: builder.admission_review_versions,
            client_config: builder.client_config,
            failure_policy: Some(builder.failure_policy.to_string()),
            match_policy: Some(builder.match_policy.to_string()),
            name: builder.name,
            namespace_selector: builder.namespace_selector,
            rules: (!builder.rules.is_empty()).then_some(builder.rules),
            side_effects: builder.side_effects.to_string(),
            timeout_seconds: builder.timeout_seconds,
            ..Default::default()
        }
    }
}

impl From<WebhookBuilder> for MutatingWebhook {
    fn from(builder: WebhookBuilder) -> Self {
        Self {
            admission_review_versions: builder.admission_review_versions,
            client_config: builder.client_config,
            failure_policy: Some(builder.failure_policy.to_string()),
            match_policy: Some(builder.match_policy.to_string()),
            name: builder.name,
            namespace_selector: builder.namespace_selector,
            rules: (!builder.rules.is_empty()).then_some(builder.rules),
            side_effects: builder.side_effects.to_string(),
            timeout_seconds: builder.timeout_seconds,
            ..Default::default()
        }
    }
}
