use k8s_openapi::{
    api::policy::v1::{PodDisruptionBudget, PodDisruptionBudgetSpec},
    apimachinery::pkg::{
        apis::meta::v1::{LabelSelector, ObjectMeta},
        util::intstr::IntOrString,
    },
};

use crate::kvp::KeyValuePairs;

/// This builder is used to construct [`PodDisruptionBudget`]s.
///
/// The following attributes on a [`PodDisruptionBudget`] are considered mandatory and must be
/// specified before being able to construct the [`PodDisruptionBudget`]:
///
/// 1. [`PodDisruptionBudget::metadata`]
/// 2. [`PodDisruptionBudgetSpec::selector`]
/// 3. [`PodDisruptionBudgetSpec::max_unavailable`]
///
/// The [`PodDisruptionBudgetSpec::unhealthy_pod_eviction_policy`] is optional, as older API
/// servers don't know the field.
#[derive(Debug, Default)]
pub struct PodDisruptionBudgetBuilder<ObjectMeta, LabelSelector, MaxUnavailable> {
    metadata: ObjectMeta,
    selector: LabelSelector,
    max_unavailable: MaxUnavailable,
    unhealthy_pod_eviction_policy: Option<UnhealthyPodEvictionPolicy>,
}

/// Defines when pods which are running but not yet ready may be evicted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum UnhealthyPodEvictionPolicy {
    /// Unhealthy pods are only evicted if the application is not disrupted, i.e. if the budget
    /// is met.
    IfHealthyBudget,

    /// Unhealthy pods may always be evicted, which allows draining nodes hosting pods that will
    /// never become ready.
    AlwaysAllow,
}

impl PodDisruptionBudgetBuilder<(), (), ()> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mandatory [`PodDisruptionBudget::metadata`].
    pub fn new_with_metadata(
        self,
        metadata: impl Into<ObjectMeta>,
    ) -> PodDisruptionBudgetBuilder<ObjectMeta, (), ()> {
        PodDisruptionBudgetBuilder {
            metadata: metadata.into(),
            selector: (),
            max_unavailable: (),
            unhealthy_pod_eviction_policy: self.unhealthy_pod_eviction_policy,
        }
    }
}

impl PodDisruptionBudgetBuilder<ObjectMeta, (), ()> {
    /// Sets the mandatory [`PodDisruptionBudgetSpec::selector`] to select pods with the given
    /// labels.
    pub fn with_selector_labels(
        self,
        labels: KeyValuePairs,
    ) -> PodDisruptionBudgetBuilder<ObjectMeta, LabelSelector, ()> {
        PodDisruptionBudgetBuilder {
            metadata: self.metadata,
            selector: LabelSelector {
                match_expressions: None,
                match_labels: Some(labels),
            },
            max_unavailable: (),
            unhealthy_pod_eviction_policy: self.unhealthy_pod_eviction_policy,
        }
    }
}

impl PodDisruptionBudgetBuilder<ObjectMeta, LabelSelector, ()> {
    /// Sets the mandatory [`PodDisruptionBudgetSpec::max_unavailable`].
    ///
    /// We use u16, as [`IntOrString`] takes an i32 and we don't want to allow negative numbers.
    pub fn with_max_unavailable(
        self,
        max_unavailable: u16,
    ) -> PodDisruptionBudgetBuilder<ObjectMeta, LabelSelector, u16> {
        PodDisruptionBudgetBuilder {
            metadata: self.metadata,
            selector: self.selector,
            max_unavailable,
            unhealthy_pod_eviction_policy: self.unhealthy_pod_eviction_policy,
        }
    }
}

impl<M, S, U> PodDisruptionBudgetBuilder<M, S, U> {
    /// Sets the optional [`PodDisruptionBudgetSpec::unhealthy_pod_eviction_policy`]. Passing
    /// `None` leaves the field unset.
    pub fn with_unhealthy_pod_eviction_policy(
        mut self,
        policy: impl Into<Option<UnhealthyPodEvictionPolicy>>,
    ) -> Self {
        self.unhealthy_pod_eviction_policy = policy.into();
        self
    }
}

impl PodDisruptionBudgetBuilder<ObjectMeta, LabelSelector, u16> {
    /// This function can be called after [`PodDisruptionBudget::metadata`],
    /// [`PodDisruptionBudgetSpec::selector`] and [`PodDisruptionBudgetSpec::max_unavailable`]
    /// are set.
    pub fn build(self) -> PodDisruptionBudget {
        PodDisruptionBudget {
            metadata: self.metadata,
            spec: Some(PodDisruptionBudgetSpec {
                max_unavailable: Some(IntOrString::Int(self.max_unavailable.into())),
                min_available: None,
                selector: Some(self.selector),
                unhealthy_pod_eviction_policy: self
                    .unhealthy_pod_eviction_policy
                    .map(|policy| policy.to_string()),
            }),
            ..Default::default()
        }
    }
}
