//! Decisions depending on the Kubernetes version of the target cluster.
use semver::Version;

/// A Kubernetes minor release, compared by `(major, minor)` only.
///
/// Patch levels and pre-release identifiers never change which fields an API server accepts, so
/// `1.26.0-rc.1` and `1.26.9` both count as 1.26.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinorRelease {
    pub major: u64,
    pub minor: u64,
}

impl MinorRelease {
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }
}

impl From<&Version> for MinorRelease {
    fn from(version: &Version) -> Self {
        Self::new(version.major, version.minor)
    }
}

/// `PodDisruptionBudgetSpec.unhealthyPodEvictionPolicy` is enabled by default since 1.26.
pub const UNHEALTHY_POD_EVICTION_POLICY_SINCE: MinorRelease = MinorRelease::new(1, 26);

/// Returns whether the PodDisruptionBudget may carry an `unhealthyPodEvictionPolicy`.
pub fn supports_unhealthy_pod_eviction_policy(version: &Version) -> bool {
    MinorRelease::from(version) >= UNHEALTHY_POD_EVICTION_POLICY_SINCE
}
