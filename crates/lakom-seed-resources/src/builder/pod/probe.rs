use std::time::Duration;

use k8s_openapi::{
    api::core::v1::{HTTPGetAction, Probe},
    apimachinery::pkg::util::intstr::IntOrString,
};

/// Builds a [`Probe`]. Only explicitly configured fields are set, everything else is left to the
/// Kubernetes defaults.
///
/// The action has to be chosen before the probe can be built.
#[derive(Debug)]
pub struct ProbeBuilder<Action> {
    action: Action,
    initial_delay: Option<Duration>,
}

impl Default for ProbeBuilder<()> {
    fn default() -> Self {
        Self {
            action: (),
            initial_delay: None,
        }
    }
}

impl ProbeBuilder<()> {
    /// This probe action does a plain HTTP GET request to `path` on the specified port.
    pub fn with_http_get_action_helper(
        self,
        port: u16,
        path: impl Into<String>,
    ) -> ProbeBuilder<HTTPGetAction> {
        self.with_http_get_action(HTTPGetAction {
            path: Some(path.into()),
            port: IntOrString::Int(port.into()),
            scheme: Some("HTTP".to_owned()),
            ..HTTPGetAction::default()
        })
    }

    /// There is a convenience helper: [`Self::with_http_get_action_helper`].
    pub fn with_http_get_action(self, action: HTTPGetAction) -> ProbeBuilder<HTTPGetAction> {
        let Self {
            action: (),
            initial_delay,
        } = self;

        ProbeBuilder {
            action,
            initial_delay,
        }
    }
}

impl ProbeBuilder<HTTPGetAction> {
    /// How long to wait after container start before the first probe.
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = Some(initial_delay);
        self
    }

    pub fn build(self) -> Probe {
        Probe {
            http_get: Some(self.action),
            initial_delay_seconds: self.initial_delay.map(as_seconds),
            ..Probe::default()
        }
    }
}

/// Whole seconds, saturating at [`i32::MAX`], which is far beyond any sensible probe setting.
fn as_seconds(duration: Duration) -> i32 {
    i32::try_from(duration.as_secs()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_get_probe() {
        let probe = ProbeBuilder::default()
            .with_http_get_action_helper(8081, "/healthz")
            .with_initial_delay(Duration::from_secs(10))
            .build();

        assert_eq!(probe, Probe {
            http_get: Some(HTTPGetAction {
                path: Some("/healthz".to_owned()),
                port: IntOrString::Int(8081),
                scheme: Some("HTTP".to_owned()),
                ..HTTPGetAction::default()
            }),
            initial_delay_seconds: Some(10),
            ..Probe::default()
        });
    }

    #[test]
    fn unset_fields_stay_unset() {
        let probe = ProbeBuilder::default()
            .with_http_get_action_helper(8081, "/readyz")
            .build();

        assert_eq!(probe.initial_delay_seconds, None);
        assert_eq!(probe.period_seconds, None);
        assert_eq!(probe.failure_threshold, None);
        assert_eq!(probe.timeout_seconds, None);
        assert!(probe.tcp_socket.is_none());
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(as_seconds(Duration::from_secs(u64::MAX)), i32::MAX);
    }
}
