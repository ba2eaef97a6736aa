use k8s_openapi::{
    api::core::v1::{Service, ServicePort, ServiceSpec},
    apimachinery::pkg::util::intstr::IntOrString,
};
use serde::Serialize;

use crate::{
    BuildParameters,
    builder::meta::ObjectMetaBuilder,
    constants::{
        METRICS_PORT, METRICS_PORT_NAME, SEED_RESOURCE_NAME, SERVER_PORT, SERVER_PORT_NAME,
        SERVICE_METRICS_PORT, SERVICE_PORT,
    },
    kvp::{self, consts},
};

/// An entry of the allowed ports annotation, see
/// [`FROM_ALL_WEBHOOK_TARGETS_ALLOWED_PORTS_KEY`][consts::FROM_ALL_WEBHOOK_TARGETS_ALLOWED_PORTS_KEY].
///
/// Field order matters, the annotation value is compared verbatim.
#[derive(Serialize)]
struct NetworkPolicyPort {
    protocol: &'static str,
    port: u16,
}

/// The Service in front of the webhook server, exposing the webhook and the metrics endpoint.
pub fn service(parameters: &BuildParameters) -> Result<Service, serde_json::Error> {
    let allowed_ports = serde_json::to_string(&[NetworkPolicyPort {
        protocol: "TCP",
        port: SERVER_PORT,
    }])?;

    Ok(Service {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .namespace(parameters.namespace())
            .with_labels(kvp::identity_labels())
            .with_annotation(
                consts::FROM_ALL_WEBHOOK_TARGETS_ALLOWED_PORTS_KEY,
                allowed_ports,
            )
            .build(),
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_owned()),
            selector: Some(kvp::identity_labels()),
            ports: Some(vec![
                service_port(SERVER_PORT_NAME, SERVICE_PORT, SERVER_PORT),
                service_port(METRICS_PORT_NAME, SERVICE_METRICS_PORT, METRICS_PORT),
            ]),
            ..ServiceSpec::default()
        }),
        ..Service::default()
    })
}

fn service_port(name: &str, port: u16, target_port: u16) -> ServicePort {
    ServicePort {
        name: Some(name.to_owned()),
        port: port.into(),
        protocol: Some("TCP".to_owned()),
        target_port: Some(IntOrString::Int(target_port.into())),
        ..ServicePort::default()
    }
}
