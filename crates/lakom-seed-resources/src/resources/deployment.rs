use std::time::Duration;

use k8s_openapi::{
    api::{
        apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment},
        core::v1::Container,
    },
    apimachinery::pkg::{apis::meta::v1::LabelSelector, util::intstr::IntOrString},
};

use crate::{
    BuildParameters,
    builder::{
        meta::ObjectMetaBuilder,
        pod::{
            self, PodBuilder,
            container::ContainerBuilder,
            probe::ProbeBuilder,
            volume::{VolumeBuilder, VolumeMountBuilder},
        },
    },
    constants::*,
    kvp::{self, ReferenceAnnotation, consts},
};

/// The Deployment running the webhook server.
///
/// `cosign_secret_name` must be the name of the Secret generated during the same build, see
/// [`super::secret::cosign_public_keys_secret`]. Both the Deployment and its pod template carry
/// a reference annotation for it and for the TLS Secret.
pub fn deployment(
    parameters: &BuildParameters,
    cosign_secret_name: &str,
) -> Result<Deployment, pod::Error> {
    let references = secret_references(parameters, cosign_secret_name);

    let mut pod_builder = PodBuilder::new();
    pod_builder
        .metadata(
            ObjectMetaBuilder::new()
                .with_labels(kvp::identity_labels_with([
                    (consts::TO_BLOCKED_CIDRS_KEY, consts::NETWORKING_ALLOWED),
                    (consts::TO_DNS_KEY, consts::NETWORKING_ALLOWED),
                    (consts::TO_PUBLIC_NETWORKS_KEY, consts::NETWORKING_ALLOWED),
                    (consts::TO_RUNTIME_APISERVER_KEY, consts::NETWORKING_ALLOWED),
                ]))
                .with_references(references.clone())
                .build(),
        )
        .prefer_spread_across_hosts(kvp::identity_labels(), ANTI_AFFINITY_WEIGHT)
        .automount_service_account_token(true)
        .priority_class_name(PRIORITY_CLASS_NAME)
        .service_account_name(SEED_RESOURCE_NAME)
        .add_container(container(parameters));
    pod_builder
        .add_volume(
            VolumeBuilder::new(COSIGN_VOLUME_NAME)
                .with_secret(cosign_secret_name)
                .build(),
        )?
        .add_volume(
            VolumeBuilder::new(TLS_VOLUME_NAME)
                .with_secret(parameters.server_tls_secret_name())
                .build(),
        )?;

    Ok(Deployment {
        metadata: ObjectMetaBuilder::new()
            .name(SEED_RESOURCE_NAME)
            .namespace(parameters.namespace())
            .with_labels(kvp::identity_labels_with([(
                consts::HIGH_AVAILABILITY_TYPE_KEY,
                consts::HIGH_AVAILABILITY_TYPE_SERVER,
            )]))
            .with_references(references)
            .build(),
        spec: Some(DeploymentSpec {
            replicas: Some(REPLICAS),
            revision_history_limit: Some(REVISION_HISTORY_LIMIT),
            selector: LabelSelector {
                match_expressions: None,
                match_labels: Some(kvp::identity_labels()),
            },
            strategy: Some(DeploymentStrategy {
                type_: Some("RollingUpdate".to_owned()),
                rolling_update: Some(RollingUpdateDeployment {
                    max_surge: Some(IntOrString::Int(1)),
                    max_unavailable: Some(IntOrString::Int(0)),
                }),
            }),
            template: pod_builder.build_template(),
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    })
}

/// The reference annotations of the Deployment, cosign public keys first, then the TLS Secret.
pub fn secret_references(
    parameters: &BuildParameters,
    cosign_secret_name: &str,
) -> [ReferenceAnnotation; 2] {
    [
        ReferenceAnnotation::secret(cosign_secret_name),
        ReferenceAnnotation::secret(parameters.server_tls_secret_name()),
    ]
}

fn container(parameters: &BuildParameters) -> Container {
    ContainerBuilder::new(CONTAINER_NAME)
        .image(parameters.image())
        .image_pull_policy(IMAGE_PULL_POLICY)
        .args(args(parameters))
        .add_container_port(SERVER_PORT_NAME, SERVER_PORT)
        .add_container_port(METRICS_PORT_NAME, METRICS_PORT)
        .resource_requests([("cpu", CPU_REQUEST), ("memory", MEMORY_REQUEST)])
        .add_volume_mount(
            VolumeMountBuilder::new(COSIGN_VOLUME_NAME, COSIGN_MOUNT_PATH)
                .read_only(true)
                .build(),
        )
        .add_volume_mount(
            VolumeMountBuilder::new(TLS_VOLUME_NAME, TLS_MOUNT_PATH)
                .read_only(true)
                .build(),
        )
        .liveness_probe(
            ProbeBuilder::default()
                .with_http_get_action_helper(HEALTH_PORT, LIVENESS_PATH)
                .with_initial_delay(Duration::from_secs(LIVENESS_INITIAL_DELAY_SECONDS))
                .build(),
        )
        .readiness_probe(
            ProbeBuilder::default()
                .with_http_get_action_helper(HEALTH_PORT, READINESS_PATH)
                .with_initial_delay(Duration::from_secs(READINESS_INITIAL_DELAY_SECONDS))
                .build(),
        )
        .build()
}

/// The command line of the webhook server. The order is fixed.
fn args(parameters: &BuildParameters) -> Vec<String> {
    vec![
        format!("--cache-ttl={CACHE_TTL}"),
        format!("--cache-refresh-interval={CACHE_REFRESH_INTERVAL}"),
        format!("--cosign-public-key-path={COSIGN_PUBLIC_KEY_PATH}"),
        format!("--tls-cert-dir={TLS_MOUNT_PATH}"),
        format!("--health-bind-address=:{HEALTH_PORT}"),
        format!("--metrics-bind-address=:{METRICS_PORT}"),
        format!("--port={SERVER_PORT}"),
        format!(
            "--use-only-image-pull-secrets={}",
            parameters.use_only_image_pull_secrets()
        ),
        format!(
            "--insecure-allow-untrusted-images={}",
            parameters.allow_untrusted_images()
        ),
        format!(
            "--insecure-allow-insecure-registries={}",
            parameters.allow_insecure_registries()
        ),
    ]
}
