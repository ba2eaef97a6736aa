use base64::{Engine, engine::general_purpose::STANDARD};
use k8s_openapi::api::{
    admissionregistration::v1::{MutatingWebhookConfiguration, ValidatingWebhookConfiguration},
    apps::v1::Deployment,
    policy::v1::PodDisruptionBudget,
};
use lakom_seed_resources::{
    ParameterError, ResourceParameters, ResourceSet, build_resources, build_resources_from,
    kvp::references::{KIND_SECRET, annotation_key},
};
use rstest::rstest;

const NAMESPACE: &str = "kube-system";
const IMAGE: &str = "europe-docker.pkg.dev/gardener-project/releases/gardener/extensions/lakom:v0.0.0";
const TLS_SECRET_NAME: &str = "shoot-lakom-service-seed-tls";

const DEPLOYMENT_KEY: &str = "deployment__kube-system__extension-shoot-lakom-service-seed.yaml";
const PDB_KEY: &str = "poddisruptionbudget__kube-system__extension-shoot-lakom-service-seed.yaml";
const VALIDATING_KEY: &str =
    "validatingwebhookconfiguration____gardener-extension-shoot-lakom-service-seed.yaml";
const MUTATING_KEY: &str =
    "mutatingwebhookconfiguration____gardener-extension-shoot-lakom-service-seed.yaml";

fn parameters() -> ResourceParameters {
    ResourceParameters {
        namespace: NAMESPACE.to_owned(),
        server_tls_secret_name: TLS_SECRET_NAME.to_owned(),
        image: IMAGE.to_owned(),
        cosign_public_keys: vec![
            "-----BEGIN PUBLIC KEY-----\nMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE\n-----END PUBLIC KEY-----"
                .to_owned(),
        ],
        ca_bundle: b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n".to_vec(),
        use_only_image_pull_secrets: false,
        allow_untrusted_images: false,
        allow_insecure_registries: false,
        kubernetes_version: "1.27.0".to_owned(),
    }
}

fn build(parameters: ResourceParameters) -> ResourceSet {
    build_resources_from(parameters).expect("parameters are valid")
}

fn secret_name(resources: &ResourceSet) -> String {
    resources
        .keys()
        .find_map(|key| {
            key.as_str()
                .strip_prefix("secret__kube-system__")
                .and_then(|rest| rest.strip_suffix(".yaml"))
        })
        .expect("secret is generated")
        .to_owned()
}

fn deployment(resources: &ResourceSet) -> Deployment {
    serde_yaml::from_str(resources.get(DEPLOYMENT_KEY).expect("deployment is generated"))
        .expect("deployment is valid")
}

fn ca_bundles(resources: &ResourceSet) -> Vec<String> {
    [VALIDATING_KEY, MUTATING_KEY]
        .into_iter()
        .map(|key| {
            let value: serde_yaml::Value =
                serde_yaml::from_str(resources.get(key).expect("webhook is generated"))
                    .expect("webhook is valid YAML");
            value["webhooks"][0]["clientConfig"]["caBundle"]
                .as_str()
                .expect("caBundle is a string")
                .to_owned()
        })
        .collect()
}

#[test]
fn exactly_ten_resources() {
    let resources = build(parameters());
    let secret_key = format!("secret__kube-system__{}.yaml", secret_name(&resources));

    let mut expected = vec![
        "clusterrole____extension-shoot-lakom-service-seed.yaml".to_owned(),
        "clusterrolebinding____extension-shoot-lakom-service-seed.yaml".to_owned(),
        DEPLOYMENT_KEY.to_owned(),
        MUTATING_KEY.to_owned(),
        PDB_KEY.to_owned(),
        secret_key,
        "service__kube-system__extension-shoot-lakom-service-seed.yaml".to_owned(),
        "serviceaccount__kube-system__extension-shoot-lakom-service-seed.yaml".to_owned(),
        VALIDATING_KEY.to_owned(),
        "verticalpodautoscaler__kube-system__extension-shoot-lakom-service-seed.yaml".to_owned(),
    ];
    expected.sort();

    let keys: Vec<_> = resources.keys().map(ToString::to_string).collect();
    assert_eq!(resources.len(), 10);
    assert_eq!(keys, expected);
}

#[test]
fn builds_are_idempotent() {
    let first = build(parameters());
    let second = build(parameters());

    assert_eq!(first, second);
    for ((first_key, first_yaml), (second_key, second_yaml)) in first.iter().zip(second.iter()) {
        assert_eq!(first_key, second_key);
        assert_eq!(first_yaml.as_bytes(), second_yaml.as_bytes());
    }
}

#[test]
fn every_object_carries_identity_labels() {
    let resources = build(parameters());

    for (key, yaml) in &resources {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).expect("resource is valid YAML");
        let labels = &value["metadata"]["labels"];

        assert_eq!(labels["app.kubernetes.io/name"].as_str(), Some("lakom-seed"), "{key}");
        assert_eq!(
            labels["app.kubernetes.io/part-of"].as_str(),
            Some("shoot-lakom-service"),
            "{key}"
        );
    }
}

#[rstest]
#[case("1.25.0", None)]
#[case("1.25.9", None)]
#[case("1.26.0", Some("AlwaysAllow"))]
#[case("1.29.0", Some("AlwaysAllow"))]
#[case("v1.100.0", Some("AlwaysAllow"))]
fn eviction_policy_is_version_gated(#[case] version: &str, #[case] expected: Option<&str>) {
    let resources = build(ResourceParameters {
        kubernetes_version: version.to_owned(),
        ..parameters()
    });

    let yaml = resources.get(PDB_KEY).expect("pdb is generated");
    let pdb: PodDisruptionBudget = serde_yaml::from_str(yaml).expect("pdb is valid");

    assert_eq!(
        pdb.spec
            .expect("spec is set")
            .unhealthy_pod_eviction_policy
            .as_deref(),
        expected
    );
    assert_eq!(yaml.contains("unhealthyPodEvictionPolicy"), expected.is_some());
}

#[rstest]
#[case::use_only_image_pull_secrets(
    ResourceParameters { use_only_image_pull_secrets: true, ..parameters() },
    "--use-only-image-pull-secrets=true"
)]
#[case::allow_untrusted_images(
    ResourceParameters { allow_untrusted_images: true, ..parameters() },
    "--insecure-allow-untrusted-images=true"
)]
#[case::allow_insecure_registries(
    ResourceParameters { allow_insecure_registries: true, ..parameters() },
    "--insecure-allow-insecure-registries=true"
)]
fn flags_are_projected_into_args(#[case] parameters: ResourceParameters, #[case] expected: &str) {
    let deployment = deployment(&build(parameters));
    let args = deployment
        .spec
        .and_then(|spec| spec.template.spec)
        .expect("pod spec is set")
        .containers
        .remove(0)
        .args
        .expect("args are set");

    assert!(args.iter().any(|arg| arg == expected));
    assert_eq!(args.iter().filter(|arg| arg.ends_with("=true")).count(), 1);
    assert_eq!(args.iter().filter(|arg| arg.ends_with("=false")).count(), 2);
}

#[rstest]
#[case::empty(b"")]
#[case::pem(b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n")]
#[case::binary(&[0, 159, 146, 150, 255])]
fn ca_bundle_round_trips(#[case] ca_bundle: &[u8]) {
    let resources = build(ResourceParameters {
        ca_bundle: ca_bundle.to_vec(),
        ..parameters()
    });

    for encoded in ca_bundles(&resources) {
        assert_eq!(encoded, STANDARD.encode(ca_bundle));
        assert_eq!(
            STANDARD.decode(&encoded).expect("caBundle is valid base64"),
            ca_bundle
        );
    }

    let validating: ValidatingWebhookConfiguration =
        serde_yaml::from_str(resources.get(VALIDATING_KEY).expect("webhook is generated"))
            .expect("webhook is valid");
    let mutating: MutatingWebhookConfiguration =
        serde_yaml::from_str(resources.get(MUTATING_KEY).expect("webhook is generated"))
            .expect("webhook is valid");
    for decoded in [
        validating.webhooks.expect("webhooks are set")[0]
            .client_config
            .ca_bundle
            .clone(),
        mutating.webhooks.expect("webhooks are set")[0]
            .client_config
            .ca_bundle
            .clone(),
    ] {
        assert_eq!(
            decoded.map(|bundle| bundle.0).unwrap_or_default(),
            ca_bundle
        );
    }
}

#[test]
fn ca_bundle_only_changes_webhook_configurations() {
    let first = build(ResourceParameters {
        ca_bundle: b"first".to_vec(),
        ..parameters()
    });
    let second = build(ResourceParameters {
        ca_bundle: b"second".to_vec(),
        ..parameters()
    });

    for ((key, first_yaml), (_, second_yaml)) in first.iter().zip(second.iter()) {
        if key.as_str() == VALIDATING_KEY || key.as_str() == MUTATING_KEY {
            let without_ca_bundle = |yaml: &str| {
                let mut value: serde_yaml::Value =
                    serde_yaml::from_str(yaml).expect("webhook is valid YAML");
                value["webhooks"][0]["clientConfig"]["caBundle"] = serde_yaml::Value::Null;
                value
            };

            assert_ne!(first_yaml, second_yaml);
            assert_eq!(without_ca_bundle(first_yaml), without_ca_bundle(second_yaml));
        } else {
            assert_eq!(first_yaml, second_yaml, "{key}");
        }
    }
}

#[rstest]
#[case("")]
#[case("tls")]
#[case("a-very-long-secret-name-which-exceeds-the-sixty-three-characters-of-a-label-name")]
fn deployment_references_secrets(#[case] tls_secret_name: &str) {
    let resources = build(ResourceParameters {
        server_tls_secret_name: tls_secret_name.to_owned(),
        ..parameters()
    });
    let cosign_secret_name = secret_name(&resources);
    let deployment = deployment(&resources);

    let template_annotations = deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.template.metadata.as_ref())
        .and_then(|metadata| metadata.annotations.clone())
        .expect("template annotations are set");
    let annotations = deployment
        .metadata
        .annotations
        .expect("annotations are set");

    for annotations in [annotations, template_annotations] {
        assert_eq!(annotations.len(), 2);
        assert_eq!(
            annotations[&annotation_key(KIND_SECRET, tls_secret_name)],
            tls_secret_name
        );
        assert_eq!(
            annotations[&annotation_key(KIND_SECRET, &cosign_secret_name)],
            cosign_secret_name
        );
    }
}

#[test]
fn secret_name_matches_volume_and_key() {
    let resources = build(parameters());
    let cosign_secret_name = secret_name(&resources);

    let volume_secret_names: Vec<_> = deployment(&resources)
        .spec
        .and_then(|spec| spec.template.spec)
        .and_then(|spec| spec.volumes)
        .expect("volumes are set")
        .into_iter()
        .filter_map(|volume| volume.secret.and_then(|secret| secret.secret_name))
        .collect();

    assert_eq!(volume_secret_names, [
        cosign_secret_name,
        TLS_SECRET_NAME.to_owned()
    ]);
}

#[test]
fn end_to_end() {
    let resources = build(parameters());
    let deployment = deployment(&resources);
    let spec = deployment.spec.expect("spec is set");
    let pod_spec = spec.template.spec.expect("pod spec is set");
    let container = &pod_spec.containers[0];

    assert_eq!(spec.replicas, Some(3));
    assert_eq!(container.image.as_deref(), Some(IMAGE));
    assert!(
        container
            .args
            .as_ref()
            .expect("args are set")
            .contains(&"--use-only-image-pull-secrets=false".to_owned())
    );

    let mount_paths: Vec<_> = container
        .volume_mounts
        .as_ref()
        .expect("volume mounts are set")
        .iter()
        .map(|mount| mount.mount_path.as_str())
        .collect();
    assert_eq!(mount_paths, ["/etc/lakom/cosign", "/etc/lakom/tls"]);
}

#[test]
fn invalid_version_is_rejected() {
    let error = ResourceParameters {
        kubernetes_version: "1.27".to_owned(),
        ..parameters()
    }
    .normalize()
    .unwrap_err();

    assert!(matches!(error, ParameterError::InvalidVersion { input, .. } if input == "1.27"));
}

#[test]
fn empty_key_set_is_rejected() {
    let error = ResourceParameters {
        cosign_public_keys: Vec::new(),
        ..parameters()
    }
    .normalize()
    .unwrap_err();

    assert!(matches!(error, ParameterError::EmptyKeySet));
}

#[test]
fn normalized_parameters_build_the_same_set() {
    let normalized = parameters().normalize().expect("parameters are valid");

    assert_eq!(
        build_resources(&normalized).expect("build succeeds"),
        build(parameters())
    );
}
