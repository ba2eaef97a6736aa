use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;

use crate::{
    BuildParameters,
    builder::meta::ObjectMetaBuilder,
    constants::{COSIGN_PUBLIC_KEYS_DATA_KEY, COSIGN_PUBLIC_KEYS_SECRET_BASE_NAME},
    kvp::{self, consts, references::unique_name},
};

/// The immutable Secret holding all cosign public keys in a single data entry.
///
/// The name is derived from the content, so every change of the keys produces a new Secret. The
/// old one is garbage collected once the Deployment no longer references it.
pub fn cosign_public_keys_secret(parameters: &BuildParameters) -> Secret {
    let string_data = BTreeMap::from([(
        COSIGN_PUBLIC_KEYS_DATA_KEY.to_owned(),
        parameters.cosign_public_keys().join("\n"),
    )]);

    Secret {
        metadata: ObjectMetaBuilder::new()
            .name(unique_name(COSIGN_PUBLIC_KEYS_SECRET_BASE_NAME, &string_data))
            .namespace(parameters.namespace())
            .with_labels(kvp::identity_labels_with([(
                consts::GARBAGE_COLLECTABLE_REFERENCE_KEY,
                consts::LABEL_VALUE_TRUE,
            )]))
            .build(),
        immutable: Some(true),
        string_data: Some(string_data),
        type_: Some("Opaque".to_owned()),
        ..Secret::default()
    }
}
