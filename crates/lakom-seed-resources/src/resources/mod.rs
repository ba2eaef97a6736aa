//! The resource set deploying the Lakom admission webhook into a seed cluster.
//!
//! Every sub-module builds exactly one kind of object from the [`BuildParameters`]. Only
//! [`build_resources`] composes them: the Deployment depends on the name of the cosign public
//! keys Secret, which is derived from its content, so that Secret is built first.
use std::{collections::BTreeMap, io::Write};

use kube::{Resource, ResourceExt};
use serde::Serialize;
use snafu::{ResultExt, Snafu, ensure};
use tracing::instrument;

use crate::{
    BuildParameters, ResourceParameters,
    kvp::ReferenceAnnotation,
    parameters::ParameterError,
    yaml::{self, SerializeOptions},
};

pub mod deployment;
pub mod key;
pub mod pdb;
pub mod rbac;
pub mod secret;
pub mod service;
pub mod service_account;
pub mod vpa;
pub mod webhook;

pub use key::ResourceKey;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid build parameters"))]
    Parameters { source: ParameterError },

    #[snafu(display("failed to serialize resource {key}"))]
    SerializeResource { source: yaml::Error, key: ResourceKey },

    #[snafu(display("resource {key} was generated more than once"))]
    DuplicateResourceKey { key: ResourceKey },

    #[snafu(display("failed to build the pod template of the webhook server"))]
    BuildPodTemplate {
        source: crate::builder::pod::Error,
    },

    #[snafu(display("failed to serialize the allowed ports of the webhook server"))]
    SerializeAllowedPorts { source: serde_json::Error },
}

/// The generated objects of one build, serialized as YAML and keyed by [`ResourceKey`].
///
/// Iteration always happens in key order. Two builds with the same parameters produce equal sets,
/// down to the last byte of every document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceSet {
    resources: BTreeMap<ResourceKey, String>,
}

impl ResourceSet {
    /// Serializes `object` and adds it under its [`ResourceKey`].
    ///
    /// Fails if an object with the same key was added before.
    pub fn add<K>(&mut self, object: &K) -> Result<&mut Self>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        self.add_with_options(object, &SerializeOptions::default())
    }

    /// Like [`Self::add`], but serializes `object` with the given `options`.
    pub fn add_with_options<K>(
        &mut self,
        object: &K,
        options: &SerializeOptions,
    ) -> Result<&mut Self>
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let key = ResourceKey::for_object(object);
        ensure!(
            !self.resources.contains_key(&key),
            DuplicateResourceKeySnafu { key }
        );

        let yaml = yaml::to_canonical_string(object, options).context(SerializeResourceSnafu {
            key: key.clone(),
        })?;

        tracing::debug!(
            resource.key = %key,
            resource.name = object.name_any(),
            bytes = yaml.len(),
            "generated resource"
        );
        self.resources.insert(key, yaml);

        Ok(self)
    }

    /// Returns the YAML document stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.resources.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ResourceKey> {
        self.resources.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &str)> {
        self.resources
            .iter()
            .map(|(key, yaml)| (key, yaml.as_str()))
    }

    /// Writes all documents as a single multi-document YAML stream, each one starting with `---`.
    pub fn write_multi_document<W>(&self, mut writer: W) -> std::io::Result<()>
    where
        W: Write,
    {
        for yaml in self.resources.values() {
            writer.write_all(b"---\n")?;
            writer.write_all(yaml.as_bytes())?;
        }

        writer.flush()
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type IntoIter = std::collections::btree_map::Iter<'a, ResourceKey, String>;
    type Item = (&'a ResourceKey, &'a String);

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Normalizes `parameters` and builds the resource set, see [`build_resources`].
pub fn build_resources_from(parameters: ResourceParameters) -> Result<ResourceSet> {
    let parameters = parameters.normalize().context(ParametersSnafu)?;
    build_resources(&parameters)
}

/// Builds all objects needed to run the Lakom admission webhook in a seed cluster.
///
/// This is a pure function. Nothing is partially returned on failure.
#[instrument(
    skip_all,
    fields(
        namespace = parameters.namespace(),
        kubernetes_version = %parameters.kubernetes_version(),
    )
)]
pub fn build_resources(parameters: &BuildParameters) -> Result<ResourceSet> {
    let secret = secret::cosign_public_keys_secret(parameters);
    let cosign_secret_name = secret.name_any();
    let deployment =
        deployment::deployment(parameters, &cosign_secret_name).context(BuildPodTemplateSnafu)?;

    // The reference annotations are rendered in the order of the referenced Secrets
    let references = deployment::secret_references(parameters, &cosign_secret_name);
    let deployment_options =
        SerializeOptions::with_leading_annotations(references.iter().map(ReferenceAnnotation::key));

    let mut resources = ResourceSet::default();
    resources
        .add(&webhook::validating_webhook_configuration(parameters))?
        .add(&webhook::mutating_webhook_configuration(parameters))?
        .add(&rbac::cluster_role())?
        .add(&rbac::cluster_role_binding(parameters))?
        .add_with_options(&deployment, &deployment_options)?
        .add(&secret)?
        .add(&service::service(parameters).context(SerializeAllowedPortsSnafu)?)?
        .add(&service_account::service_account(parameters))?
        .add(&pdb::pod_disruption_budget(parameters))?
        .add(&vpa::vertical_pod_autoscaler(parameters))?;

    tracing::info!(resources = resources.len(), "built resource set");
    Ok(resources)
}
