//! This crate builds the Kubernetes objects which deploy the Lakom image signature verification
//! webhook into a Gardener seed cluster.
//!
//! The entry point is [`build_resources`], which turns [`BuildParameters`] into a [`ResourceSet`]:
//! ten objects, each serialized as canonical YAML and keyed by a [`ResourceKey`]. Building is
//! pure and deterministic, building twice with the same parameters yields identical output.

pub mod builder;
pub mod constants;
pub mod crd;
pub mod kvp;
pub mod parameters;
pub mod resources;
pub mod version;
pub mod yaml;

// External re-exports
pub use k8s_openapi;
pub use kube;
// Internal re-exports
pub use parameters::{BuildParameters, ParameterError, ResourceParameters};
pub use resources::{
    Error, ResourceKey, ResourceSet, build_resources, build_resources_from,
};
