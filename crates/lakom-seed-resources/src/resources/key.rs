use std::{borrow::Borrow, fmt};

use kube::{Resource, ResourceExt};

/// Separates kind, namespace and name inside a [`ResourceKey`].
const SEPARATOR: &str = "__";

/// Identifies a generated object inside a [`ResourceSet`](super::ResourceSet).
///
/// The key has the form `<kind>__<namespace>__<name>.yaml` with a lowercased kind. Cluster scoped
/// objects leave the namespace empty, which results in `<kind>____<name>.yaml`. Keys are used
/// verbatim as file names, so two objects of the same kind in the same namespace must not share a
/// name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(kind: &str, namespace: Option<&str>, name: &str) -> Self {
        Self(format!(
            "{kind}{SEPARATOR}{namespace}{SEPARATOR}{name}.yaml",
            kind = kind.to_lowercase(),
            namespace = namespace.unwrap_or_default(),
        ))
    }

    /// Derives the key of a typed Kubernetes object from its kind and metadata.
    pub fn for_object<K>(object: &K) -> Self
    where
        K: Resource<DynamicType = ()>,
    {
        Self::new(
            &K::kind(&()),
            object.namespace().as_deref(),
            &object.name_any(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<ResourceKey> for String {
    fn from(key: ResourceKey) -> Self {
        key.0
    }
}
