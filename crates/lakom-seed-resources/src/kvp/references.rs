//! Reference annotations and content-addressed names.
//!
//! A workload which consumes a Secret through a volume does not get restarted when the Secret
//! changes. Instead, the Secret gets a name derived from its content, so a content change results
//! in a new Secret and a changed volume reference. The consuming object additionally carries a
//! [`ReferenceAnnotation`] per Secret, which tells the garbage collector of the resource manager
//! which Secrets are still in use. Secrets labelled with
//! [`GARBAGE_COLLECTABLE_REFERENCE_KEY`][super::consts::GARBAGE_COLLECTABLE_REFERENCE_KEY] which
//! are no longer referenced by any such annotation may be deleted.
use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::kvp::consts::REFERENCE_ANNOTATION_KEY_PREFIX;

/// Number of hex characters taken from a checksum for names and annotation keys.
const CHECKSUM_LENGTH: usize = 8;

/// The kind part of reference annotations pointing to Secrets.
pub const KIND_SECRET: &str = "secret";

/// An annotation binding the annotated object to the current name of an object it depends on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReferenceAnnotation {
    key: String,
    value: String,
}

impl ReferenceAnnotation {
    /// Creates a reference annotation for an object of `kind` called `name`.
    pub fn new(kind: &str, name: impl Into<String>) -> Self {
        let value = name.into();

        Self {
            key: annotation_key(kind, &value),
            value,
        }
    }

    /// Creates a reference annotation for the Secret called `name`.
    pub fn secret(name: impl Into<String>) -> Self {
        Self::new(KIND_SECRET, name)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The referenced name.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<ReferenceAnnotation> for (String, String) {
    fn from(ReferenceAnnotation { key, value }: ReferenceAnnotation) -> Self {
        (key, value)
    }
}

/// Computes the annotation key referencing an object of `kind` called `name`.
///
/// The name itself is hashed, as object names can be longer than the 63 characters allowed in
/// the name part of an annotation key.
pub fn annotation_key(kind: &str, name: &str) -> String {
    let checksum = sha256_hex(name.as_bytes());
    format!(
        "{REFERENCE_ANNOTATION_KEY_PREFIX}{kind}-{short}",
        short = &checksum[..CHECKSUM_LENGTH]
    )
}

/// Computes the checksum over string data, independent of insertion order.
///
/// Every key and value is length-prefixed, so that moving bytes between adjacent entries always
/// changes the checksum.
pub fn data_checksum(data: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();

    for (key, value) in data {
        for part in [key, value] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
    }

    format!("{:x}", hasher.finalize())
}

/// Appends a content-derived suffix to `base_name`.
pub fn unique_name(base_name: &str, data: &BTreeMap<String, String>) -> String {
    let checksum = data_checksum(data);
    format!("{base_name}-{short}", short = &checksum[..CHECKSUM_LENGTH])
}

fn sha256_hex(input: &[u8]) -> String {
    format!("{:x}", Sha256::digest(input))
}
