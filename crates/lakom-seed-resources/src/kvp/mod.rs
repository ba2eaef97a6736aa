//! Labels and annotations placed on the generated objects.
//!
//! Unlike labels of operator-managed workloads, none of the values here are user supplied. They
//! are either fixed (see [`consts`]) or derived from names produced during the same build (see
//! [`references`]). They are therefore not validated again.
use std::collections::BTreeMap;

use crate::constants::{APP_NAME, APP_PART_OF};

pub mod consts;
pub mod references;

pub use references::ReferenceAnnotation;

/// A set of labels or annotations, ready for use in
/// [`ObjectMeta`][k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta].
pub type KeyValuePairs = BTreeMap<String, String>;

/// Returns the two identity labels every generated object carries.
///
/// These labels are also used as the selector of the Service, the PodDisruptionBudget and the
/// pod anti-affinity term, so they must never contain anything that differs between objects.
pub fn identity_labels() -> KeyValuePairs {
    BTreeMap::from([
        (consts::K8S_APP_NAME_KEY.to_owned(), APP_NAME.to_owned()),
        (consts::K8S_APP_PART_OF_KEY.to_owned(), APP_PART_OF.to_owned()),
    ])
}

/// Returns the [`identity_labels`] extended by the given `(key, value)` pairs.
pub fn identity_labels_with<'a>(
    additional: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> KeyValuePairs {
    let mut labels = identity_labels();
    labels.extend(
        additional
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned())),
    );
    labels
}
