//! Canonical YAML serialization of Kubernetes objects.
//!
//! Consumers compare generated manifests with previously stored ones to decide whether an update
//! is necessary, so the output of two builds with the same input must be byte-identical. Objects
//! are therefore first converted into a JSON value and all mapping keys are sorted before the
//! YAML is emitted. The resulting key order is lexicographic on every level, independent of the
//! field order of the Rust types and of the map type `serde_json` is compiled with.
//!
//! The only exception are annotations listed in [`SerializeOptions::leading_annotations`], which
//! precede all other annotations of a `metadata` block in the given order.
use serde::Serialize;
use serde_json::{Map, Value as Json};
use serde_yaml::{Mapping, Value as Yaml};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents every error which can be encountered during YAML serialization.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to convert object into an intermediate JSON value"))]
    ToJsonValue { source: serde_json::Error },

    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },
}

/// Provides configurable options during YAML serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Annotation keys emitted first, in this order, in every `metadata.annotations` mapping.
    /// Keys missing from a mapping are skipped. All other annotations follow in key order.
    pub leading_annotations: Vec<String>,
}

impl SerializeOptions {
    pub fn with_leading_annotations<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            leading_annotations: keys.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Serializes `value` into a canonical YAML string.
pub fn to_canonical_string<T>(value: &T, options: &SerializeOptions) -> Result<String>
where
    T: Serialize,
{
    let value = serde_json::to_value(value).context(ToJsonValueSnafu)?;
    serde_yaml::to_string(&canonicalize(value, options)).context(SerializeYamlSnafu)
}

/// Converts a JSON value into a YAML value with sorted mapping keys.
fn canonicalize(value: Json, options: &SerializeOptions) -> Yaml {
    match value {
        Json::Null => Yaml::Null,
        Json::Bool(b) => Yaml::Bool(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Yaml::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Yaml::Number(u.into())
            } else {
                Yaml::Number(n.as_f64().unwrap_or_default().into())
            }
        }
        Json::String(s) => Yaml::String(s),
        Json::Array(items) => Yaml::Sequence(
            items
                .into_iter()
                .map(|item| canonicalize(item, options))
                .collect(),
        ),
        Json::Object(map) => Yaml::Mapping(
            sorted(map)
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("metadata", Json::Object(metadata)) => {
                            canonicalize_metadata(metadata, options)
                        }
                        (_, value) => canonicalize(value, options),
                    };
                    (Yaml::String(key), value)
                })
                .collect(),
        ),
    }
}

fn canonicalize_metadata(metadata: Map<String, Json>, options: &SerializeOptions) -> Yaml {
    Yaml::Mapping(
        sorted(metadata)
            .map(|(key, value)| {
                let value = match (key.as_str(), value) {
                    ("annotations", Json::Object(annotations)) => {
                        order_annotations(annotations, &options.leading_annotations)
                    }
                    (_, value) => canonicalize(value, options),
                };
                (Yaml::String(key), value)
            })
            .collect(),
    )
}

fn order_annotations(mut annotations: Map<String, Json>, leading: &[String]) -> Yaml {
    let mut mapping = Mapping::new();

    for key in leading {
        if let Some(value) = annotations.remove(key) {
            mapping.insert(
                Yaml::String(key.clone()),
                canonicalize(value, &SerializeOptions::default()),
            );
        }
    }
    for (key, value) in sorted(annotations) {
        mapping.insert(
            Yaml::String(key),
            canonicalize(value, &SerializeOptions::default()),
        );
    }

    Yaml::Mapping(mapping)
}

fn sorted(map: Map<String, Json>) -> impl Iterator<Item = (String, Json)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries.into_iter()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use indoc::indoc;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Unordered {
        zeta: u16,
        alpha: Vec<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        missing: Option<String>,
        nested: HashMap<&'static str, bool>,
    }

    fn unordered() -> Unordered {
        Unordered {
            zeta: 1,
            alpha: vec!["b", "a"],
            missing: None,
            nested: HashMap::from([("y", true), ("x", false)]),
        }
    }

    #[derive(Serialize)]
    struct Annotated {
        metadata: Metadata,
        spec: Spec,
    }

    #[derive(Serialize)]
    struct Spec {
        template: Template,
        annotations: HashMap<&'static str, &'static str>,
    }

    #[derive(Serialize)]
    struct Template {
        metadata: Metadata,
    }

    #[derive(Clone, Serialize)]
    struct Metadata {
        name: &'static str,
        annotations: HashMap<&'static str, &'static str>,
    }

    fn annotated() -> Annotated {
        let metadata = Metadata {
            name: "lakom",
            annotations: HashMap::from([("c", "3"), ("b", "2"), ("a", "1")]),
        };

        Annotated {
            metadata: metadata.clone(),
            spec: Spec {
                template: Template { metadata },
                annotations: HashMap::from([("z", "26"), ("c", "3")]),
            },
        }
    }

    #[test]
    fn keys_are_sorted_on_every_level() {
        let yaml = to_canonical_string(&unordered(), &SerializeOptions::default())
            .expect("serialization works");

        assert_eq!(yaml, indoc! {"
            alpha:
            - b
            - a
            nested:
              x: false
              y: true
            zeta: 1
        "});
    }

    #[test]
    fn leading_annotations_keep_their_order() {
        let options = SerializeOptions::with_leading_annotations(["c", "missing", "a"]);
        let yaml = to_canonical_string(&annotated(), &options).expect("serialization works");

        assert_eq!(yaml, indoc! {"
            metadata:
              annotations:
                c: '3'
                a: '1'
                b: '2'
              name: lakom
            spec:
              annotations:
                c: '3'
                z: '26'
              template:
                metadata:
                  annotations:
                    c: '3'
                    a: '1'
                    b: '2'
                  name: lakom
        "});
    }

    #[test]
    fn annotations_are_sorted_by_default() {
        let yaml = to_canonical_string(&annotated(), &SerializeOptions::default())
            .expect("serialization works");

        assert!(yaml.starts_with(indoc! {"
            metadata:
              annotations:
                a: '1'
                b: '2'
                c: '3'
        "}));
    }

    #[test]
    fn multiline_strings_keep_line_breaks() {
        #[derive(Serialize)]
        struct Data {
            text: &'static str,
        }

        let text = "first\nsecond\n\nthird\n";
        let yaml = to_canonical_string(&Data { text }, &SerializeOptions::default())
            .expect("serialization works");

        assert_eq!(yaml, "text: |\n  first\n  second\n\n  third\n");
    }
}
