//! Manifest parsing for server-side apply
//!
//! Workload manifests arrive as multi-document YAML files. Each document
//! is converted to a `serde_json::Value` and paired with the `ApiResource`
//! derived from its `apiVersion`/`kind` so the gateway can apply it
//! through a dynamic API handle.

use kube::discovery::ApiResource;
use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

use crate::Error;

/// One manifest document, ready to apply.
#[derive(Clone, Debug)]
pub struct ManifestDoc {
    /// The parsed document
    pub value: Value,
    /// Resource name from `metadata.name`
    pub name: String,
    /// Namespace from `metadata.namespace`, if the document sets one
    pub namespace: Option<String>,
    /// API resource derived from `apiVersion` and `kind`
    pub resource: ApiResource,
}

/// Parse a multi-document YAML string into apply-ready documents.
///
/// Documents without an `apiVersion` (empty documents, comment blocks) are
/// skipped rather than rejected.
pub fn parse_documents(input: &str) -> Result<Vec<ManifestDoc>, Error> {
    let docs = YamlLoader::load_from_str(input)
        .map_err(|e| Error::gateway("apply-manifest", format!("invalid YAML: {e}")))?;

    let mut parsed = Vec::new();
    for doc in docs {
        let value = yaml_to_json(doc)?;
        if value.get("apiVersion").is_none() {
            continue;
        }
        parsed.push(document_target(value)?);
    }
    Ok(parsed)
}

/// Extract the apply target from a parsed document.
fn document_target(value: Value) -> Result<ManifestDoc, Error> {
    let api_version = str_field(&value, "/apiVersion")?;
    let kind = str_field(&value, "/kind")?;
    let name = str_field(&value, "/metadata/name")?;
    let namespace = value
        .pointer("/metadata/namespace")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let resource = build_api_resource(&api_version, &kind);

    Ok(ManifestDoc {
        value,
        name,
        namespace,
        resource,
    })
}

fn str_field(value: &Value, pointer: &str) -> Result<String, Error> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::gateway("apply-manifest", format!("manifest missing {pointer}")))
}

/// Build an `ApiResource` from an explicit `apiVersion` and `kind`.
pub fn build_api_resource(api_version: &str, kind: &str) -> ApiResource {
    let (group, version) = parse_api_version(api_version);
    ApiResource {
        group,
        version,
        kind: kind.to_string(),
        api_version: api_version.to_string(),
        plural: pluralize_kind(kind),
    }
}

/// Split an `apiVersion` into (group, version); core resources have an
/// empty group.
fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Pluralize a resource kind by the usual English rules.
///
/// Covers the kinds this testbed applies (Deployment, DaemonSet, Service,
/// DebugSession); anything more exotic would need API discovery instead.
fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{lower}es")
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{lower}s")
    }
}

/// Convert a yaml-rust2 value to a `serde_json::Value`.
fn yaml_to_json(yaml: Yaml) -> Result<Value, Error> {
    match yaml {
        Yaml::Null | Yaml::BadValue => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e| Error::gateway("apply-manifest", format!("bad number: {e}")))?;
            Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(items) => items
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Boolean(b) => b.to_string(),
                    other => {
                        return Err(Error::gateway(
                            "apply-manifest",
                            format!("unsupported YAML key: {other:?}"),
                        ))
                    }
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        Yaml::Alias(_) => Err(Error::gateway(
            "apply-manifest",
            "YAML aliases are not supported",
        )),
    }
}
