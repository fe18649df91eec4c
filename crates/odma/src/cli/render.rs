//! # Rendering Module
//!
//! Every command produces its result in two shapes:
//!
//! - `build_*_value` functions turn library data into a `serde_json::Value`.
//!   This is what `--json` prints, pretty-printed.
//! - The public renderers lay the same data out as aligned text, styled
//!   through [`super::styles`].
//!
//! Attribute values map to JSON as follows: numbers and booleans stay
//! native, DateTime is RFC 3339, Binary is an array of bytes, Reference is
//! the target's id, Content is `{ "size": n }` and Guid is
//! `{ "object_id", "repository_id" }`. Lists become arrays.

use super::styles;
use opendma::attributes::{List, Scalar};
use opendma::prelude::*;
use opendma::projector::{AccessorMapping, InterfaceDef};
use serde_json::{json, Map, Value as Json};

/// The result of reading one accessor, failures included.
pub struct Reading {
    accessor: String,
    outcome: std::result::Result<Outcome, String>,
}

impl Reading {
    pub fn take(projection: &Projection, accessor: &str) -> Self {
        let outcome = projection
            .invoke(&format!("get_{}", accessor), None)
            .map_err(|e| e.to_string());
        Self {
            accessor: accessor.to_string(),
            outcome,
        }
    }
}

pub fn table(table: &RegistrationTable, interface: Option<&str>, json: bool) -> String {
    let interfaces: Vec<&InterfaceDef> = table
        .interfaces()
        .filter(|def| interface.map_or(true, |wanted| def.name == wanted))
        .collect();
    if json {
        return pretty(&build_table_value(table, &interfaces));
    }

    let mut out = Vec::new();
    for def in interfaces {
        let mut header = format!(
            "{} {}",
            styles::title().apply_to(&def.name),
            styles::muted().apply_to(format!("({})", def.class))
        );
        if !def.extends.is_empty() {
            header.push_str(&format!(" extends {}", def.extends.join(", ")));
        }
        out.push(header);

        let width = def.accessors.iter().map(String::len).max().unwrap_or(0);
        for name in &def.accessors {
            let padded = format!("{:<width$}", name, width = width);
            let line = match table.accessor(name) {
                Some(mapping) => format!(
                    "  {}  {}",
                    styles::accessor().apply_to(padded),
                    describe_mapping(mapping)
                ),
                None => format!(
                    "  {}  {}",
                    styles::accessor().apply_to(padded),
                    styles::muted().apply_to("Namespace:Name")
                ),
            };
            out.push(line);
        }
    }
    if out.is_empty() {
        return styles::faint().apply_to("(no interfaces)").to_string();
    }
    out.join("\n")
}

fn describe_mapping(mapping: &AccessorMapping) -> String {
    let mut text = format!(
        "{} {}",
        mapping.attribute,
        styles::muted().apply_to(mapping.shape())
    );
    if let Some(target) = &mapping.target {
        text.push_str(&format!(" -> {}", target));
    }
    if mapping.writable {
        text.push_str(" (writable)");
    }
    text
}

pub fn repositories(repositories: &[(LocalId, Option<String>)], json: bool) -> String {
    if json {
        let items: Vec<Json> = repositories
            .iter()
            .map(|(id, name)| json!({ "id": id.as_str(), "name": name }))
            .collect();
        return pretty(&Json::Array(items));
    }
    if repositories.is_empty() {
        return styles::faint().apply_to("(no repositories)").to_string();
    }
    let width = repositories
        .iter()
        .map(|(id, _)| id.as_str().len())
        .max()
        .unwrap_or(0);
    repositories
        .iter()
        .map(|(id, name)| {
            let padded = format!("{:<width$}", id.as_str(), width = width);
            format!(
                "{}  {}",
                styles::id().apply_to(padded),
                name.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn objects(objects: &[Projection], json: bool) -> String {
    if json {
        let items: Vec<Json> = objects.iter().map(build_object_value).collect();
        return pretty(&Json::Array(items));
    }
    if objects.is_empty() {
        return styles::faint().apply_to("(no objects)").to_string();
    }
    let ids: Vec<String> = objects.iter().map(object_id).collect();
    let width = ids.iter().map(String::len).max().unwrap_or(0);
    ids.iter()
        .zip(objects)
        .map(|(id, projection)| {
            let padded = format!("{:<width$}", id, width = width);
            format!(
                "{}  {}",
                styles::id().apply_to(padded),
                styles::muted().apply_to(interface_list(projection).join(", "))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn description(projection: &Projection, readings: &[Reading], json: bool) -> String {
    if json {
        let mut value = build_object_value(projection);
        let mut accessors = Map::new();
        for reading in readings {
            accessors.insert(reading.accessor.clone(), build_reading_value(reading));
        }
        value["accessors"] = Json::Object(accessors);
        return pretty(&value);
    }

    let mut out = vec![
        styles::id().apply_to(object_id(projection)).to_string(),
        format!(
            "{} {}",
            styles::muted().apply_to("implements"),
            interface_list(projection).join(", ")
        ),
    ];
    let width = readings
        .iter()
        .map(|reading| reading.accessor.len())
        .max()
        .unwrap_or(0);
    for reading in readings {
        let padded = format!("{:<width$}", reading.accessor, width = width);
        let text = match &reading.outcome {
            Ok(outcome) => outcome_text(outcome),
            Err(message) => styles::error().apply_to(message).to_string(),
        };
        out.push(format!("  {}  {}", styles::accessor().apply_to(padded), text));
    }
    out.join("\n")
}

pub fn outcome(accessor: &str, outcome: &Outcome, json: bool) -> String {
    if json {
        return pretty(&json!({ "accessor": accessor, "value": outcome_value(outcome) }));
    }
    outcome_text(outcome)
}

fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Value(Value::Null) | Outcome::Done => {
            styles::faint().apply_to("null").to_string()
        }
        Outcome::Value(value) => value.to_string(),
        Outcome::QName(qname) => qname.to_string(),
    }
}

fn object_id(projection: &Projection) -> String {
    match Object::id(projection) {
        Ok(Some(id)) => id.to_string(),
        _ => "?".to_string(),
    }
}

fn interface_list(projection: &Projection) -> Vec<&str> {
    projection.interfaces().collect()
}

fn pretty(value: &Json) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn build_table_value(table: &RegistrationTable, interfaces: &[&InterfaceDef]) -> Json {
    let accessors: Vec<Json> = interfaces
        .iter()
        .flat_map(|def| def.accessors.iter())
        .filter_map(|name| table.accessor(name))
        .map(|mapping| {
            json!({
                "accessor": mapping.accessor,
                "attribute": mapping.attribute.to_string(),
                "kind": mapping.kind.to_string(),
                "multi_value": mapping.multi_value,
                "writable": mapping.writable,
                "target": mapping.target,
            })
        })
        .fold(Vec::new(), |mut seen: Vec<Json>, item| {
            if !seen.contains(&item) {
                seen.push(item);
            }
            seen
        });
    let interfaces: Vec<Json> = interfaces
        .iter()
        .map(|def| {
            json!({
                "name": def.name,
                "class": def.class.to_string(),
                "extends": def.extends,
                "accessors": def.accessors,
            })
        })
        .collect();
    json!({
        "base": table.base(),
        "interfaces": interfaces,
        "accessors": accessors,
    })
}

pub fn build_object_value(projection: &Projection) -> Json {
    json!({
        "id": object_id(projection),
        "interfaces": interface_list(projection),
    })
}

fn build_reading_value(reading: &Reading) -> Json {
    match &reading.outcome {
        Ok(outcome) => outcome_value(outcome),
        Err(message) => json!({ "error": message }),
    }
}

fn outcome_value(outcome: &Outcome) -> Json {
    match outcome {
        Outcome::Value(value) => build_value(value),
        Outcome::QName(qname) => Json::String(qname.to_string()),
        Outcome::Done => Json::Null,
    }
}

pub fn build_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Scalar(scalar) => build_scalar(scalar),
        Value::List(list) => match list.clone() {
            List::String(v) => items(v),
            List::Integer(v) => items(v),
            List::Short(v) => items(v),
            List::Long(v) => items(v),
            List::Float(v) => items(v),
            List::Double(v) => items(v),
            List::Boolean(v) => items(v),
            List::DateTime(v) => items(v),
            List::Binary(v) => items(v),
            List::Reference(v) => items(v),
            List::Content(v) => items(v),
            List::Id(v) => items(v),
            List::Guid(v) => items(v),
        },
    }
}

fn items<T: Into<Scalar>>(values: Vec<T>) -> Json {
    Json::Array(
        values
            .into_iter()
            .map(|item| build_scalar(&item.into()))
            .collect(),
    )
}

fn build_scalar(scalar: &Scalar) -> Json {
    match scalar {
        Scalar::String(v) => json!(v),
        Scalar::Integer(v) => json!(v),
        Scalar::Short(v) => json!(v),
        Scalar::Long(v) => json!(v),
        Scalar::Float(v) => json!(v),
        Scalar::Double(v) => json!(v),
        Scalar::Boolean(v) => json!(v),
        Scalar::DateTime(v) => json!(v.to_rfc3339()),
        Scalar::Binary(v) => json!(v),
        Scalar::Reference(r) => match r.id() {
            Ok(Some(id)) => json!(id.as_str()),
            _ => Json::Null,
        },
        Scalar::Content(c) => json!({ "size": c.size() }),
        Scalar::Id(v) => json!(v.as_str()),
        Scalar::Guid(v) => json!({
            "object_id": v.object_id().as_str(),
            "repository_id": v.repository_id().as_str(),
        }),
    }
}
