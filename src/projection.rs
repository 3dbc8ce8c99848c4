//! Allow-list projection of output records.
//!
//! An output type declares the fields it exposes as a fixed, ordered shape.
//! Projection copies exactly those fields out of a source record, in shape
//! order, and drops everything else. Credentials stored on an entity never
//! leave the process unless a shape names them.
//!
//! ```rust
//! use serde_json::json;
//! use sluice::projection::{project, Field};
//!
//! const USER: &[Field] = &[Field::plain("name"), Field::plain("email")];
//!
//! let out = project(USER, &json!({"email": "a@x", "name": "A", "password": "secret"}));
//! assert_eq!(out, json!({"name": "A", "email": "a@x"}));
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::failure::AppError;

/// One entry of a shape.
#[derive(Clone, Copy, Debug)]
pub enum Field {
    /// Copied as-is.
    Plain(&'static str),
    /// Projected through its own shape (element-wise for arrays).
    Nested(&'static str, &'static [Field]),
}

impl Field {
    pub const fn plain(name: &'static str) -> Self {
        Self::Plain(name)
    }

    pub const fn nested(name: &'static str, shape: &'static [Field]) -> Self {
        Self::Nested(name, shape)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Plain(name) | Self::Nested(name, _) => name,
        }
    }
}

/// Implemented by output types (RDOs) to name the fields they expose.
pub trait Projection {
    const SHAPE: &'static [Field];
}

/// Projects `source` through `shape` into a fresh value.
///
/// Arrays are projected element-wise, keeping length and order. Fields
/// missing on the source are omitted. A non-record source projects to an
/// empty record.
pub fn project(shape: &[Field], source: &Value) -> Value {
    match source {
        Value::Array(items) => Value::Array(items.iter().map(|item| project(shape, item)).collect()),
        Value::Object(record) => Value::Object(project_record(shape, record)),
        _ => Value::Object(Map::new()),
    }
}

fn project_record(shape: &[Field], record: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(shape.len());
    for field in shape {
        let Some(value) = record.get(field.name()) else {
            continue;
        };
        let value = match (field, value) {
            (Field::Nested(_, inner), Value::Object(_) | Value::Array(_)) => project(inner, value),
            _ => value.clone(),
        };
        out.insert(field.name().to_owned(), value);
    }
    out
}

/// Serialises `source` and projects it through `P`'s shape.
pub fn project_as<P, T>(source: &T) -> Result<Value, AppError>
where
    P: Projection,
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(source).map_err(anyhow::Error::from)?;
    Ok(project(P::SHAPE, &value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const USER: &[Field] = &[
        Field::plain("name"),
        Field::plain("email"),
        Field::plain("avatar"),
        Field::plain("userType"),
    ];

    const OFFER: &[Field] = &[Field::plain("title"), Field::nested("author", USER)];

    fn user() -> Value {
        json!({
            "name": "A",
            "email": "a@x",
            "avatar": "p.png",
            "userType": "pro",
            "password": "secret",
        })
    }

    #[test]
    fn drops_fields_outside_the_shape() {
        let out = project(USER, &user());
        assert_eq!(out, json!({"name": "A", "email": "a@x", "avatar": "p.png", "userType": "pro"}));
        assert!(out.get("password").is_none());
    }

    #[test]
    fn reprojecting_is_identity() {
        let once = project(USER, &user());
        let twice = project(USER, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn output_follows_shape_order() {
        let source = json!({"userType": "pro", "avatar": "p.png", "email": "a@x", "name": "A"});
        let out = project(USER, &source);
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["name", "email", "avatar", "userType"]);
    }

    #[test]
    fn sequences_project_element_wise() {
        let source = json!([user(), {"name": "B"}, user()]);
        let out = project(USER, &source);
        let items = out.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], json!({"name": "B"}));
        assert!(items.iter().all(|item| item.get("password").is_none()));
    }

    #[test]
    fn nested_records_are_projected_too() {
        let source = json!({"title": "Loft", "price": 900, "author": user()});
        let out = project(OFFER, &source);
        assert_eq!(out["author"], project(USER, &user()));
        assert!(out.get("price").is_none());
    }

    #[test]
    fn source_is_left_untouched() {
        let source = user();
        let before = source.clone();
        let _ = project(USER, &source);
        assert_eq!(source, before);
    }

    #[test]
    fn project_as_serialises_first() {
        #[derive(Serialize)]
        struct Entity {
            name: &'static str,
            password: &'static str,
        }

        struct NameOnly;
        impl Projection for NameOnly {
            const SHAPE: &'static [Field] = &[Field::plain("name")];
        }

        let out = project_as::<NameOnly, _>(&Entity { name: "A", password: "secret" }).unwrap();
        assert_eq!(out, json!({"name": "A"}));
    }
}
