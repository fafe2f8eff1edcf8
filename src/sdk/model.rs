//! Resource models: typed views over raw API JSON.
//!
//! Every resource keeps the decoded object it was built from. Typed
//! accessors cover the documented fields and [`Model::field`] reaches the
//! rest with a dotted path, so no field is ever out of reach just because it
//! has no getter.

use serde_json::{Map, Value};

use super::Sdk;
use crate::{Error, Result};

/// A raw JSON object plus the [`Sdk`] it was fetched through.
#[derive(Debug, Clone)]
pub struct Model {
    raw: Map<String, Value>,
    parent: Sdk,
}

impl Model {
    /// Wraps `raw`, which must be a JSON object, fetched through `parent`,
    /// which must carry an access token.
    pub fn new(raw: Value, parent: &Sdk) -> Result<Self> {
        let Value::Object(raw) = raw else {
            return Err(Error::InvalidModel("expected payload to be a JSON object"));
        };
        if parent.session().access_token().trim().is_empty() {
            return Err(Error::InvalidModel("parent session carries no access token"));
        }
        Ok(Self {
            raw,
            parent: parent.clone(),
        })
    }

    pub fn parent(&self) -> &Sdk {
        &self.parent
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    /// Dotted-path lookup, e.g. `"external_urls.spotify"` or `"images.0.url"`.
    /// Numeric segments index into arrays.
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.raw.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn str(&self, path: &str) -> Option<&str> {
        self.field(path).and_then(Value::as_str)
    }

    pub fn bool(&self, path: &str) -> Option<bool> {
        self.field(path).and_then(Value::as_bool)
    }

    pub fn i64(&self, path: &str) -> Option<i64> {
        self.field(path).and_then(Value::as_i64)
    }

    pub fn u64(&self, path: &str) -> Option<u64> {
        self.field(path).and_then(Value::as_u64)
    }

    pub fn has(&self, path: &str) -> bool {
        self.field(path).is_some()
    }

    /// The object at `path` as a resource; `None` when missing or `null`.
    pub fn child<T: Resource>(&self, path: &str) -> Result<Option<T>> {
        match self.field(path) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::new(value.clone(), &self.parent).map(Some),
        }
    }

    /// The array at `path` as resources; empty when missing or `null`.
    pub fn children<T: Resource>(&self, path: &str) -> Result<Vec<T>> {
        match self.field(path) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| T::new(item.clone(), &self.parent))
                .collect(),
            Some(_) => Err(Error::InvalidModel("expected an array of objects")),
        }
    }

    /// Overlays `other` onto the raw object, replacing existing keys.
    pub(crate) fn merge(&mut self, other: Map<String, Value>) {
        self.raw.extend(other);
    }
}

/// Equality looks at the payload only.
impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// Implemented by every typed resource wrapper.
pub trait Resource: Sized {
    fn from_model(model: Model) -> Self;

    fn model(&self) -> &Model;

    fn new(raw: Value, parent: &Sdk) -> Result<Self> {
        Model::new(raw, parent).map(Self::from_model)
    }

    /// See [`Model::field`].
    fn field(&self, path: &str) -> Option<&Value> {
        self.model().field(path)
    }

    fn to_value(&self) -> Value {
        self.model().to_value()
    }
}

/// Declares a resource wrapper around [`Model`].
macro_rules! resource {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            model: $crate::sdk::model::Model,
        }

        impl $crate::sdk::model::Resource for $name {
            fn from_model(model: $crate::sdk::model::Model) -> Self {
                Self { model }
            }

            fn model(&self) -> &$crate::sdk::model::Model {
                &self.model
            }
        }
    };
}

pub(crate) use resource;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sdk::test_support::sdk;

    #[test]
    fn rejects_non_object_payloads() {
        for raw in [json!([1, 2]), json!("artist"), json!(null)] {
            assert!(matches!(
                Model::new(raw, &sdk("token")),
                Err(Error::InvalidModel(_))
            ));
        }
    }

    #[test]
    fn rejects_unauthenticated_parent() {
        assert!(matches!(
            Model::new(json!({}), &sdk("")),
            Err(Error::InvalidModel(_))
        ));
    }

    #[test]
    fn dotted_paths() {
        let model = Model::new(
            json!({
                "external_urls": {"spotify": "https://open.spotify.com/artist/1"},
                "images": [{"url": "a"}, {"url": "b"}],
                "followers": {"total": 10}
            }),
            &sdk("token"),
        )
        .unwrap();

        assert_eq!(model.str("external_urls.spotify"), Some("https://open.spotify.com/artist/1"));
        assert_eq!(model.str("images.1.url"), Some("b"));
        assert_eq!(model.u64("followers.total"), Some(10));
        assert_eq!(model.field("followers.total.deeper"), None);
        assert_eq!(model.field("missing"), None);
        assert_eq!(model.field("images.9"), None);
    }

    #[test]
    fn merge_overlays_keys() {
        let mut model = Model::new(json!({"id": "1", "name": "old"}), &sdk("token")).unwrap();
        let Value::Object(extra) = json!({"name": "new", "images": []}) else {
            unreachable!()
        };
        model.merge(extra);
        assert_eq!(model.to_value(), json!({"id": "1", "name": "new", "images": []}));
    }
}
