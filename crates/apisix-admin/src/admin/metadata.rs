// Dynamic codec for the `plugin_metadata` collection.
//
// Plugin metadata has no fixed schema: each plugin defines its own fields,
// and on the wire they share one flat JSON object with the reserved `id`
// key. In memory the two are always kept apart -- a reserved identifier
// plus an open, order-preserving field map.

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Wire keys that may never appear inside caller-supplied fields.
///
/// `id` is the plugin identifier; `key` is the envelope's storage
/// identifier and must be excluded from fields even though it normally
/// lives in the outer envelope rather than the flat object.
pub const RESERVED_KEYS: [&str; 2] = ["id", "key"];

/// Metadata for a single plugin.
///
/// `fields` is an open mapping of plugin-defined names to arbitrary JSON
/// values. Serialization flattens `id` and `fields` into one JSON object
/// (there is no `"metadata"` wrapper on the wire); deserialization reverses
/// the split. Field maps are normalized to ascending key order in both
/// directions, so the emitted JSON is byte-stable for the same logical
/// content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PluginMetadata {
    pub id: Option<String>,
    pub fields: Map<String, Value>,
}

impl PluginMetadata {
    /// Build metadata for the given plugin, rejecting reserved field names.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Result<Self, Error> {
        let metadata = Self {
            id: Some(id.into()),
            fields,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Check that no caller-supplied field shadows a reserved wire key.
    ///
    /// Runs again before every marshal: a collision is a hard error, never
    /// a silent overwrite.
    pub fn validate(&self) -> Result<(), Error> {
        for key in RESERVED_KEYS {
            if self.fields.contains_key(key) {
                return Err(Error::ReservedMetadataKey(key.to_owned()));
            }
        }
        Ok(())
    }
}

/// Rebuild a JSON object with keys in ascending lexicographic order.
///
/// Object values are normalized recursively; array elements are normalized
/// only when they are themselves objects, everything else passes through
/// unchanged. Idempotent, and independent of the input's insertion order.
pub fn normalize(map: &Map<String, Value>) -> Map<String, Value> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut normalized = Map::with_capacity(map.len());
    for key in keys {
        normalized.insert(key.clone(), normalize_value(&map[key]));
    }
    normalized
}

fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize(map)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Value::Object(normalize(map)),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

impl Serialize for PluginMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut flat = Map::with_capacity(self.fields.len() + 1);
        if let Some(id) = &self.id {
            flat.insert("id".to_owned(), Value::String(id.clone()));
        }
        for (key, value) in normalize(&self.fields) {
            if RESERVED_KEYS.contains(&key.as_str()) {
                return Err(S::Error::custom(format!(
                    "reserved key in plugin metadata fields: {key}"
                )));
            }
            flat.insert(key, value);
        }
        flat.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PluginMetadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flat = Map::<String, Value>::deserialize(deserializer)?;

        let id = match flat.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };

        let mut fields = Map::with_capacity(flat.len());
        for (key, value) in flat {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                fields.insert(key, value);
            }
        }

        Ok(Self {
            id,
            fields: normalize(&fields),
        })
    }
}
