//! Serde support and JSON/YAML helpers.
//!
//! Maps encode their entries in key order. Decoding streams the entries of
//! a document in the order they appear; when a key repeats, its last
//! occurrence wins for both the value and the position.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::{OrderedMap, Value};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ── Encoding ──────────────────────────────────────────────────────────────

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => items.serialize(serializer),
            Value::Map(map) => map.serialize(serializer),
            Value::Any(payload) => Err(ser::Error::custom(format!(
                "cannot encode value of type \"{}\"",
                (**payload).type_name()
            ))),
        }
    }
}

// ── Decoding ──────────────────────────────────────────────────────────────

struct OrderedMapVisitor;

impl<'de> Visitor<'de> for OrderedMapVisitor {
    type Value = OrderedMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an ordered map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            // A repeated key moves to the position of its last occurrence.
            map.delete(&key);
            map.set(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for OrderedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON or YAML value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| E::custom(format!("number {v} cannot be represented")))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Value, A::Error> {
        OrderedMapVisitor.visit_map(access).map(Value::Map)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// ── JSON ──────────────────────────────────────────────────────────────────

/// Decodes a JSON object, keeping the order of its keys.
#[cfg(feature = "json")]
pub fn from_json_str(json: &str) -> Result<OrderedMap, CodecError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(feature = "json")]
pub fn to_json_string(map: &OrderedMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string(map)?)
}

/// Like [`to_json_string`], indented by two spaces.
#[cfg(feature = "json")]
pub fn to_json_string_pretty(map: &OrderedMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(map)?)
}

// ── YAML ──────────────────────────────────────────────────────────────────

/// Decodes a YAML mapping, keeping the order of its keys.
///
/// Any other top-level node is an error, as is a key that is itself a
/// sequence or a mapping.
#[cfg(feature = "yaml")]
pub fn from_yaml_str(yaml: &str) -> Result<OrderedMap, CodecError> {
    Ok(serde_yaml::from_str(yaml)?)
}

#[cfg(feature = "yaml")]
pub fn to_yaml_string(map: &OrderedMap) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(map)?)
}
