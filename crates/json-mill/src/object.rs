//! JsonObject — ordered key→value container.
//!
//! Keys map to a [`Slot`]: a single value, or an array of values produced by
//! repeated [`accumulate`](JsonObject::accumulate) calls on the same key.
//! Insertion order is always preserved (`IndexMap`), so the ordered key
//! accessors are always valid.
//!
//! Values are stamped with the object's *current* config when retrieved, so
//! swapping the config affects later retrievals only. Shared objects are not
//! synchronized.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

use crate::config::{ConfigRef, JsonConfig};
use crate::value::{Payload, Value};

/// What a key holds: one value, or the accumulate upgrade.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    One(Value),
    Many(Vec<Value>),
}

impl Slot {
    /// Projects the slot into a single [`Value`] (`Many` becomes an array).
    fn to_value(&self, config: &ConfigRef) -> Value {
        match self {
            Slot::One(v) => v.clone().stamped(config),
            Slot::Many(vs) => {
                let mut arr = crate::array::JsonArray::with_config(ConfigRef::clone(config));
                for v in vs {
                    arr.push(v.clone());
                }
                Value::from(arr).stamped(config)
            }
        }
    }
}

/// Ordered mapping from string keys to values.
#[derive(Debug, Clone)]
pub struct JsonObject {
    entries: IndexMap<String, Slot>,
    config: ConfigRef,
}

impl Default for JsonObject {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonObject {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            config: JsonConfig::default_ref(),
        }
    }

    pub fn with_config(config: ConfigRef) -> Self {
        Self {
            entries: IndexMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConfigRef {
        &self.config
    }

    /// Replaces the shared config. Values retrieved afterwards carry the new
    /// config; values already materialized keep the one they were stamped
    /// with (propagate-on-read).
    pub fn set_config(&mut self, config: ConfigRef) {
        self.config = config;
    }

    /// Inserts, overwriting any previous slot. Returns the replaced value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let config = ConfigRef::clone(&self.config);
        self.entries
            .insert(key.into(), Slot::One(value.into()))
            .map(|old| old.to_value(&config))
    }

    /// Like [`put`](Self::put), except a null value removes the key entirely
    /// and returns the removed value.
    pub fn element(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        if value.is_null() {
            self.remove(&key)
        } else {
            self.put(key, value)
        }
    }

    /// Inserts under accumulate semantics: the first collision upgrades the
    /// slot to a 2-element array, later collisions append in order.
    pub fn accumulate(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            indexmap::map::Entry::Vacant(e) => {
                e.insert(Slot::One(value));
            }
            indexmap::map::Entry::Occupied(mut e) => {
                let slot = e.get_mut();
                match std::mem::replace(slot, Slot::Many(Vec::new())) {
                    Slot::One(prev) => *slot = Slot::Many(vec![prev, value]),
                    Slot::Many(mut vs) => {
                        vs.push(value);
                        *slot = Slot::Many(vs);
                    }
                }
            }
        }
    }

    /// Removes a key, returning its projected value. Order of the remaining
    /// keys is preserved.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let config = ConfigRef::clone(&self.config);
        self.entries
            .shift_remove(key)
            .map(|slot| slot.to_value(&config))
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retrieves a value, stamped with the current config. An accumulated
    /// slot is projected to an array value.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|slot| slot.to_value(&self.config))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn last_key(&self) -> Option<&str> {
        self.entries.last().map(|(k, _)| k.as_str())
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Flattens into a plain `serde_json` map, recursing through nested
    /// containers and records. Null entries are kept only when the
    /// `NullConfig` is open.
    pub fn to_map(&self) -> JsonValue {
        let keep_null = self.config.null.open;
        let mut map = Map::with_capacity(self.entries.len());
        for (key, slot) in &self.entries {
            let value = slot.to_value(&self.config);
            if value.is_null() && !keep_null {
                continue;
            }
            map.insert(key.clone(), flatten(&value, &self.config));
        }
        JsonValue::Object(map)
    }
}

/// Keys and slots must match pairwise, in order. Config refs are excluded.
impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a == b)
    }
}

/// Recursive projection of a value into `serde_json` form.
pub(crate) fn flatten(value: &Value, config: &ConfigRef) -> JsonValue {
    match value.payload() {
        Payload::Null => JsonValue::Null,
        Payload::Bool(b) => JsonValue::Bool(*b),
        Payload::Int(i) => JsonValue::Number(Number::from(*i)),
        Payload::BigInt(i) => match i64::try_from(*i) {
            Ok(small) => JsonValue::Number(Number::from(small)),
            Err(_) => JsonValue::String(i.to_string()),
        },
        Payload::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Payload::Text(s) => JsonValue::String(s.clone()),
        Payload::Temporal(t) => JsonValue::String(crate::serializer::natural_temporal(t)),
        Payload::Array(a) => a.to_list(),
        Payload::Object(o) => o.to_map(),
        Payload::Record(r) => r.to_object(config).to_map(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NullConfig;

    #[test]
    fn put_overwrites() {
        let mut obj = JsonObject::new();
        assert!(obj.put("a", 1).is_none());
        let old = obj.put("a", 2).unwrap();
        assert_eq!(old, Value::from(1));
        assert_eq!(obj.get("a").unwrap(), Value::from(2));
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn element_with_null_removes() {
        let mut obj = JsonObject::new();
        obj.put("a", 1);
        let removed = obj.element("a", Value::null()).unwrap();
        assert_eq!(removed, Value::from(1));
        assert!(!obj.has_key("a"));
        // removing an absent key is a no-op
        assert!(obj.element("a", Value::null()).is_none());
    }

    #[test]
    fn accumulate_upgrades_to_array() {
        let mut obj = JsonObject::new();
        obj.accumulate("k", 1);
        assert_eq!(obj.get("k").unwrap(), Value::from(1));
        obj.accumulate("k", 2);
        obj.accumulate("k", 3);
        let arr = obj.get("k").unwrap();
        let Payload::Array(items) = arr.payload() else {
            panic!("expected array after accumulate");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items.get(0).unwrap(), Value::from(1));
        assert_eq!(items.get(2).unwrap(), Value::from(3));
    }

    #[test]
    fn ordered_key_accessors() {
        let mut obj = JsonObject::new();
        obj.put("first", 1);
        obj.put("mid", 2);
        obj.put("last", 3);
        assert_eq!(obj.first_key(), Some("first"));
        assert_eq!(obj.last_key(), Some("last"));
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["first", "mid", "last"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut obj = JsonObject::new();
        obj.put("a", 1);
        obj.put("b", 2);
        obj.put("c", 3);
        obj.remove("b");
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn to_map_drops_nulls_when_closed() {
        let mut obj = JsonObject::new();
        obj.put("x", 1);
        obj.put("gone", Value::null());
        assert_eq!(obj.to_map(), serde_json::json!({"x": 1}));
    }

    #[test]
    fn to_map_keeps_nulls_when_open() {
        let mut cfg = JsonConfig::default();
        cfg.null = NullConfig {
            open: true,
            placeholder: "N/A".to_string(),
        };
        let mut obj = JsonObject::with_config(cfg.into_ref());
        obj.put("x", Value::null());
        assert_eq!(obj.to_map(), serde_json::json!({"x": null}));
    }

    #[test]
    fn to_map_recurses() {
        let mut inner = JsonObject::new();
        inner.put("n", 2);
        let mut obj = JsonObject::new();
        obj.put("inner", inner);
        obj.put("s", "txt");
        assert_eq!(obj.to_map(), serde_json::json!({"inner": {"n": 2}, "s": "txt"}));
    }

    #[test]
    fn snapshot_on_self_insert() {
        // Ownership makes true self-containment impossible; inserting a
        // clone reproduces the insert-time-snapshot behavior.
        let mut obj = JsonObject::new();
        obj.put("a", 1);
        let snapshot = obj.clone();
        obj.put("self", snapshot);
        let nested = obj.get("self").unwrap();
        let Payload::Object(inner) = nested.payload() else {
            panic!("expected object");
        };
        assert!(inner.has_key("a"));
        assert!(!inner.has_key("self"));
    }

    #[test]
    fn config_propagates_on_read_only() {
        let mut obj = JsonObject::new();
        obj.put("a", 1);
        let before = obj.get("a").unwrap();
        let open = JsonConfig {
            null: NullConfig {
                open: true,
                placeholder: "-".into(),
            },
            ..JsonConfig::default()
        };
        obj.set_config(open.into_ref());
        let after = obj.get("a").unwrap();
        assert!(!before.config().null.open);
        assert!(after.config().null.open);
    }
}
