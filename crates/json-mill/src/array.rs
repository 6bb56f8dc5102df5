//! JsonArray — ordered sequence of values.
//!
//! Same config semantics as [`JsonObject`](crate::object::JsonObject):
//! elements are stamped with the array's current config on retrieval.

use serde_json::Value as JsonValue;

use crate::config::{ConfigRef, JsonConfig};
use crate::error::CoerceError;
use crate::object::flatten;
use crate::value::{FromValue, Value};

/// Ordered list of values.
#[derive(Debug, Clone)]
pub struct JsonArray {
    items: Vec<Value>,
    config: ConfigRef,
}

impl Default for JsonArray {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonArray {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            config: JsonConfig::default_ref(),
        }
    }

    pub fn with_config(config: ConfigRef) -> Self {
        Self {
            items: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConfigRef {
        &self.config
    }

    /// Replaces the shared config; see `JsonObject::set_config` for the
    /// propagate-on-read contract.
    pub fn set_config(&mut self, config: ConfigRef) {
        self.config = config;
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Inserts at `index`, shifting later elements. `index == len` appends.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<(), CoerceError> {
        if index > self.items.len() {
            return Err(CoerceError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, value.into());
        Ok(())
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Value, CoerceError> {
        if index >= self.items.len() {
            return Err(CoerceError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Retrieves an element, stamped with the current config.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items
            .get(index)
            .map(|v| v.clone().stamped(&self.config))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Coerces every element to `T`, recursing into nested containers.
    pub fn to_vec<T: FromValue>(&self) -> Result<Vec<T>, CoerceError> {
        self.items
            .iter()
            .map(|v| T::from_value(&v.clone().stamped(&self.config)))
            .collect()
    }

    /// Flattens into a plain `serde_json` list, recursing through nested
    /// containers and records.
    pub fn to_list(&self) -> JsonValue {
        JsonValue::Array(
            self.items
                .iter()
                .map(|v| flatten(v, &self.config))
                .collect(),
        )
    }
}

/// Element-wise equality, in order. Config refs are excluded.
impl PartialEq for JsonArray {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Into<Value>> From<Vec<T>> for JsonArray {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Value>> FromIterator<T> for JsonArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = JsonArray::new();
        for item in iter {
            arr.push(item);
        }
        arr
    }
}

impl IntoIterator for JsonArray {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_get() {
        let mut arr = JsonArray::new();
        arr.push(1);
        arr.push("two");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(0).unwrap(), Value::from(1));
        assert_eq!(arr.get(1).unwrap(), Value::from("two"));
        assert!(arr.get(2).is_none());
    }

    #[test]
    fn insert_at_index() {
        let mut arr = JsonArray::from(vec![1, 3]);
        arr.insert(1, 2).unwrap();
        assert_eq!(arr.to_vec::<i32>().unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            arr.insert(9, 0),
            Err(CoerceError::IndexOutOfBounds { index: 9, len: 3 })
        ));
    }

    #[test]
    fn remove_out_of_bounds_errors() {
        let mut arr = JsonArray::from(vec![1]);
        assert_eq!(arr.remove(0).unwrap(), Value::from(1));
        assert!(matches!(
            arr.remove(0),
            Err(CoerceError::IndexOutOfBounds { index: 0, len: 0 })
        ));
    }

    #[test]
    fn element_wise_coercion_recurses() {
        let nested: JsonArray = vec!["1", "2"].into();
        let mut arr = JsonArray::new();
        arr.push(nested);
        let lists: Vec<Vec<i32>> = arr.to_vec().unwrap();
        assert_eq!(lists, vec![vec![1, 2]]);
    }

    #[test]
    fn to_list_flattens() {
        let mut arr = JsonArray::new();
        arr.push(1);
        arr.push("x");
        arr.push(JsonArray::from(vec![true]));
        assert_eq!(arr.to_list(), serde_json::json!([1, "x", [true]]));
    }
}
