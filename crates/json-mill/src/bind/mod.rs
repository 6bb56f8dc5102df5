//! Record marshalling over compile-time field descriptors.
//!
//! The reflective field enumeration of classic bean mappers is replaced by a
//! static descriptor table: a [`JsonRecord`] names its fields as
//! [`FieldSpec`]s carrying read/write fn pointers, an optional external
//! alias, and an optional per-field format pattern. The
//! [`json_record!`](crate::json_record) macro generates the table; hand
//! written impls work the same way.
//!
//! Unmarshalling is deliberately lenient: a field whose coercion fails is
//! logged and left at its default value, the remaining fields still load.

pub mod macros;

use std::any::Any;
use std::fmt;

use crate::config::ConfigRef;
use crate::error::CoerceError;
use crate::object::JsonObject;
use crate::value::Value;

/// One named, typed field of a record.
pub struct FieldSpec<T> {
    pub name: &'static str,
    /// External key override. `Some("")` marks the field unkeyed: it is
    /// skipped in both directions.
    pub alias: Option<&'static str>,
    /// Format pattern stamped onto the projected value and used when
    /// parsing the field back.
    pub format: Option<&'static str>,
    pub read: fn(&T) -> Value,
    pub write: fn(&mut T, &Value) -> Result<(), CoerceError>,
}

impl<T> FieldSpec<T> {
    /// The externally visible key: the alias when declared, else the field
    /// name. `None` for unkeyed fields.
    pub fn key(&self) -> Option<&'static str> {
        match self.alias {
            Some("") => None,
            Some(alias) => Some(alias),
            None => Some(self.name),
        }
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("format", &self.format)
            .finish()
    }
}

/// A structured, named-field type the engine can marshal to and from
/// [`JsonObject`].
pub trait JsonRecord: Default + Clone + fmt::Debug + 'static {
    /// The static field descriptor table.
    fn fields() -> &'static [FieldSpec<Self>];

    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Object-safe shim that lets `Payload::Record` hold any record type.
pub trait ErasedRecord: fmt::Debug {
    fn to_object(&self, config: &ConfigRef) -> JsonObject;
    fn clone_boxed(&self) -> Box<dyn ErasedRecord>;
    fn as_any(&self) -> &dyn Any;
    fn record_name(&self) -> &'static str;
}

impl<T: JsonRecord> ErasedRecord for T {
    fn to_object(&self, config: &ConfigRef) -> JsonObject {
        to_object(self, config)
    }

    fn clone_boxed(&self) -> Box<dyn ErasedRecord> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn record_name(&self) -> &'static str {
        T::record_name()
    }
}

/// Projects a record into a [`JsonObject`]: for each keyed field, read the
/// current value, stamp the field's format pattern and the config, insert.
pub fn to_object<T: JsonRecord>(record: &T, config: &ConfigRef) -> JsonObject {
    let mut obj = JsonObject::with_config(ConfigRef::clone(config));
    for spec in T::fields() {
        let Some(key) = spec.key() else { continue };
        let mut value = (spec.read)(record);
        if let Some(pattern) = spec.format {
            value.set_format(Some(pattern.to_string()));
        }
        value.set_config(config);
        obj.put(key, value);
    }
    obj
}

/// Rebuilds a record from an object. Absent keys keep the default value; a
/// failing coercion is logged and the field keeps its default — the
/// conversion itself never fails.
pub fn from_object<T: JsonRecord>(obj: &JsonObject) -> T {
    let mut record = T::default();
    for spec in T::fields() {
        let Some(key) = spec.key() else { continue };
        let Some(mut value) = obj.get(key) else { continue };
        if value.format().is_none() {
            value.set_format(spec.format.map(str::to_string));
        }
        if let Err(err) = (spec.write)(&mut record, &value) {
            tracing::warn!(
                record = T::record_name(),
                field = spec.name,
                %err,
                "field coercion failed; keeping default"
            );
        }
    }
    record
}
