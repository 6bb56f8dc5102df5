//! Value — the tagged union at the center of the engine.
//!
//! A [`Value`] pairs a [`Payload`] with its declared [`Kind`], an optional
//! per-value format pattern, and the [`ConfigRef`] it was stamped with when
//! it was retrieved from a container.
//!
//! # Payload kinds
//!
//! | Rust variant | JSON form        | Notes                               |
//! |--------------|------------------|-------------------------------------|
//! | `Null`       | `null`           | keeps a declared [`Kind`] for typed nulls |
//! | `Bool`       | `true`/`false`   |                                     |
//! | `Int`        | number           | `i64`                               |
//! | `BigInt`     | number           | `i128`, integers past `i64`         |
//! | `Float`      | number           | `f64`                               |
//! | `Text`       | string           |                                     |
//! | `Temporal`   | string           | rendered via `DateFormatConfig`     |
//! | `Array`      | array            |                                     |
//! | `Object`     | object           |                                     |
//! | `Record`     | object           | typed record, projected on demand   |

pub mod get;

use std::fmt;

use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::array::JsonArray;
use crate::bind::ErasedRecord;
use crate::config::{ConfigRef, JsonConfig};
use crate::object::JsonObject;

pub use get::{FromValue, ToValue};

// ── Temporal ──────────────────────────────────────────────────────────────

/// One temporal payload, by kind.
///
/// All four kinds are inter-convertible; missing components default to
/// midnight, the UTC offset, or the epoch date as appropriate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temporal {
    /// An absolute instant (also the carrier for epoch milliseconds).
    Timestamp(OffsetDateTime),
    /// A civil date and time without offset.
    DateTime(PrimitiveDateTime),
    /// A civil date.
    Date(Date),
    /// A civil time of day.
    Time(Time),
}

impl Temporal {
    pub fn kind(&self) -> Kind {
        match self {
            Temporal::Timestamp(_) => Kind::Timestamp,
            Temporal::DateTime(_) => Kind::DateTime,
            Temporal::Date(_) => Kind::Date,
            Temporal::Time(_) => Kind::Time,
        }
    }

    /// View as an absolute instant, assuming UTC for civil kinds.
    pub fn as_timestamp(&self) -> OffsetDateTime {
        match *self {
            Temporal::Timestamp(ts) => ts,
            Temporal::DateTime(dt) => dt.assume_utc(),
            Temporal::Date(d) => PrimitiveDateTime::new(d, Time::MIDNIGHT).assume_utc(),
            Temporal::Time(t) => PrimitiveDateTime::new(OffsetDateTime::UNIX_EPOCH.date(), t)
                .assume_utc(),
        }
    }

    /// View as a civil date-time.
    pub fn as_date_time(&self) -> PrimitiveDateTime {
        match *self {
            Temporal::Timestamp(ts) => PrimitiveDateTime::new(ts.date(), ts.time()),
            Temporal::DateTime(dt) => dt,
            Temporal::Date(d) => PrimitiveDateTime::new(d, Time::MIDNIGHT),
            Temporal::Time(t) => PrimitiveDateTime::new(OffsetDateTime::UNIX_EPOCH.date(), t),
        }
    }

    pub fn as_date(&self) -> Date {
        self.as_date_time().date()
    }

    pub fn as_time(&self) -> Time {
        self.as_date_time().time()
    }

    /// Milliseconds since the Unix epoch (UTC assumed for civil kinds).
    pub fn epoch_millis(&self) -> i64 {
        (self.as_timestamp().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

// ── Kind ──────────────────────────────────────────────────────────────────

/// Declared type tag of a [`Value`].
///
/// Normally mirrors the payload variant, but survives a `Null` payload so a
/// typed null (an integer-valued field holding nothing) can still render its
/// per-kind default under a closed `NullConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Int,
    BigInt,
    Float,
    Text,
    Timestamp,
    DateTime,
    Date,
    Time,
    Array,
    Object,
    Record,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::BigInt => "bigint",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Timestamp => "timestamp",
            Kind::DateTime => "datetime",
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Record => "record",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::BigInt | Kind::Float)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Kind::Timestamp | Kind::DateTime | Kind::Date | Kind::Time)
    }
}

// ── Payload ───────────────────────────────────────────────────────────────

/// The closed sum of everything a [`Value`] can hold.
#[derive(Debug)]
pub enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    BigInt(i128),
    Float(f64),
    Text(String),
    Temporal(Temporal),
    Array(JsonArray),
    Object(JsonObject),
    Record(Box<dyn ErasedRecord>),
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Null => Kind::Null,
            Payload::Bool(_) => Kind::Bool,
            Payload::Int(_) => Kind::Int,
            Payload::BigInt(_) => Kind::BigInt,
            Payload::Float(_) => Kind::Float,
            Payload::Text(_) => Kind::Text,
            Payload::Temporal(t) => t.kind(),
            Payload::Array(_) => Kind::Array,
            Payload::Object(_) => Kind::Object,
            Payload::Record(_) => Kind::Record,
        }
    }
}

impl Clone for Payload {
    fn clone(&self) -> Self {
        match self {
            Payload::Null => Payload::Null,
            Payload::Bool(b) => Payload::Bool(*b),
            Payload::Int(i) => Payload::Int(*i),
            Payload::BigInt(i) => Payload::BigInt(*i),
            Payload::Float(f) => Payload::Float(*f),
            Payload::Text(s) => Payload::Text(s.clone()),
            Payload::Temporal(t) => Payload::Temporal(*t),
            Payload::Array(a) => Payload::Array(a.clone()),
            Payload::Object(o) => Payload::Object(o.clone()),
            Payload::Record(r) => Payload::Record(r.clone_boxed()),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Null, Payload::Null) => true,
            (Payload::Bool(a), Payload::Bool(b)) => a == b,
            (Payload::Int(a), Payload::Int(b)) => a == b,
            (Payload::BigInt(a), Payload::BigInt(b)) => a == b,
            (Payload::Int(a), Payload::BigInt(b)) | (Payload::BigInt(b), Payload::Int(a)) => {
                i128::from(*a) == *b
            }
            (Payload::Float(a), Payload::Float(b)) => a == b,
            (Payload::Text(a), Payload::Text(b)) => a == b,
            (Payload::Temporal(a), Payload::Temporal(b)) => a == b,
            (Payload::Array(a), Payload::Array(b)) => a == b,
            (Payload::Object(a), Payload::Object(b)) => a == b,
            (Payload::Record(a), Payload::Record(b)) => {
                let cfg = JsonConfig::default_ref();
                a.record_name() == b.record_name() && a.to_object(&cfg) == b.to_object(&cfg)
            }
            _ => false,
        }
    }
}

// ── Value ─────────────────────────────────────────────────────────────────

/// A single JSON-model entity: payload + declared kind + format + config.
#[derive(Clone)]
pub struct Value {
    payload: Payload,
    kind: Kind,
    format: Option<String>,
    config: ConfigRef,
}

impl Value {
    /// Wraps a payload; the declared kind mirrors the payload tag.
    pub fn new(payload: Payload) -> Self {
        let kind = payload.kind();
        Self {
            payload,
            kind,
            format: None,
            config: JsonConfig::default_ref(),
        }
    }

    /// An untyped null.
    pub fn null() -> Self {
        Self::new(Payload::Null)
    }

    /// A null that remembers the kind it stands in for, so a closed
    /// `NullConfig` can render the matching per-kind default.
    pub fn null_of(kind: Kind) -> Self {
        let mut v = Self::new(Payload::Null);
        v.kind = kind;
        v
    }

    /// Wraps a typed record.
    pub fn record<T: crate::bind::JsonRecord>(record: T) -> Self {
        Self::new(Payload::Record(Box::new(record)))
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// The declared kind (survives a null payload).
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    /// Null or empty-text: treated as missing by every getter except
    /// [`get_string`](Self::get_string).
    pub fn is_absent(&self) -> bool {
        match &self.payload {
            Payload::Null => true,
            Payload::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.payload, Payload::Record(_))
    }

    /// Attaches a per-value format pattern (wins over the config pattern).
    pub fn with_format(mut self, pattern: impl Into<String>) -> Self {
        self.format = Some(pattern.into());
        self
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn set_format(&mut self, pattern: Option<String>) {
        self.format = pattern;
    }

    pub fn config(&self) -> &ConfigRef {
        &self.config
    }

    /// Stamps the value with a container's current config. Called by the
    /// containers on retrieval (propagate-on-read).
    pub fn stamped(mut self, config: &ConfigRef) -> Self {
        self.config = ConfigRef::clone(config);
        self
    }

    pub fn set_config(&mut self, config: &ConfigRef) {
        self.config = ConfigRef::clone(config);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Value");
        d.field("kind", &self.kind).field("payload", &self.payload);
        if let Some(fmt_pattern) = &self.format {
            d.field("format", fmt_pattern);
        }
        d.finish()
    }
}

/// Structural equality: payload only. Config refs and format patterns do not
/// participate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

// ── Conversions in ────────────────────────────────────────────────────────

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::new(Payload::Bool(b))
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(i: $t) -> Self {
                Self::new(Payload::Int(i64::from(i)))
            }
        }
    )*};
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        Self::new(Payload::BigInt(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Self::new(Payload::Int(i)),
            Err(_) => Self::new(Payload::BigInt(i128::from(u))),
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::new(Payload::Float(f64::from(f)))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::new(Payload::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::new(Payload::Text(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::new(Payload::Text(s))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::new(Payload::Text(c.to_string()))
    }
}

impl From<Temporal> for Value {
    fn from(t: Temporal) -> Self {
        Self::new(Payload::Temporal(t))
    }
}

impl From<OffsetDateTime> for Value {
    fn from(ts: OffsetDateTime) -> Self {
        Self::new(Payload::Temporal(Temporal::Timestamp(ts)))
    }
}

impl From<PrimitiveDateTime> for Value {
    fn from(dt: PrimitiveDateTime) -> Self {
        Self::new(Payload::Temporal(Temporal::DateTime(dt)))
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Self::new(Payload::Temporal(Temporal::Date(d)))
    }
}

impl From<Time> for Value {
    fn from(t: Time) -> Self {
        Self::new(Payload::Temporal(Temporal::Time(t)))
    }
}

impl From<JsonArray> for Value {
    fn from(a: JsonArray) -> Self {
        Self::new(Payload::Array(a))
    }
}

impl From<JsonObject> for Value {
    fn from(o: JsonObject) -> Self {
        Self::new(Payload::Object(o))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn kind_mirrors_payload() {
        assert_eq!(Value::from(1i32).kind(), Kind::Int);
        assert_eq!(Value::from(1.5f64).kind(), Kind::Float);
        assert_eq!(Value::from("x").kind(), Kind::Text);
        assert_eq!(Value::from(date!(2024 - 05 - 01)).kind(), Kind::Date);
    }

    #[test]
    fn typed_null_keeps_declared_kind() {
        let v = Value::null_of(Kind::Int);
        assert!(v.is_null());
        assert_eq!(v.kind(), Kind::Int);
    }

    #[test]
    fn absence_rules() {
        assert!(Value::null().is_absent());
        assert!(Value::from("").is_absent());
        assert!(!Value::from(" ").is_absent());
        assert!(!Value::from(0i32).is_absent());
    }

    #[test]
    fn temporal_conversions_agree() {
        let dt = Temporal::DateTime(datetime!(2024-05-01 12:30:00));
        assert_eq!(dt.as_date(), date!(2024 - 05 - 01));
        assert_eq!(dt.as_time(), time!(12:30:00));
        assert_eq!(
            dt.as_timestamp(),
            datetime!(2024-05-01 12:30:00).assume_utc()
        );
    }

    #[test]
    fn epoch_millis_of_epoch_is_zero() {
        let t = Temporal::Timestamp(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(t.epoch_millis(), 0);
    }

    #[test]
    fn int_and_bigint_compare_equal() {
        assert_eq!(Value::from(7i64), Value::from(7i128));
    }
}
