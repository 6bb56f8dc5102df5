//! Typed accessors for [`Value`].
//!
//! Every getter comes in a strict form (`get_x() -> Result<X, CoerceError>`)
//! and a defaulted form (`get_x_or(default) -> X`, never fails). A null or
//! empty-text payload is absent for every getter except
//! [`get_string`](Value::get_string).

use std::collections::HashSet;
use std::hash::Hash;

use time::format_description::OwnedFormatItem;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use json_mill_util::{compile_format, format_f64};

use crate::array::JsonArray;
use crate::bind::{self, JsonRecord};
use crate::error::CoerceError;
use crate::object::JsonObject;
use crate::value::{Payload, Temporal, Value};

/// Grouping separators stripped from numeric text when a format pattern is
/// attached to the value.
const GROUPING: &[char] = &[',', '_', ' '];

impl Value {
    fn absent(&self) -> Result<(), CoerceError> {
        if self.is_absent() {
            Err(CoerceError::Absent)
        } else {
            Ok(())
        }
    }

    fn mismatch(&self, to: &'static str) -> CoerceError {
        CoerceError::Mismatch {
            from: self.kind().name(),
            to,
        }
    }

    /// Numeric text, with grouping separators stripped when the value
    /// carries a format pattern.
    fn numeric_text(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if self.format().is_some() {
            trimmed.chars().filter(|c| !GROUPING.contains(c)).collect()
        } else {
            trimmed.to_string()
        }
    }

    // ── Integers ──────────────────────────────────────────────────────────

    pub fn get_i64(&self) -> Result<i64, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Int(i) => Ok(*i),
            Payload::BigInt(i) => i64::try_from(*i).map_err(|_| CoerceError::OutOfRange("i64")),
            Payload::Float(f) => float_to_int(*f, "i64"),
            Payload::Text(s) => {
                let s = self.numeric_text(s);
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                match s.parse::<f64>() {
                    Ok(f) => float_to_int(f, "i64"),
                    Err(_) => Err(CoerceError::InvalidNumber(s)),
                }
            }
            _ => Err(self.mismatch("i64")),
        }
    }

    pub fn get_i64_or(&self, default: i64) -> i64 {
        self.get_i64().unwrap_or(default)
    }

    pub fn get_i128(&self) -> Result<i128, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Int(i) => Ok(i128::from(*i)),
            Payload::BigInt(i) => Ok(*i),
            Payload::Float(f) => float_to_int(*f, "i128").map(i128::from),
            Payload::Text(s) => {
                let s = self.numeric_text(s);
                s.parse::<i128>()
                    .or_else(|_| match s.parse::<f64>() {
                        Ok(f) => float_to_int(f, "i128").map(i128::from),
                        Err(_) => Err(CoerceError::InvalidNumber(s.clone())),
                    })
            }
            _ => Err(self.mismatch("i128")),
        }
    }

    pub fn get_i128_or(&self, default: i128) -> i128 {
        self.get_i128().unwrap_or(default)
    }

    pub fn get_i32(&self) -> Result<i32, CoerceError> {
        i32::try_from(self.get_i64()?).map_err(|_| CoerceError::OutOfRange("i32"))
    }

    pub fn get_i32_or(&self, default: i32) -> i32 {
        self.get_i32().unwrap_or(default)
    }

    pub fn get_i16(&self) -> Result<i16, CoerceError> {
        i16::try_from(self.get_i64()?).map_err(|_| CoerceError::OutOfRange("i16"))
    }

    pub fn get_i16_or(&self, default: i16) -> i16 {
        self.get_i16().unwrap_or(default)
    }

    pub fn get_i8(&self) -> Result<i8, CoerceError> {
        i8::try_from(self.get_i64()?).map_err(|_| CoerceError::OutOfRange("i8"))
    }

    pub fn get_i8_or(&self, default: i8) -> i8 {
        self.get_i8().unwrap_or(default)
    }

    // ── Floats ────────────────────────────────────────────────────────────

    pub fn get_f64(&self) -> Result<f64, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Int(i) => Ok(*i as f64),
            Payload::BigInt(i) => Ok(*i as f64),
            Payload::Float(f) => Ok(*f),
            Payload::Text(s) => {
                let s = self.numeric_text(s);
                s.parse::<f64>().map_err(|_| CoerceError::InvalidNumber(s))
            }
            _ => Err(self.mismatch("f64")),
        }
    }

    pub fn get_f64_or(&self, default: f64) -> f64 {
        self.get_f64().unwrap_or(default)
    }

    pub fn get_f32(&self) -> Result<f32, CoerceError> {
        let f = self.get_f64()?;
        if f.is_finite() && (f < f64::from(f32::MIN) || f > f64::from(f32::MAX)) {
            return Err(CoerceError::OutOfRange("f32"));
        }
        Ok(f as f32)
    }

    pub fn get_f32_or(&self, default: f32) -> f32 {
        self.get_f32().unwrap_or(default)
    }

    // ── Bool / char / string ──────────────────────────────────────────────

    pub fn get_bool(&self) -> Result<bool, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Bool(b) => Ok(*b),
            Payload::Int(0) => Ok(false),
            Payload::Int(1) => Ok(true),
            Payload::Int(i) => Err(CoerceError::InvalidBool(i.to_string())),
            Payload::Text(s) => {
                if s.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(CoerceError::InvalidBool(s.clone()))
                }
            }
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn get_bool_or(&self, default: bool) -> bool {
        self.get_bool().unwrap_or(default)
    }

    pub fn get_char(&self) -> Result<char, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(CoerceError::InvalidChar(s.clone())),
                }
            }
            Payload::Int(i) if (0..=9).contains(i) => {
                Ok(char::from_digit(*i as u32, 10).unwrap_or('0'))
            }
            _ => Err(self.mismatch("char")),
        }
    }

    pub fn get_char_or(&self, default: char) -> char {
        self.get_char().unwrap_or(default)
    }

    /// Stringifies a scalar payload. Unlike every other getter, a null
    /// payload yields the empty string rather than an absence error.
    pub fn get_string(&self) -> Result<String, CoerceError> {
        match self.payload() {
            Payload::Null => Ok(String::new()),
            Payload::Bool(b) => Ok(b.to_string()),
            Payload::Int(i) => Ok(i.to_string()),
            Payload::BigInt(i) => Ok(i.to_string()),
            Payload::Float(f) => Ok(format_f64(*f)),
            Payload::Text(s) => Ok(s.clone()),
            Payload::Temporal(t) => Ok(crate::serializer::natural_temporal(t)),
            Payload::Array(_) | Payload::Object(_) | Payload::Record(_) => {
                Err(self.mismatch("string"))
            }
        }
    }

    pub fn get_string_or(&self, default: impl Into<String>) -> String {
        self.get_string().unwrap_or_else(|_| default.into())
    }

    // ── Temporals ─────────────────────────────────────────────────────────

    fn temporal_pattern(&self, config_pattern: &str) -> Result<OwnedFormatItem, CoerceError> {
        let pattern = self.format().unwrap_or(config_pattern);
        compile_format(pattern).map_err(|_| CoerceError::BadFormat(pattern.to_string()))
    }

    fn temporal_from_millis(millis: i64) -> Result<Temporal, CoerceError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map(Temporal::Timestamp)
            .map_err(|e| CoerceError::InvalidTemporal {
                value: millis.to_string(),
                reason: e.to_string(),
            })
    }

    /// The payload as a [`Temporal`], parsing text with `config_pattern`
    /// (the value's own format pattern wins) and treating integers as epoch
    /// milliseconds.
    fn get_temporal(
        &self,
        config_pattern: &str,
        parse: fn(&str, &OwnedFormatItem) -> Result<Temporal, time::error::Parse>,
    ) -> Result<Temporal, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Temporal(t) => Ok(*t),
            Payload::Int(ms) => Self::temporal_from_millis(*ms),
            Payload::Text(s) => {
                let fmt = self.temporal_pattern(config_pattern)?;
                parse(s.trim(), &fmt).map_err(|e| CoerceError::InvalidTemporal {
                    value: s.clone(),
                    reason: e.to_string(),
                })
            }
            _ => Err(self.mismatch("temporal")),
        }
    }

    /// An absolute instant (UTC assumed for civil payloads).
    pub fn get_timestamp(&self) -> Result<OffsetDateTime, CoerceError> {
        self.get_temporal(&self.config().date.date_time_format, |s, fmt| {
            PrimitiveDateTime::parse(s, fmt).map(|dt| Temporal::Timestamp(dt.assume_utc()))
        })
        .map(|t| t.as_timestamp())
    }

    pub fn get_timestamp_or(&self, default: OffsetDateTime) -> OffsetDateTime {
        self.get_timestamp().unwrap_or(default)
    }

    /// Milliseconds since the Unix epoch.
    pub fn get_epoch_millis(&self) -> Result<i64, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Int(ms) => Ok(*ms),
            Payload::Text(s) => match s.trim().parse::<i64>() {
                Ok(ms) => Ok(ms),
                Err(_) => self
                    .get_timestamp()
                    .map(|ts| (ts.unix_timestamp_nanos() / 1_000_000) as i64),
            },
            _ => self
                .get_timestamp()
                .map(|ts| (ts.unix_timestamp_nanos() / 1_000_000) as i64),
        }
    }

    pub fn get_epoch_millis_or(&self, default: i64) -> i64 {
        self.get_epoch_millis().unwrap_or(default)
    }

    pub fn get_date_time(&self) -> Result<PrimitiveDateTime, CoerceError> {
        self.get_temporal(&self.config().date.date_time_format, |s, fmt| {
            PrimitiveDateTime::parse(s, fmt).map(Temporal::DateTime)
        })
        .map(|t| t.as_date_time())
    }

    pub fn get_date_time_or(&self, default: PrimitiveDateTime) -> PrimitiveDateTime {
        self.get_date_time().unwrap_or(default)
    }

    pub fn get_date(&self) -> Result<Date, CoerceError> {
        self.get_temporal(&self.config().date.date_format, |s, fmt| {
            Date::parse(s, fmt).map(Temporal::Date)
        })
        .map(|t| t.as_date())
    }

    pub fn get_date_or(&self, default: Date) -> Date {
        self.get_date().unwrap_or(default)
    }

    pub fn get_time(&self) -> Result<Time, CoerceError> {
        self.get_temporal(&self.config().date.time_format, |s, fmt| {
            Time::parse(s, fmt).map(Temporal::Time)
        })
        .map(|t| t.as_time())
    }

    pub fn get_time_or(&self, default: Time) -> Time {
        self.get_time().unwrap_or(default)
    }

    // ── Containers ────────────────────────────────────────────────────────

    /// The raw nested array, stamped with this value's config.
    pub fn get_array(&self) -> Result<JsonArray, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Array(a) => {
                let mut a = a.clone();
                a.set_config(crate::config::ConfigRef::clone(self.config()));
                Ok(a)
            }
            _ => Err(self.mismatch("array")),
        }
    }

    /// Element-wise coercion of an array payload into `Vec<T>`.
    pub fn get_list<T: FromValue>(&self) -> Result<Vec<T>, CoerceError> {
        self.get_array()?.to_vec()
    }

    /// Element-wise coercion of an array payload into a set.
    pub fn get_set<T: FromValue + Eq + Hash>(&self) -> Result<HashSet<T>, CoerceError> {
        Ok(self.get_list()?.into_iter().collect())
    }

    /// Comma-joined per-element stringification of an array payload, for
    /// flattened dot-path representations.
    pub fn get_array_string(&self) -> Result<String, CoerceError> {
        let arr = self.get_array()?;
        let mut parts = Vec::with_capacity(arr.len());
        for item in arr.iter() {
            let part = match item.payload() {
                Payload::Array(a) => a.to_list().to_string(),
                Payload::Object(o) => o.to_map().to_string(),
                Payload::Record(r) => r.to_object(self.config()).to_map().to_string(),
                _ => item.get_string()?,
            };
            parts.push(part);
        }
        Ok(json_mill_util::join(parts, ","))
    }

    /// The nested object, or a record's field projection.
    pub fn get_object(&self) -> Result<JsonObject, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Object(o) => {
                let mut o = o.clone();
                o.set_config(crate::config::ConfigRef::clone(self.config()));
                Ok(o)
            }
            Payload::Record(r) => Ok(r.to_object(self.config())),
            _ => Err(self.mismatch("object")),
        }
    }

    /// A typed record: downcasts an already-typed payload, or unmarshals an
    /// object payload field by field.
    pub fn get_record<T: JsonRecord>(&self) -> Result<T, CoerceError> {
        self.absent()?;
        match self.payload() {
            Payload::Record(r) => r
                .as_any()
                .downcast_ref::<T>()
                .cloned()
                .ok_or(CoerceError::NotARecord(std::any::type_name::<T>())),
            Payload::Object(o) => Ok(bind::from_object(o)),
            _ => Err(self.mismatch("record")),
        }
    }

    pub fn get_record_or<T: JsonRecord>(&self, default: T) -> T {
        self.get_record().unwrap_or(default)
    }
}

/// Integral narrowing from a float, Java-cast style (truncation), with a
/// range check instead of saturation.
fn float_to_int(f: f64, to: &'static str) -> Result<i64, CoerceError> {
    if !f.is_finite() {
        return Err(CoerceError::InvalidNumber(f.to_string()));
    }
    let t = f.trunc();
    if t < i64::MIN as f64 || t > i64::MAX as f64 {
        return Err(CoerceError::OutOfRange(to));
    }
    Ok(t as i64)
}

// ── FromValue / ToValue ───────────────────────────────────────────────────

/// Coercion from a [`Value`], used for container elements and record fields.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CoerceError>;
}

/// Projection into a [`Value`], used for container elements and record
/// fields.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

macro_rules! scalar_from_to {
    ($($t:ty => $get:ident),* $(,)?) => {$(
        impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self, CoerceError> {
                value.$get()
            }
        }

        impl ToValue for $t {
            fn to_value(&self) -> Value {
                Value::from(self.clone())
            }
        }
    )*};
}

scalar_from_to!(
    bool => get_bool,
    i8 => get_i8,
    i16 => get_i16,
    i32 => get_i32,
    i64 => get_i64,
    i128 => get_i128,
    f32 => get_f32,
    f64 => get_f64,
    char => get_char,
    String => get_string,
    Date => get_date,
    Time => get_time,
    PrimitiveDateTime => get_date_time,
    OffsetDateTime => get_timestamp,
);

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        Ok(value.clone())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl FromValue for JsonArray {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        value.get_array()
    }
}

impl ToValue for JsonArray {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl FromValue for JsonObject {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        value.get_object()
    }
}

impl ToValue for JsonObject {
    fn to_value(&self) -> Value {
        Value::from(self.clone())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        value.get_list()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        let mut arr = JsonArray::new();
        for item in self {
            arr.push(item.to_value());
        }
        Value::from(arr)
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        value.get_set()
    }
}

impl<T: ToValue> ToValue for HashSet<T> {
    fn to_value(&self) -> Value {
        let mut arr = JsonArray::new();
        for item in self {
            arr.push(item.to_value());
        }
        Value::from(arr)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, CoerceError> {
        if value.is_absent() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DateFormatConfig, JsonConfig};
    use time::macros::{date, datetime, time};

    #[test]
    fn numeric_widening_and_narrowing() {
        assert_eq!(Value::from(42i32).get_i64().unwrap(), 42);
        assert!(matches!(
            Value::from(300i64).get_i8(),
            Err(CoerceError::OutOfRange("i8"))
        ));
        assert_eq!(Value::from(3.9f64).get_i32().unwrap(), 3);
        assert_eq!(Value::from(7i32).get_f64().unwrap(), 7.0);
        assert_eq!(Value::from(i128::from(i64::MAX) + 1).get_i128().unwrap(), i128::from(i64::MAX) + 1);
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(Value::from("123").get_i64().unwrap(), 123);
        assert_eq!(Value::from(" 2.5 ").get_f64().unwrap(), 2.5);
        assert!(matches!(
            Value::from("oops").get_i64(),
            Err(CoerceError::InvalidNumber(_))
        ));
        // grouping separators only stripped when a format pattern is set
        assert!(Value::from("1,234").get_i64().is_err());
        let grouped = Value::from("1,234").with_format("#,##0");
        assert_eq!(grouped.get_i64().unwrap(), 1234);
    }

    #[test]
    fn defaulted_getters_never_fail() {
        assert_eq!(Value::from("oops").get_i32_or(42), 42);
        assert_eq!(Value::null().get_f64_or(1.5), 1.5);
        assert_eq!(Value::from("").get_bool_or(true), true);
    }

    #[test]
    fn bool_coercions() {
        assert!(Value::from("TRUE").get_bool().unwrap());
        assert!(!Value::from("false").get_bool().unwrap());
        assert!(Value::from(1).get_bool().unwrap());
        assert!(!Value::from(0).get_bool().unwrap());
        assert!(matches!(
            Value::from(2).get_bool(),
            Err(CoerceError::InvalidBool(_))
        ));
        assert!(matches!(
            Value::from("yes").get_bool(),
            Err(CoerceError::InvalidBool(_))
        ));
    }

    #[test]
    fn char_coercions() {
        assert_eq!(Value::from("x").get_char().unwrap(), 'x');
        assert_eq!(Value::from('é').get_char().unwrap(), 'é');
        assert!(Value::from("xy").get_char().is_err());
    }

    #[test]
    fn string_getter_tolerates_null() {
        assert_eq!(Value::null().get_string().unwrap(), "");
        assert_eq!(Value::from(3i32).get_string().unwrap(), "3");
        assert_eq!(Value::from(1.0f64).get_string().unwrap(), "1.0");
        assert_eq!(Value::from(true).get_string().unwrap(), "true");
    }

    #[test]
    fn temporal_cross_conversions() {
        let v = Value::from(datetime!(2024-05-01 12:00:00));
        assert_eq!(v.get_date().unwrap(), date!(2024 - 05 - 01));
        assert_eq!(v.get_time().unwrap(), time!(12:00:00));
        assert_eq!(
            v.get_timestamp().unwrap(),
            datetime!(2024-05-01 12:00:00).assume_utc()
        );
    }

    #[test]
    fn temporal_from_epoch_millis() {
        let v = Value::from(0i64);
        assert_eq!(v.get_timestamp().unwrap(), OffsetDateTime::UNIX_EPOCH);
        assert_eq!(Value::from(datetime!(1970-01-01 00:00:01)).get_epoch_millis().unwrap(), 1000);
    }

    #[test]
    fn temporal_from_text_uses_config_pattern() {
        let v = Value::from("2024-05-01");
        assert_eq!(v.get_date().unwrap(), date!(2024 - 05 - 01));
    }

    #[test]
    fn temporal_value_format_wins_over_config() {
        let mut cfg = JsonConfig::default();
        cfg.date = DateFormatConfig::default();
        let v = Value::from("01/05/2024")
            .with_format("[day]/[month]/[year]")
            .stamped(&cfg.into_ref());
        assert_eq!(v.get_date().unwrap(), date!(2024 - 05 - 01));
    }

    #[test]
    fn list_and_set_coercion() {
        let v = Value::from(JsonArray::from(vec!["1", "2", "2"]));
        assert_eq!(v.get_list::<i32>().unwrap(), vec![1, 2, 2]);
        let set = v.get_set::<i32>().unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn array_string_joins_elements() {
        let v = Value::from(JsonArray::from(vec![
            Value::from(1),
            Value::from("x"),
            Value::from(true),
        ]));
        assert_eq!(v.get_array_string().unwrap(), "1,x,true");
    }

    #[test]
    fn absent_payloads_reject_strictly() {
        assert!(matches!(Value::null().get_i64(), Err(CoerceError::Absent)));
        assert!(matches!(Value::from("").get_date(), Err(CoerceError::Absent)));
    }
}
