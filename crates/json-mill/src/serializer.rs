//! Config-driven renderer from the value model back to JSON text.
//!
//! Dispatches on the payload kind: nulls resolve through `NullConfig` before
//! anything else, numbers through `NumberConfig`, temporals through the
//! matching `DateFormatConfig` pattern (a value-level format pattern wins),
//! records recurse through their field projection, containers recurse with
//! the indentation level raised by one step.
//!
//! Without indentation the output is compact: no spaces around `:` or `,`.

use std::fmt;
use std::sync::OnceLock;

use time::format_description::OwnedFormatItem;

use json_mill_util::{compile_format, format_decimal, format_f64, format_int_padded};

use crate::array::JsonArray;
use crate::config::{ConfigRef, JsonConfig};
use crate::object::JsonObject;
use crate::value::{Kind, Payload, Temporal, Value};

const NEWLINE: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const DATE_TIME_NATURAL: &str = "[year]-[month]-[day] [hour]:[minute]:[second]";
const DATE_NATURAL: &str = "[year]-[month]-[day]";
const TIME_NATURAL: &str = "[hour]:[minute]:[second]";

fn natural(pattern: &'static str, cell: &'static OnceLock<OwnedFormatItem>) -> &'static OwnedFormatItem {
    cell.get_or_init(|| compile_format(pattern).expect("static format pattern"))
}

/// Natural textual form of a temporal value: RFC 3339 for instants,
/// `yyyy-MM-dd HH:mm:ss`-shaped civil forms otherwise.
pub(crate) fn natural_temporal(t: &Temporal) -> String {
    static DT: OnceLock<OwnedFormatItem> = OnceLock::new();
    static D: OnceLock<OwnedFormatItem> = OnceLock::new();
    static T: OnceLock<OwnedFormatItem> = OnceLock::new();
    let formatted = match t {
        Temporal::Timestamp(ts) => {
            ts.format(&time::format_description::well_known::Rfc3339)
        }
        Temporal::DateTime(dt) => dt.format(natural(DATE_TIME_NATURAL, &DT)),
        Temporal::Date(d) => d.format(natural(DATE_NATURAL, &D)),
        Temporal::Time(tm) => tm.format(natural(TIME_NATURAL, &T)),
    };
    formatted.unwrap_or_default()
}

/// Renders values, objects, and arrays to text under a [`ConfigRef`].
pub struct JsonSerializer {
    config: ConfigRef,
    indent: Option<usize>,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new(JsonConfig::default_ref())
    }
}

impl JsonSerializer {
    pub fn new(config: ConfigRef) -> Self {
        Self {
            config,
            indent: None,
        }
    }

    /// Enables indentation with `step` spaces per nesting level.
    pub fn indent(mut self, step: usize) -> Self {
        self.indent = Some(step);
        self
    }

    pub fn serialize(&self, value: &Value) -> String {
        let mut out = String::new();
        self.write_any(&mut out, value, 0);
        out
    }

    pub fn serialize_object(&self, obj: &JsonObject) -> String {
        let mut out = String::new();
        self.write_object(&mut out, obj, 0);
        out
    }

    pub fn serialize_array(&self, arr: &JsonArray) -> String {
        let mut out = String::new();
        self.write_array(&mut out, arr, 0);
        out
    }

    fn write_any(&self, out: &mut String, value: &Value, level: usize) {
        match value.payload() {
            Payload::Null => self.write_null(out, value.kind()),
            Payload::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Payload::Int(i) => self.write_int(out, i128::from(*i)),
            Payload::BigInt(i) => self.write_int(out, *i),
            Payload::Float(f) => self.write_float(out, *f),
            Payload::Text(s) => self.write_text(out, s),
            Payload::Temporal(t) => self.write_temporal(out, t, value.format()),
            Payload::Array(a) => self.write_array(out, a, level),
            Payload::Object(o) => self.write_object(out, o, level),
            Payload::Record(r) => self.write_object(out, &r.to_object(&self.config), level),
        }
    }

    /// Null resolution happens before any type-specific rendering: an open
    /// `NullConfig` renders the quoted placeholder, a closed one the
    /// declared kind's zero value.
    fn write_null(&self, out: &mut String, kind: Kind) {
        let nc = &self.config.null;
        if nc.open {
            self.write_text(out, &nc.placeholder);
            return;
        }
        match kind {
            Kind::Int | Kind::BigInt | Kind::Float => out.push('0'),
            Kind::Bool => out.push_str("false"),
            Kind::Text | Kind::Timestamp | Kind::DateTime | Kind::Date | Kind::Time => {
                out.push_str("\"\"")
            }
            Kind::Array => out.push_str("[]"),
            Kind::Object | Kind::Record => out.push_str("{}"),
            Kind::Null => out.push_str("null"),
        }
    }

    fn write_int(&self, out: &mut String, i: i128) {
        let nc = &self.config.number;
        if nc.open {
            out.push_str(&format_int_padded(i, nc.int_digits));
        } else {
            out.push_str(&i.to_string());
        }
    }

    fn write_float(&self, out: &mut String, f: f64) {
        let nc = &self.config.number;
        if !f.is_finite() {
            out.push_str("null");
        } else if nc.open {
            out.push_str(&format_decimal(f, nc.decimal_digits, nc.rounding));
        } else {
            out.push_str(&format_f64(f));
        }
    }

    fn write_text(&self, out: &mut String, s: &str) {
        out.push('"');
        if self.config.special.open {
            for c in s.chars() {
                match c {
                    '\\' => out.push_str("\\\\"),
                    '"' => out.push_str("\\\""),
                    _ => out.push(c),
                }
            }
        } else {
            out.push_str(s);
        }
        out.push('"');
    }

    fn write_temporal(&self, out: &mut String, t: &Temporal, value_format: Option<&str>) {
        let dc = &self.config.date;
        let config_pattern = match t {
            Temporal::Timestamp(_) | Temporal::DateTime(_) => dc.date_time_format.as_str(),
            Temporal::Date(_) => dc.date_format.as_str(),
            Temporal::Time(_) => dc.time_format.as_str(),
        };
        let pattern = value_format.or_else(|| dc.open.then_some(config_pattern));
        let text = pattern
            .and_then(|p| compile_format(p).ok())
            .and_then(|fmt| {
                match t {
                    Temporal::Timestamp(ts) => ts.format(&fmt),
                    Temporal::DateTime(dt) => dt.format(&fmt),
                    Temporal::Date(d) => d.format(&fmt),
                    Temporal::Time(tm) => tm.format(&fmt),
                }
                .ok()
            })
            .unwrap_or_else(|| natural_temporal(t));
        self.write_text(out, &text);
    }

    fn write_object(&self, out: &mut String, obj: &JsonObject, level: usize) {
        out.push('{');
        let inner = level + 1;
        let mut first = true;
        for (key, slot) in obj.slots() {
            if first {
                first = false;
            } else {
                out.push(',');
                self.break_line(out, inner);
            }
            self.write_text(out, key);
            out.push(':');
            match slot {
                crate::object::Slot::One(v) => self.write_any(out, v, inner),
                crate::object::Slot::Many(vs) => self.write_elements(out, vs.iter(), inner),
            }
        }
        if !first {
            self.break_line(out, level);
        }
        out.push('}');
    }

    fn write_array(&self, out: &mut String, arr: &JsonArray, level: usize) {
        self.write_elements(out, arr.iter(), level);
    }

    fn write_elements<'a>(
        &self,
        out: &mut String,
        items: impl Iterator<Item = &'a Value>,
        level: usize,
    ) {
        out.push('[');
        let inner = level + 1;
        let mut first = true;
        for item in items {
            if first {
                first = false;
            } else {
                out.push(',');
                self.break_line(out, inner);
            }
            self.write_any(out, item, inner);
        }
        if !first {
            self.break_line(out, level);
        }
        out.push(']');
    }

    /// In indent mode, a platform newline plus `level × step` spaces.
    fn break_line(&self, out: &mut String, level: usize) {
        if let Some(step) = self.indent {
            out.push_str(NEWLINE);
            for _ in 0..level * step {
                out.push(' ');
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&JsonSerializer::new(ConfigRef::clone(self.config())).serialize(self))
    }
}

impl fmt::Display for JsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(
            &JsonSerializer::new(ConfigRef::clone(self.config())).serialize_object(self),
        )
    }
}

impl fmt::Display for JsonArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&JsonSerializer::new(ConfigRef::clone(self.config())).serialize_array(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DateFormatConfig, NullConfig, NumberConfig, RoundingMode, SpecialCharacterConfig,
    };
    use time::macros::{date, datetime, time};

    fn compact(obj: &JsonObject) -> String {
        JsonSerializer::default().serialize_object(obj)
    }

    #[test]
    fn compact_object_is_byte_exact() {
        let mut obj = JsonObject::new();
        obj.put("name", "Ann");
        obj.put("age", 30);
        obj.put("tags", JsonArray::from(vec!["x", "y"]));
        assert_eq!(compact(&obj), r#"{"name":"Ann","age":30,"tags":["x","y"]}"#);
    }

    #[test]
    fn scalars_render_naturally() {
        let mut obj = JsonObject::new();
        obj.put("b", true);
        obj.put("i", -5);
        obj.put("f", 1.0f64);
        obj.put("g", 2.25f64);
        assert_eq!(compact(&obj), r#"{"b":true,"i":-5,"f":1.0,"g":2.25}"#);
    }

    #[test]
    fn typed_nulls_render_defaults_when_closed() {
        let mut obj = JsonObject::new();
        obj.put("x", Value::null_of(Kind::Int));
        obj.put("s", Value::null_of(Kind::Text));
        obj.put("a", Value::null_of(Kind::Array));
        obj.put("o", Value::null_of(Kind::Object));
        obj.put("n", Value::null());
        assert_eq!(compact(&obj), r#"{"x":0,"s":"","a":[],"o":{},"n":null}"#);
    }

    #[test]
    fn open_null_config_renders_placeholder() {
        let cfg = JsonConfig {
            null: NullConfig {
                open: true,
                placeholder: "N/A".to_string(),
            },
            ..JsonConfig::default()
        };
        let mut obj = JsonObject::new();
        obj.put("x", Value::null_of(Kind::Int));
        let text = JsonSerializer::new(cfg.into_ref()).serialize_object(&obj);
        assert_eq!(text, r#"{"x":"N/A"}"#);
    }

    #[test]
    fn open_number_config_pads_and_rounds() {
        let cfg = JsonConfig {
            number: NumberConfig {
                int_digits: 2,
                decimal_digits: 1,
                rounding: RoundingMode::HalfUp,
                open: true,
            },
            ..JsonConfig::default()
        };
        let mut obj = JsonObject::new();
        obj.put("i", 7);
        obj.put("f", 2.45f64);
        let text = JsonSerializer::new(cfg.into_ref()).serialize_object(&obj);
        assert_eq!(text, r#"{"i":7.00,"f":2.5}"#);
    }

    #[test]
    fn temporals_natural_and_patterned() {
        let mut obj = JsonObject::new();
        obj.put("d", date!(2024 - 05 - 01));
        obj.put("t", time!(09:30:00));
        obj.put("dt", datetime!(2024-05-01 09:30:00));
        assert_eq!(
            compact(&obj),
            r#"{"d":"2024-05-01","t":"09:30:00","dt":"2024-05-01 09:30:00"}"#
        );

        let cfg = JsonConfig {
            date: DateFormatConfig {
                date_format: "[day]/[month]/[year]".to_string(),
                open: true,
                ..DateFormatConfig::default()
            },
            ..JsonConfig::default()
        };
        let mut obj = JsonObject::new();
        obj.put("d", date!(2024 - 05 - 01));
        let text = JsonSerializer::new(cfg.into_ref()).serialize_object(&obj);
        assert_eq!(text, r#"{"d":"01/05/2024"}"#);
    }

    #[test]
    fn value_format_pattern_wins() {
        let mut obj = JsonObject::new();
        obj.put(
            "d",
            Value::from(date!(2024 - 05 - 01)).with_format("[year][month][day]"),
        );
        assert_eq!(compact(&obj), r#"{"d":"20240501"}"#);
    }

    #[test]
    fn escaping_open_and_closed() {
        let mut obj = JsonObject::new();
        obj.put("s", r#"a"b\c"#);
        assert_eq!(compact(&obj), r#"{"s":"a\"b\\c"}"#);

        let cfg = JsonConfig {
            special: SpecialCharacterConfig { open: false },
            ..JsonConfig::default()
        };
        let text = JsonSerializer::new(cfg.into_ref()).serialize_object(&obj);
        assert_eq!(text, r#"{"s":"a"b\c"}"#);
    }

    #[test]
    fn accumulated_slots_render_as_arrays() {
        let mut obj = JsonObject::new();
        obj.accumulate("k", 1);
        obj.accumulate("k", 2);
        assert_eq!(compact(&obj), r#"{"k":[1,2]}"#);
    }

    #[test]
    fn indentation_layout() {
        let mut obj = JsonObject::new();
        obj.put("a", 1);
        obj.put("b", JsonArray::from(vec![1, 2]));
        let text = JsonSerializer::default().indent(2).serialize_object(&obj);
        let nl = NEWLINE;
        let expected =
            format!("{{\"a\":1,{nl}  \"b\":[1,{nl}    2{nl}  ]{nl}}}");
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_containers_stay_inline_under_indent() {
        let mut obj = JsonObject::new();
        obj.put("a", JsonObject::new());
        obj.put("b", JsonArray::new());
        let text = JsonSerializer::default().indent(2).serialize_object(&obj);
        let nl = NEWLINE;
        assert_eq!(text, format!("{{\"a\":{{}},{nl}  \"b\":[]{nl}}}"));
    }

    #[test]
    fn non_finite_floats_render_null() {
        let mut obj = JsonObject::new();
        obj.put("f", f64::NAN);
        assert_eq!(compact(&obj), r#"{"f":null}"#);
    }
}
