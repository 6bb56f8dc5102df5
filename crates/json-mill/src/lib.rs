//! json-mill — a configurable JSON engine.
//!
//! A self-contained value model with a hand-written parser, a policy-driven
//! serializer, and a coercion layer between model values and strongly typed
//! targets, including record types described by static field tables.
//!
//! # Components
//!
//! | Module       | Role                                                    |
//! |--------------|---------------------------------------------------------|
//! | `config`     | null/number/date/escaping policy, shared by reference   |
//! | `value`      | tagged-union payload + typed strict/defaulted getters   |
//! | `object`     | ordered key→value container with accumulate semantics   |
//! | `array`      | ordered value sequence                                  |
//! | `parser`     | text → model, explicit bracket + value stacks           |
//! | `serializer` | model → text, config-driven, optional indentation       |
//! | `bind`       | record ↔ object marshalling over field descriptors      |
//!
//! # Example
//!
//! ```
//! use json_mill::{JsonParser, JsonSerializer};
//!
//! let obj = JsonParser::default()
//!     .parse_object(r#"{"name":"Ann","age":30,"tags":["x","y"]}"#)
//!     .unwrap();
//! assert_eq!(obj.get("age").unwrap().get_i32().unwrap(), 30);
//! assert_eq!(
//!     JsonSerializer::default().serialize_object(&obj),
//!     r#"{"name":"Ann","age":30,"tags":["x","y"]}"#,
//! );
//! ```

pub mod array;
pub mod bind;
pub mod config;
pub mod error;
pub mod object;
pub mod parser;
pub mod serializer;
pub mod value;

pub use array::JsonArray;
pub use bind::{from_object, to_object, FieldSpec, JsonRecord};
pub use config::{
    ConfigRef, DateFormatConfig, JsonConfig, NullConfig, NumberConfig, RoundingMode,
    SpecialCharacterConfig,
};
pub use error::{CoerceError, ParseError};
pub use object::JsonObject;
pub use parser::JsonParser;
pub use serializer::JsonSerializer;
pub use value::{FromValue, Kind, Payload, Temporal, ToValue, Value};

/// Parses a document with the default config.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    JsonParser::default().parse(text)
}

/// Serializes a value with the config it carries, compact form.
pub fn to_string(value: &Value) -> String {
    JsonSerializer::new(ConfigRef::clone(value.config())).serialize(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_stringify_round_trip() {
        let text = r#"{"a":[1,2.5,null],"b":{"c":"d"}}"#;
        let value = parse(text).unwrap();
        assert_eq!(to_string(&value), text);
    }

    #[test]
    fn defaulted_getter_on_bad_payload() {
        let obj = JsonParser::default()
            .parse_object(r#"{"n":"oops"}"#)
            .unwrap();
        assert_eq!(obj.get("n").unwrap().get_i32_or(42), 42);
    }
}
