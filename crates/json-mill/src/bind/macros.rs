//! Declarative generation of record descriptor tables.
//!
//! [`json_record!`](crate::json_record) declares a plain struct together
//! with its [`JsonRecord`](crate::bind::JsonRecord) impl. Field types go
//! through the [`FromValue`](crate::FromValue)/[`ToValue`](crate::ToValue)
//! seam, so scalars, temporals, `Vec<T>`, `HashSet<T>`, `Option<T>`, and
//! nested records all work. Per field, `as "key"` declares an external
//! alias and `[format "…"]` a format pattern:
//!
//! ```
//! use json_mill::json_record;
//!
//! json_record! {
//!     pub struct Person {
//!         pub name: String as "fullName",
//!         pub age: i32,
//!         pub tags: Vec<String>,
//!     }
//! }
//! ```
//!
//! [`json_enum!`](crate::json_enum) declares a fieldless enum marshalled by
//! variant name; the first variant is the default.

/// Declares a struct and derives its record descriptor table.
#[macro_export]
macro_rules! json_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(as $alias:literal)? $([format $fmt:literal])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $ty, )*
        }

        impl $crate::bind::JsonRecord for $name {
            fn fields() -> &'static [$crate::bind::FieldSpec<Self>] {
                const FIELDS: &[$crate::bind::FieldSpec<$name>] = &[
                    $(
                        $crate::bind::FieldSpec {
                            name: stringify!($field),
                            alias: $crate::__opt_lit!($($alias)?),
                            format: $crate::__opt_lit!($($fmt)?),
                            read: |record| $crate::ToValue::to_value(&record.$field),
                            write: |record, value| {
                                record.$field = $crate::FromValue::from_value(value)?;
                                Ok(())
                            },
                        },
                    )*
                ];
                FIELDS
            }

            fn record_name() -> &'static str {
                stringify!($name)
            }
        }

        impl $crate::FromValue for $name {
            fn from_value(value: &$crate::Value) -> Result<Self, $crate::CoerceError> {
                value.get_record()
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::record(self.clone())
            }
        }
    };
}

/// Declares a fieldless enum marshalled by variant name.
#[macro_export]
macro_rules! json_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $crate::__enum_first!($name; $($variant),+)
            }
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }
        }

        impl $crate::FromValue for $name {
            fn from_value(value: &$crate::Value) -> Result<Self, $crate::CoerceError> {
                let text = value.get_string()?;
                match text.as_str() {
                    $( stringify!($variant) => Ok($name::$variant), )+
                    other => Err($crate::CoerceError::UnknownVariant(other.to_string())),
                }
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::from(self.as_str())
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __opt_lit {
    () => {
        None
    };
    ($lit:literal) => {
        Some($lit)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __enum_first {
    ($name:ident; $first:ident $(, $rest:ident)*) => {
        $name::$first
    };
}

#[cfg(test)]
mod tests {
    use crate::bind::JsonRecord;
    use crate::config::JsonConfig;
    use crate::value::Value;
    use crate::{json_enum, json_record};

    json_enum! {
        enum Color {
            Red,
            Green,
            Blue,
        }
    }

    json_record! {
        struct Person {
            name: String as "fullName",
            age: i32,
            color: Color,
            tags: Vec<String>,
        }
    }

    #[test]
    fn macro_table_matches_declaration() {
        let fields = Person::fields();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].key(), Some("fullName"));
        assert_eq!(fields[1].key(), Some("age"));
        assert_eq!(Person::record_name(), "Person");
    }

    #[test]
    fn macro_record_round_trips() {
        let p = Person {
            name: "Ann".to_string(),
            age: 30,
            color: Color::Blue,
            tags: vec!["x".to_string(), "y".to_string()],
        };
        let obj = crate::bind::to_object(&p, &JsonConfig::default_ref());
        assert_eq!(obj.get("fullName").unwrap().get_string().unwrap(), "Ann");
        assert_eq!(obj.get("color").unwrap().get_string().unwrap(), "Blue");
        let back: Person = crate::bind::from_object(&obj);
        assert_eq!(back, p);
    }

    #[test]
    fn format_and_alias_clauses_land_in_the_table() {
        json_record! {
            struct Stamped {
                at: String [format "[year]-[month]-[day]"],
                by: String as "author" [format "[hour]:[minute]"],
            }
        }

        let fields = Stamped::fields();
        assert_eq!(fields[0].key(), Some("at"));
        assert_eq!(fields[0].format, Some("[year]-[month]-[day]"));
        assert_eq!(fields[1].key(), Some("author"));
        assert_eq!(fields[1].format, Some("[hour]:[minute]"));
    }

    #[test]
    fn enum_defaults_to_first_variant() {
        assert_eq!(Color::default(), Color::Red);
    }

    #[test]
    fn unknown_variant_keeps_default() {
        let mut obj = crate::object::JsonObject::new();
        obj.put("fullName", "Bob");
        obj.put("color", "Purple");
        let p: Person = crate::bind::from_object(&obj);
        assert_eq!(p.name, "Bob");
        assert_eq!(p.color, Color::Red);
    }

    #[test]
    fn nested_record_fields() {
        json_record! {
            struct Team {
                lead: Person,
                size: i32,
            }
        }

        let team = Team {
            lead: Person {
                name: "Ann".to_string(),
                age: 30,
                color: Color::Green,
                tags: vec![],
            },
            size: 5,
        };
        let v = Value::record(team.clone());
        let back: Team = v.get_record().unwrap();
        assert_eq!(back, team);
    }
}
