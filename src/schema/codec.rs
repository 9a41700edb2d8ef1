//! Purpose: Per-field wire coercions and the table macro that builds a record codec.
//! Exports: `WireField`, `record_codec!` (crate-internal).
//! Role: Both record shapes are declared through `record_codec!`; this is the only coercion code.
//! Invariants: Every attribute is declared next to its wire key, so decode/encode cannot drift.
//! Invariants: Missing keys and `null` decode to `None`; unknown wire keys are ignored.
//! Invariants: `""` is only absent for dates; integer and boolean attributes reject it.
//! Invariants: Date attributes encode `None` as `""`; every other kind encodes `None` as `null`.
use super::FieldValue;
use crate::core::datetime::{self, DateTimeValue};
use crate::core::error::{Error, ErrorKind};
use serde_json::{Map, Value};

/// Coercion between one wire value and one typed, nullable attribute.
pub(crate) trait WireField: Sized {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error>;
    fn encode_wire(&self) -> Value;
    fn view_value(&self) -> Option<FieldValue>;
}

impl WireField for Option<i64> {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => number
                .as_i64()
                .map(Some)
                .ok_or_else(|| mismatch("integer", raw)),
            Some(Value::String(text)) => text
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|err| mismatch("integer", raw).with_source(err)),
            Some(_) => Err(mismatch("integer", raw)),
        }
    }

    fn encode_wire(&self) -> Value {
        self.map(Value::from).unwrap_or(Value::Null)
    }

    fn view_value(&self) -> Option<FieldValue> {
        self.map(FieldValue::Integer)
    }
}

impl WireField for Option<bool> {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(mismatch("boolean", raw)),
            },
            Some(Value::String(text)) => match text.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(mismatch("boolean", raw)),
            },
            Some(_) => Err(mismatch("boolean", raw)),
        }
    }

    fn encode_wire(&self) -> Value {
        self.map(Value::Bool).unwrap_or(Value::Null)
    }

    fn view_value(&self) -> Option<FieldValue> {
        self.map(FieldValue::Boolean)
    }
}

impl WireField for Option<String> {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(mismatch("string", raw)),
        }
    }

    fn encode_wire(&self) -> Value {
        self.clone().map(Value::String).unwrap_or(Value::Null)
    }

    fn view_value(&self) -> Option<FieldValue> {
        self.clone().map(FieldValue::Text)
    }
}

impl WireField for Option<DateTimeValue> {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => datetime::decode(text),
            Some(_) => Err(mismatch("date-time string", raw)),
        }
    }

    fn encode_wire(&self) -> Value {
        Value::String(datetime::encode(self.as_ref()))
    }

    fn view_value(&self) -> Option<FieldValue> {
        self.map(FieldValue::DateTime)
    }
}

impl WireField for Option<Map<String, Value>> {
    fn decode_wire(raw: Option<&Value>) -> Result<Self, Error> {
        match raw {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(object)) => Ok(Some(object.clone())),
            Some(_) => Err(mismatch("object", raw)),
        }
    }

    fn encode_wire(&self) -> Value {
        self.clone().map(Value::Object).unwrap_or(Value::Null)
    }

    fn view_value(&self) -> Option<FieldValue> {
        self.clone().map(FieldValue::Mapping)
    }
}

fn mismatch(expected: &str, raw: Option<&Value>) -> Error {
    let found = match raw {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    };
    Error::new(ErrorKind::Decode).with_message(format!("expected {expected}, found {found}"))
}

/// Declares a record struct plus its json decode/encode and by-name lookup.
///
/// Each line reads `rust_field: Type => "wireKey" as "attributeName"`; the
/// struct field becomes `Option<Type>`.
macro_rules! record_codec {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident : $ty:ty => $wire:literal as $attr:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $( pub $field: Option<$ty>, )*
        }

        impl $name {
            /// Attribute names in declaration order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$($attr),*];

            pub fn from_json(
                raw: &serde_json::Value,
            ) -> Result<Self, $crate::core::error::Error> {
                let object = raw.as_object().ok_or_else(|| {
                    $crate::core::error::Error::new($crate::core::error::ErrorKind::Decode)
                        .with_message(concat!(stringify!($name), " json must be an object"))
                })?;
                Ok(Self {
                    $(
                        $field: <Option<$ty> as $crate::schema::codec::WireField>::decode_wire(
                            object.get($wire),
                        )
                        .map_err(|err| err.with_field($wire))?,
                    )*
                })
            }

            pub fn to_json(&self) -> serde_json::Value {
                let mut object = serde_json::Map::new();
                $(
                    object.insert(
                        $wire.to_string(),
                        $crate::schema::codec::WireField::encode_wire(&self.$field),
                    );
                )*
                serde_json::Value::Object(object)
            }

            /// Looks up one attribute by its attribute name.
            pub fn field(
                &self,
                name: &str,
            ) -> Result<Option<$crate::schema::FieldValue>, $crate::core::error::Error> {
                match name {
                    $( $attr => Ok($crate::schema::codec::WireField::view_value(&self.$field)), )*
                    _ => Err(
                        $crate::core::error::Error::new(
                            $crate::core::error::ErrorKind::FieldNotFound,
                        )
                        .with_field(name),
                    ),
                }
            }

            fn view_entries(&self) -> Vec<(&'static str, Option<$crate::schema::FieldValue>)> {
                vec![
                    $( ($attr, $crate::schema::codec::WireField::view_value(&self.$field)), )*
                ]
            }
        }

        impl TryFrom<&serde_json::Value> for $name {
            type Error = $crate::core::error::Error;

            fn try_from(raw: &serde_json::Value) -> Result<Self, Self::Error> {
                Self::from_json(raw)
            }
        }
    };
}

pub(crate) use record_codec;
