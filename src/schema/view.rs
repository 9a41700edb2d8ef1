//! Purpose: Typed attribute values and the ordered display projections built from them.
//! Exports: `FieldValue`, `View`.
//! Role: Shared by both record shapes; output formatting stays with callers.
//! Invariants: A full view never contains null or empty-text values or deny-listed names.
//! Invariants: A summary view keeps the caller's order and fails on unknown names.
use crate::core::datetime::DateTimeValue;
use crate::core::error::{Error, ErrorKind};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    DateTime(DateTimeValue),
    Mapping(Map<String, Value>),
}

impl FieldValue {
    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Boolean(flag) => write!(f, "{flag}"),
            FieldValue::DateTime(value) => write!(f, "{value}"),
            FieldValue::Mapping(object) => write!(f, "{}", Value::Object(object.clone())),
        }
    }
}

/// Ordered attribute-name → value projection of one record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct View {
    entries: Vec<(&'static str, Option<FieldValue>)>,
}

impl View {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(attr, _)| *attr == name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(attr, _)| *attr == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(attr, _)| *attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&FieldValue>)> + '_ {
        self.entries
            .iter()
            .map(|(attr, value)| (*attr, value.as_ref()))
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (attr, value) in &self.entries {
            map.serialize_entry(attr, value)?;
        }
        map.end()
    }
}

pub(crate) fn full_view(
    entries: Vec<(&'static str, Option<FieldValue>)>,
    deny_list: &[&str],
) -> View {
    let entries = entries
        .into_iter()
        .filter(|(attr, value)| match value {
            Some(value) => !value.is_empty_text() && !deny_list.contains(attr),
            None => false,
        })
        .collect();
    View { entries }
}

pub(crate) fn summary_view(
    entries: Vec<(&'static str, Option<FieldValue>)>,
    names: &[&str],
) -> Result<View, Error> {
    let mut selected: Vec<(&'static str, Option<FieldValue>)> = Vec::with_capacity(names.len());
    for name in names {
        let entry = entries
            .iter()
            .find(|(attr, _)| attr == name)
            .ok_or_else(|| Error::new(ErrorKind::FieldNotFound).with_field(*name))?;
        if !selected.iter().any(|(attr, _)| attr == name) {
            selected.push(entry.clone());
        }
    }
    Ok(View { entries: selected })
}
