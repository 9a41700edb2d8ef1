//! Purpose: Date-time codec for the registry's `YYYY-MM-DD HH:MM:SS` wire text.
//! Exports: `DateTimeValue`, `decode`, `encode`.
//! Role: Shared primitive used by both record codecs.
//! Invariants: Values carry no timezone; the wire text is local registry time.
//! Invariants: `""` decodes to `None` and `None` encodes to `""`, never to a missing key.
use crate::core::error::{Error, ErrorKind};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month, PrimitiveDateTime, Time};

const WIRE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DateTimeValue(PrimitiveDateTime);

impl DateTimeValue {
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(invalid_component)?;
        let date = Date::from_calendar_date(year, month, day).map_err(invalid_component)?;
        let time = Time::from_hms(hour, minute, second).map_err(invalid_component)?;
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u8 {
        u8::from(self.0.month())
    }

    pub fn day(&self) -> u8 {
        self.0.day()
    }

    pub fn hour(&self) -> u8 {
        self.0.hour()
    }

    pub fn minute(&self) -> u8 {
        self.0.minute()
    }

    pub fn second(&self) -> u8 {
        self.0.second()
    }

    pub fn as_primitive(&self) -> PrimitiveDateTime {
        self.0
    }
}

impl From<PrimitiveDateTime> for DateTimeValue {
    fn from(value: PrimitiveDateTime) -> Self {
        Self(value)
    }
}

impl FromStr for DateTimeValue {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        PrimitiveDateTime::parse(raw, WIRE_FORMAT)
            .map(Self)
            .map_err(|err| {
                Error::new(ErrorKind::Decode)
                    .with_message(format!("invalid date-time {raw:?}, expected YYYY-MM-DD HH:MM:SS"))
                    .with_source(err)
            })
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.format(WIRE_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for DateTimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn decode(raw: &str) -> Result<Option<DateTimeValue>, Error> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

pub fn encode(value: Option<&DateTimeValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn invalid_component(err: time::error::ComponentRange) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message("date-time component out of range")
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::{DateTimeValue, decode, encode};
    use crate::core::error::ErrorKind;

    #[test]
    fn empty_text_is_absent() {
        assert_eq!(decode("").expect("decode"), None);
        assert_eq!(encode(None), "");
    }

    #[test]
    fn wire_text_decodes_to_components() {
        let value = decode("2020-01-02 03:04:05")
            .expect("decode")
            .expect("value");
        assert_eq!(value.year(), 2020);
        assert_eq!(value.month(), 1);
        assert_eq!(value.day(), 2);
        assert_eq!(value.hour(), 3);
        assert_eq!(value.minute(), 4);
        assert_eq!(value.second(), 5);
        assert_eq!(encode(Some(&value)), "2020-01-02 03:04:05");
    }

    #[test]
    fn constructor_matches_parser() {
        let built = DateTimeValue::new(1998, 11, 30, 0, 0, 0).expect("build");
        let parsed: DateTimeValue = "1998-11-30 00:00:00".parse().expect("parse");
        assert_eq!(built, parsed);
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        for raw in ["2020-01-02", "2020-01-02T03:04:05", "02.01.2020 03:04:05", " "] {
            let err = decode(raw).expect_err("should reject");
            assert_eq!(err.kind(), ErrorKind::Decode, "input {raw:?}");
        }
    }

    #[test]
    fn out_of_range_components_are_rejected() {
        let err = DateTimeValue::new(2020, 13, 1, 0, 0, 0).expect_err("month 13");
        assert_eq!(err.kind(), ErrorKind::Usage);
        let err = DateTimeValue::new(2021, 2, 29, 0, 0, 0).expect_err("not a leap year");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn serializes_as_wire_text() {
        let value = DateTimeValue::new(2017, 6, 1, 12, 30, 0).expect("build");
        let json = serde_json::to_value(value).expect("json");
        assert_eq!(json, serde_json::json!("2017-06-01 12:30:00"));
    }
}
