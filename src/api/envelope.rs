//! Purpose: Validate the registry's `{success, message, data, responseType}` response envelope.
//! Exports: `ResponseType`; crate-internal `read_envelope` and `unwrap_envelope`.
//! Role: Every call except authentication returns its payload through here.
//! Invariants: HTTP status is checked before the body is read or parsed.
//! Invariants: `success == false` fails before `data` is looked at.
//! Invariants: `responseType` is informational only; non OK/INFO values are logged, not raised.
#![allow(clippy::result_large_err)]

use super::client::ApiResult;
use crate::core::error::{Error, ErrorKind};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseType {
    Ok,
    Info,
    Warn,
    Error,
    Exception,
}

impl ResponseType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "OK" => Some(Self::Ok),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            "EXCEPTION" => Some(Self::Exception),
            _ => None,
        }
    }

    pub fn is_nominal(self) -> bool {
        matches!(self, Self::Ok | Self::Info)
    }
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default, rename = "responseType")]
    response_type: Option<String>,
}

pub(crate) fn read_envelope(result: Result<ureq::Response, ureq::Error>) -> ApiResult<Value> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(code, _response)) => return Err(status_error(code)),
        Err(ureq::Error::Transport(err)) => {
            return Err(Error::new(ErrorKind::Io)
                .with_message("request failed")
                .with_source(err));
        }
    };
    if response.status() != 200 {
        return Err(status_error(response.status()));
    }
    // Search pages can exceed ureq's `into_string` cap, so read without a limit.
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read response body")
                .with_source(err)
        })?;
    unwrap_envelope(&body)
}

pub(crate) fn unwrap_envelope(body: &str) -> ApiResult<Value> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|err| {
        Error::new(ErrorKind::Decode)
            .with_message("invalid response envelope")
            .with_source(err)
    })?;
    if !envelope.success {
        let message = envelope.message.unwrap_or_default();
        return Err(Error::new(ErrorKind::Rejected)
            .with_message(format!("registry reported failure: {message}")));
    }
    if let Some(raw) = envelope.response_type.as_deref() {
        match ResponseType::parse(raw) {
            Some(kind) if kind.is_nominal() => {}
            _ => tracing::warn!(response_type = raw, "tolerating non-nominal response type"),
        }
    }
    Ok(envelope.data)
}

fn status_error(status: u16) -> Error {
    Error::new(ErrorKind::Transport)
        .with_message(format!("unexpected http status {status}"))
        .with_status(status)
}

#[cfg(test)]
mod tests {
    use super::{ResponseType, unwrap_envelope};
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn success_returns_data() {
        let body = r#"{"success":true,"message":"","responseType":"OK","data":[{"id":1}]}"#;
        assert_eq!(unwrap_envelope(body).expect("data"), json!([{"id": 1}]));
    }

    #[test]
    fn failure_carries_service_message() {
        let body = r#"{"success":false,"message":"Zugriff verweigert","data":{"not":"decoded"}}"#;
        let err = unwrap_envelope(body).expect_err("rejected");
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert!(err.message().expect("message").contains("Zugriff verweigert"));
    }

    #[test]
    fn warning_response_types_are_tolerated() {
        for kind in ["WARN", "ERROR", "EXCEPTION", "SOMETHING_NEW"] {
            let body = format!(r#"{{"success":true,"responseType":"{kind}","data":7}}"#);
            assert_eq!(unwrap_envelope(&body).expect("tolerated"), json!(7));
        }
    }

    #[test]
    fn missing_success_flag_is_a_decode_error() {
        let err = unwrap_envelope(r#"{"data":[]}"#).expect_err("no success");
        assert_eq!(err.kind(), ErrorKind::Decode);
        let err = unwrap_envelope("<html>login</html>").expect_err("html");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn response_type_parsing() {
        assert_eq!(ResponseType::parse("INFO"), Some(ResponseType::Info));
        assert_eq!(ResponseType::parse("ok"), None);
        assert!(ResponseType::Ok.is_nominal());
        assert!(!ResponseType::Exception.is_nominal());
    }
}
