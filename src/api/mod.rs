//! Purpose: Public API boundary of the NAMI client crate.
//! Exports: Client, configuration, criteria, envelope types, records, and errors.
//! Role: Callers import from here; submodules stay private.
//! Invariants: Entities never hold a client; linked calls take a `RecordApi` argument.

mod client;
mod config;
mod criteria;
mod envelope;

pub use crate::core::datetime::DateTimeValue;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::schema::{FieldValue, Member, SearchResult, View};
pub use client::{ApiResult, NamiClient, RecordApi, Session};
pub use config::{
    ClientConfig, DEFAULT_AUTH_PATH, DEFAULT_RECORD_PATH, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SEARCH_PATH, DEFAULT_SERVER,
};
pub use criteria::{SearchCriteria, Taetigkeit, Untergliederung};
pub use envelope::ResponseType;
