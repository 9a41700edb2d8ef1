//! Purpose: Client library for the DPSG NAMI membership registry.
//! Exports: `api` (client, records, errors), `core` (date-time codec, error model), `schema`.
//! Role: Library only; CLI parsing, config files, and table output belong to callers.
//! Invariants: No process-wide state; every client is constructed explicitly.
//! Invariants: All network calls are blocking and fail fast without retries.
pub mod api;
pub mod core;
pub mod schema;
