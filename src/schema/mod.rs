//! Purpose: Map the registry's two member json shapes to typed records and back.
//! Exports: `SearchResult`, `Member`, `FieldValue`, `View`.
//! Role: Pure data layer; the only outward call is the linked fetch/update through `RecordApi`.
//! Invariants: The two shapes are independent codec tables sharing only field coercions.
//! Invariants: One malformed field fails the whole record; nothing is skipped silently.

pub(crate) mod codec;
mod member;
mod search;
mod view;

pub use member::Member;
pub use search::SearchResult;
pub use view::{FieldValue, View};
