// Primitives shared by the client and the record codecs.
pub mod datetime;
pub mod error;
