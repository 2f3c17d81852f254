//! Functional core for the salon appointments service.
//!
//! Pure domain types, request shapes, validation rules, the error taxonomy and
//! the capability traits (durable repository, memory repository, cache,
//! broker, event log) the imperative shell implements. Nothing in this crate performs I/O.

pub mod appointment;
pub mod broker;
pub mod cache;
pub mod context;
pub mod error;
pub mod log;
pub mod serde;
pub mod storage;
