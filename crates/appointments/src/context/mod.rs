//! Request-scoped context module.
//!
//! Provides the `RequestContext` extractor that turns an HTTP request into
//! the transport-agnostic `Context` endpoints expect.

mod extractor;
mod types;

pub use types::RequestContext;
