//! Wire protocol of the Ollama `/api/chat` endpoint.
//!
//! - [`convert`] flattens conversation history into wire turns
//! - [`request`] and [`response`] hold the JSON schema
//! - [`stream`] turns a newline-delimited response body into provider events

pub(crate) mod convert;
pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod stream;

pub use convert::convert_messages;
pub use request::{ChatRequest, WireMessage, WireRole};
pub use response::{ChatResponse, ResponseMessage, Usage};
