//! Chat completion outbound adapters.
//!
//! A thin HTTP implementation of the `ChatCompletionSource` port.

mod dto;
mod http_source;

pub use http_source::{ChatHttpSource, DEFAULT_CHAT_MODEL};
