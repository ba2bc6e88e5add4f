//! Request middleware shared by every HackTrack route.
//!
//! [`Trace`] tags each request with a trace identifier that follows it into
//! logs, error envelopes and the `trace-id` response header.

pub mod trace;

pub use trace::Trace;
