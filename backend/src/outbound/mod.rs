//! Outbound adapters implementing the domain's driven ports.
//!
//! - `persistence`: PostgreSQL repositories via Diesel.
//! - `memory`: in-process repositories used when no database is configured.
//! - `chat`: HTTP client for the chat completion gateway.

pub mod chat;
pub mod memory;
pub mod persistence;
