//! Inbound adapters that translate survivor input into domain service calls
//! while keeping presentation details at the edge.
//!
//! The line-oriented console lives under [`console`].

pub mod console;
