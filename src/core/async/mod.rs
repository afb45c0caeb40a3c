//! Asynchronous implementations of core components
//!
//! - **AsyncLegacyCodec**: tokio facade over `LegacyCodec` for concurrent
//!   callers such as request handlers

pub mod codec;

pub use codec::AsyncLegacyCodec;
