//! Remote datatype resolution
//!
//! This module provides:
//! - Response types for the `wbgetentities` API
//! - A resolver that queries the API for a single property's datatype

pub mod client;
pub mod types;

pub use client::{parse_datatype_response, RemoteResolver};
pub use types::*;
