//! Language model integration
//!
//! The model is only ever asked to interpret commands or describe photos;
//! it never touches room state directly.

pub mod client;
pub mod parser;
pub mod vision;

pub use client::{ApiFormat, LlmClient};
