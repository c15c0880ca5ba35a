//! Remote assistant service client
//!
//! This module provides the `AssistantClient` abstraction and its HTTP
//! implementation.

pub mod base;
pub mod http;

pub use base::{AssistantClient, ChatReply, ChatRequest, HealthStatus};
pub use http::HttpAssistant;
