//! Client side of the assistant service: wire types, upload preparation,
//! and the HTTP client for the five endpoints.

pub mod client;
pub mod image_prep;
pub mod types;

pub use client::AssistantClient;
