// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;
pub mod views;

// Re-export specific items for convenience if needed
pub use api::{FeedApi, HttpFeedApi};
pub use error::ClientError;
