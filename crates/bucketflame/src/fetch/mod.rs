//! Fetching profiles over HTTP.

pub mod client;

pub use client::{is_url, ProfileClient};
