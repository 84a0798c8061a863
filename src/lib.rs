//! Photofeed - public photo feed codec with cache-aware retrieval.
//!
//! This crate decodes the irregular public feed of a photo-sharing service
//! into typed posts, synthesizes the image variants the server omits, and
//! retrieves feed and image bytes through a connectivity-aware cache policy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing codecs, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, pure services and ports.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "photofeed";
