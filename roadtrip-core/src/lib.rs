//! Core library for the `roadtrip` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The SheCodes API client (weather lookups, itinerary generation)
//! - Shared domain models and the error contract
//!
//! It is used by `roadtrip-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;

pub use client::ShecodesClient;
pub use config::{API_KEY_ENV, Config, resolve_api_key};
pub use error::DomainError;
pub use model::{TripRequest, WeatherReading};
