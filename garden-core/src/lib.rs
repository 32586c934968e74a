//! Core library for the garden planner.
//!
//! This crate defines:
//! - The advisory engine mapping weather readings to recommendations
//! - The weather gateway abstraction and its OpenWeather implementation
//! - The per-user preference store
//! - Configuration handling
//!
//! It is used by `garden-web`, but can also be reused by other binaries or
//! services.

pub mod advisory;
pub mod config;
pub mod gateway;
pub mod model;
pub mod profile;

pub use advisory::suggest_action;
pub use config::Config;
pub use gateway::{GatewayError, WeatherGateway, openweather::OpenWeatherGateway};
pub use model::{Advisory, Tone, WeatherReading, WeatherReport};
pub use profile::{PreferenceStore, ProfileError, UserProfile};
