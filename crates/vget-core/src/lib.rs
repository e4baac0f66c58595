//! Core domain + application logic for the vget download bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / yt-dlp live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod ports;

pub use errors::{Error, Result};
