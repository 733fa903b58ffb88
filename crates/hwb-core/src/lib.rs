//! Core domain + application logic for the homework status bot.
//!
//! This crate is intentionally framework-agnostic. The Practicum HTTP API and
//! Telegram live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod poll;
pub mod ports;
pub mod validation;

pub use errors::{Error, Result};
