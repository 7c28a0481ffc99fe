//! Shared types, errors, and configuration for Torque.
//!
//! This crate provides common types used across all other crates:
//! - Money amounts with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types and the error taxonomy
//! - Configuration management
//! - Clock abstraction and the shop-local calendar

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, ShopCalendar, SystemClock};
pub use config::{AppConfig, LogFormat, ShopConfig};
pub use error::{AppError, AppResult, ErrorKind};
