//! Weather Bot Core Library
//!
//! The metering and preference core of a weather Telegram bot.
//!
//! This crate provides the core functionality for:
//! - Enforcing a per-user request quota over a rolling window
//! - Storing and retrieving per-user display unit preferences
//! - Persisting both behind a shared storage abstraction
//! - Aggregating usage data for the admin dashboard
//!
//! Telegram integration, weather retrieval, and message formatting live in
//! the host bot; this crate is consulted by its command-dispatch layer.

pub mod config;
pub mod prefs;
pub mod quota;
pub mod stats;
pub mod storage;
