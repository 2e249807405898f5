//! Snaplink - a small URL shortener
//!
//! Shortens destination URLs into 6-character ids, groups links by a weak
//! caller fingerprint, and reclaims links older than a retention window.
//!
//! # Architecture
//! - `storage`: link store trait, in-memory and SeaORM backends
//! - `services`: link operations, liveness probe, anti-entropy sweeper
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup
//! - `utils`: id generation, URL validation, caller identity

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
