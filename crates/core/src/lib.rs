//! Core library for the Todo Blueprints data layer
//!
//! This crate contains the core business logic, including:
//! - The task entity and its observation streams
//! - Local (durable) and remote (simulated) task stores
//! - The repository orchestrating both stores

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
