//! farmdesk - data access layer for a farm management application
//!
//! Farms, crops, tasks and financial entries live in a hosted record
//! store. This library maps them to typed entities and exposes
//! repository operations that never panic and degrade to empty results
//! when the store is unreachable.
//!
//! # Modules
//!
//! * [`backend`] - Record store abstraction, HTTP and in-memory adapters
//! * [`schema`] - Field mapping between entities and store records
//! * [`entities`] - Farm, crop, task and financial entry models
//! * [`repositories`] - CRUD and domain queries per entity
//! * [`dashboard`] - Concurrent overview across all repositories
//! * [`config`] - Application configuration management

/// Record store abstraction and adapters
pub mod backend;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Aggregated overview of farm data
pub mod dashboard;

/// Domain entity models
pub mod entities;

/// Logging setup
pub mod logger;

/// User-facing error notifications
pub mod notify;

/// Repository layer for record store operations
pub mod repositories;

/// Entity to record field mapping
pub mod schema;

/// Utility functions for date/time handling
pub mod utils;

pub use entities::{Crop, Farm, FinancialEntry, FinancialSummary, Task};
pub use repositories::{Repository, RepositoryError};
