//! Utility modules for the farmdesk application.
//!
//! - [`datetime`] - Store timestamp formatting, query windows and
//!   human-readable due dates

pub mod datetime;
