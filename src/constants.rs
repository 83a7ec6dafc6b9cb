//! Constants used throughout the application
//!
//! This module centralizes table names, user-facing messages, and other
//! constant values to improve maintainability and consistency.

// Record store tables
pub const TABLE_FARMS: &str = "farms_c";
pub const TABLE_CROPS: &str = "crops_c";
pub const TABLE_TASKS: &str = "tasks_c";
pub const TABLE_FINANCIAL_ENTRIES: &str = "financialEntries_c";

// Standard record columns
pub const FIELD_ID: &str = "Id";
pub const FIELD_NAME: &str = "Name";

// Financial entry type counted as income; every other type is an expense
pub const ENTRY_TYPE_INCOME: &str = "income";

// Error Messages
pub const ERROR_STORE_UNAVAILABLE: &str = "Record store client not available";
pub const ERROR_TASK_NOT_FOUND: &str = "Task not found";
pub const ERROR_NO_PUBLIC_KEY: &str = "❌ Error: record store public key not set";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// Defaults and limits
pub const DEFAULT_PUBLIC_KEY_ENV: &str = "FARMDESK_PUBLIC_KEY";
/// Days ahead covered by the upcoming tasks query
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;
pub const MAX_UPCOMING_WINDOW_DAYS: i64 = 90;
pub const MAX_TIMEOUT_SECS: u64 = 300;
