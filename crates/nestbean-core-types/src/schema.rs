//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Transformer identifiers
pub const FIELD_CLASS: &str = "class";
pub const FIELD_FIELD: &str = "field";

// Collection sizes
pub const FIELD_ALIAS_COUNT: &str = "alias_count";
pub const FIELD_ROOT_COUNT: &str = "root_count";
pub const FIELD_GROUP_COUNT: &str = "group_count";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
