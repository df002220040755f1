//! Canonical logging macros
//!
//! All three expand to one `tracing` event carrying `component`, `op` and
//! `event`; extra `key = value` fields are passed through unchanged.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use nestbean_core::log_op_start;
/// log_op_start!("transform_rows");
/// log_op_start!("transform_rows", class = "shop.Order");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::nestbean_core_types::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use nestbean_core::log_op_end;
/// log_op_end!("transform_rows", duration_ms = 3, row_count = 10);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::nestbean_core_types::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation
///
/// The error is converted to an [`ExError`](crate::errors::ExError) so the
/// event carries its stable code, and the offending field when there is one.
///
/// ```
/// # use nestbean_core::{log_op_error, errors::NestBeanError};
/// let err = NestBeanError::InvalidArgument { parameter: "beanClass".to_string() };
/// log_op_error!("transformer_of", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::nestbean_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.field = ex_err.field(),
            message = ex_err.message()
            $(, $($field)*)?
        );
    }};
}
