use thiserror::Error;

/// Result type alias using NestBeanError
pub type Result<T> = std::result::Result<T, NestBeanError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Construction
    InvalidArgument,

    // Resolution
    FieldNotFound,
    TypeMismatch,
    FieldNotWritable,

    // Tuple shape
    ArityMismatch,
    IndexOutOfRange,

    // Catalog
    UnknownClass,
    DuplicateClass,
    CycleDetected,
    InvalidCatalog,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::FieldNotFound => "ERR_FIELD_NOT_FOUND",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::FieldNotWritable => "ERR_FIELD_NOT_WRITABLE",
            ExErrorKind::ArityMismatch => "ERR_ARITY_MISMATCH",
            ExErrorKind::IndexOutOfRange => "ERR_INDEX_OUT_OF_RANGE",
            ExErrorKind::UnknownClass => "ERR_UNKNOWN_CLASS",
            ExErrorKind::DuplicateClass => "ERR_DUPLICATE_CLASS",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::InvalidCatalog => "ERR_INVALID_CATALOG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the class and
/// field context that was being resolved when the error occurred.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    class: Option<String>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            class: None,
            field: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add class context
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(class) = &self.class {
            write!(f, " (class: {})", class)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for tuple-to-bean transformation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NestBeanError {
    // ===== Construction Errors =====
    /// A required argument was absent
    #[error("{parameter} is required")]
    InvalidArgument { parameter: String },

    // ===== Resolution Errors =====
    /// An alias segment names a field the class (or its ancestors) does not declare
    #[error("Field {field} not found in class {class}")]
    FieldNotFound { field: String, class: String },

    /// A value, or a nested alias group, does not fit the declared field type
    #[error("Field {field} of class {class} expects {expected} but got {actual}")]
    TypeMismatch {
        field: String,
        class: String,
        expected: String,
        actual: String,
    },

    /// The public setter surface refused a read-only field
    #[error("Field {field} of class {class} is not writable")]
    FieldNotWritable { field: String, class: String },

    // ===== Tuple Shape Errors =====
    /// Fewer values than aliases (or accessors) were supplied
    #[error("Tuple has {tuple_len} values but {alias_len} aliases were supplied")]
    ArityMismatch { tuple_len: usize, alias_len: usize },

    /// A cached alias position points past the end of the incoming tuple
    #[error("Tuple index {index} is out of range for a tuple of {len} values")]
    TupleIndexOutOfRange { index: usize, len: usize },

    // ===== Catalog Errors =====
    /// Class name is not declared in the catalog
    #[error("Unknown class: {name}")]
    UnknownClass { name: String },

    /// Class name is declared more than once
    #[error("Duplicate class: {name}")]
    DuplicateClass { name: String },

    /// Class reaches itself through its `extends` chain
    #[error("Class {name} extends itself through its parent chain")]
    ClassCycle { name: String },

    /// A bean field's class reference was used before being bound
    #[error("Class {name} is referenced but was never bound")]
    UnresolvedClass { name: String },

    /// A class reference was bound to a different class
    #[error("Class reference {expected} cannot be bound to class {actual}")]
    ClassRefMismatch { expected: String, actual: String },

    /// Catalog document is structurally invalid
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON/TOML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for NestBeanError {
    fn from(err: serde_json::Error) -> Self {
        NestBeanError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NestBeanError {
    fn from(err: toml::de::Error) -> Self {
        NestBeanError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from NestBeanError to ExError
impl From<NestBeanError> for ExError {
    fn from(err: NestBeanError) -> Self {
        let message = err.to_string();
        match err {
            NestBeanError::InvalidArgument { parameter } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_field(parameter)
                    .with_message(message)
            }
            NestBeanError::FieldNotFound { field, class } => {
                ExError::new(ExErrorKind::FieldNotFound)
                    .with_class(class)
                    .with_field(field)
                    .with_message(message)
            }
            NestBeanError::TypeMismatch { field, class, .. } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_class(class)
                    .with_field(field)
                    .with_message(message)
            }
            NestBeanError::FieldNotWritable { field, class } => {
                ExError::new(ExErrorKind::FieldNotWritable)
                    .with_class(class)
                    .with_field(field)
                    .with_message(message)
            }
            NestBeanError::ArityMismatch { .. } => {
                ExError::new(ExErrorKind::ArityMismatch).with_message(message)
            }
            NestBeanError::TupleIndexOutOfRange { .. } => {
                ExError::new(ExErrorKind::IndexOutOfRange).with_message(message)
            }
            NestBeanError::UnknownClass { name } => ExError::new(ExErrorKind::UnknownClass)
                .with_class(name)
                .with_message(message),
            NestBeanError::DuplicateClass { name } => ExError::new(ExErrorKind::DuplicateClass)
                .with_class(name)
                .with_message(message),
            NestBeanError::UnresolvedClass { name } => ExError::new(ExErrorKind::UnknownClass)
                .with_class(name)
                .with_message(message),
            NestBeanError::ClassRefMismatch { expected, .. } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_class(expected)
                    .with_message(message)
            }
            NestBeanError::ClassCycle { name } => ExError::new(ExErrorKind::CycleDetected)
                .with_class(name)
                .with_message(message),
            NestBeanError::InvalidCatalog { .. } => {
                ExError::new(ExErrorKind::InvalidCatalog).with_message(message)
            }
            NestBeanError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            NestBeanError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
