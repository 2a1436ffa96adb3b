use bindery_schema::error::SchemaError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorKind
///
/// Stable taxonomy for binding failures, independent of message text.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    MissingRequiredField,
    NotNullableViolation,
    TypeConversion,
    EnumViolation,
    Validation,
    InternalSchema,
    DepthLimitExceeded,
    UnknownClass,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::NotNullableViolation => "not_nullable_violation",
            Self::TypeConversion => "type_conversion",
            Self::EnumViolation => "enum_violation",
            Self::Validation => "validation",
            Self::InternalSchema => "internal_schema",
            Self::DepthLimitExceeded => "depth_limit_exceeded",
            Self::UnknownClass => "unknown_class",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// BindError
///
/// A binding failure wrapped with owning-class and field context. Hydration
/// aborts on the first one; partial objects are never surfaced.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("{}", self.describe())]
pub struct BindError {
    pub class: String,
    pub field: Option<String>,
    pub kind: ErrorKind,
    pub message: String,
}

impl BindError {
    pub fn new(kind: ErrorKind, class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            field: None,
            kind,
            message: message.into(),
        }
    }

    pub fn for_field(
        kind: ErrorKind,
        class: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            field: Some(field.into()),
            kind,
            message: message.into(),
        }
    }

    /// Conversion helpers raise errors without knowing which field they are
    /// converting for; the hydrator fills the blanks.
    #[must_use]
    pub fn with_context(mut self, class: &str, field: &str) -> Self {
        if self.class.is_empty() {
            self.class = class.to_string();
        }
        if self.field.is_none() {
            self.field = Some(field.to_string());
        }

        self
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    fn describe(&self) -> String {
        match (self.class.is_empty(), &self.field) {
            (false, Some(field)) => format!("{}.{}: {}", self.class, field, self.message),
            (false, None) => format!("{}: {}", self.class, self.message),
            _ => self.message.clone(),
        }
    }
}

impl From<SchemaError> for BindError {
    fn from(err: SchemaError) -> Self {
        let kind = match &err {
            SchemaError::UnknownClass { .. } => ErrorKind::UnknownClass,
            _ => ErrorKind::InternalSchema,
        };
        let class = match &err {
            SchemaError::UnknownClass { class }
            | SchemaError::DuplicateClass { class }
            | SchemaError::ParentCycle { class }
            | SchemaError::EmptyFieldName { class }
            | SchemaError::DuplicateField { class, .. }
            | SchemaError::ReservedField { class, .. }
            | SchemaError::EmptyEnum { class, .. } => class.clone(),
            SchemaError::NameTooLong { .. } => String::new(),
        };

        Self {
            class,
            field: None,
            kind,
            message: err.to_string(),
        }
    }
}
