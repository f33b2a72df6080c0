//! Generation-time errors.
//!
//! Every variant aborts the current generation call. Errors raised by the
//! generated PHP at runtime (invalid enum value, malformed date time) are
//! emitted as code and never surface here.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// A type definition reached a factory that has no template for it.
    #[error("unsupported type `{kind}` for `{name}`: {reason}")]
    UnsupportedType {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// A type set where exactly one type is required held zero or several.
    #[error("can only handle one JSON type for `{name}` (got {count})")]
    AmbiguousTypeSet { name: String, count: usize },

    /// A `$ref` pointer that resolves to nothing.
    #[error("unresolved reference `{pointer}`")]
    UnresolvedReference { pointer: String },

    #[error("invalid schema at `{pointer}`: {reason}")]
    InvalidSchema { pointer: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    pub fn unsupported(kind: &'static str, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            kind,
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_schema(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_names_the_offending_kind() {
        let err = GenerateError::unsupported("object", "address", "no value object template");
        assert_eq!(
            err.to_string(),
            "unsupported type `object` for `address`: no value object template"
        );
    }

    #[test]
    fn ambiguous_type_set_reports_count() {
        let err = GenerateError::AmbiguousTypeSet { name: "tags".into(), count: 2 };
        assert!(err.to_string().contains("can only handle one JSON type"));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GenerateError = io.into();
        assert!(matches!(err, GenerateError::Io(_)));
    }
}
