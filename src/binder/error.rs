use std::fmt;

/// Binding/encoding error
///
/// Returned by [`Mapper::bind`](crate::binder::Mapper::bind) and
/// [`Mapper::encode`](crate::binder::Mapper::encode). All errors are
/// fail-fast: a bind that fails partway leaves already-applied fields
/// applied (binding is not transactional).
#[derive(Debug)]
pub enum BindError {
    /// The bind target did not match the schema it was resolved against
    ///
    /// This indicates a mismatch between a field accessor and the value it
    /// was handed, which cannot happen through the safe derive-generated
    /// tables.
    InvalidTarget {
        /// Type name recorded in the schema
        type_name: &'static str,
    },
    /// The encode source did not match the schema it was resolved against
    InvalidSource {
        /// Type name recorded in the schema
        type_name: &'static str,
    },
    /// The field's kind has no built-in coercion rule and no custom
    /// decoder is registered for its declared type
    UnsupportedKind {
        /// External name of the field
        field: String,
    },
    /// A supplied string could not be parsed as the field's declared kind
    Conversion {
        /// External name of the field
        field: String,
        /// The raw value that failed to parse
        value: String,
        /// Human-readable name of the expected kind (e.g. "i64")
        kind: &'static str,
    },
    /// A custom decoder returned an error; surfaced verbatim via
    /// [`source`](std::error::Error::source)
    Decoder {
        /// External name of the field
        field: String,
        /// The decoder's error
        source: anyhow::Error,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::InvalidTarget { type_name } => {
                write!(f, "bind target does not match the schema built for `{type_name}`")
            }
            BindError::InvalidSource { type_name } => {
                write!(f, "encode source does not match the schema built for `{type_name}`")
            }
            BindError::UnsupportedKind { field } => {
                write!(
                    f,
                    "field `{field}` has no built-in coercion rule; register a decoder for its type"
                )
            }
            BindError::Conversion { field, value, kind } => {
                write!(f, "field `{field}`: cannot parse {value:?} as {kind}")
            }
            BindError::Decoder { field, source } => {
                write!(f, "field `{field}`: decoder failed: {source}")
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Decoder { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
