use std::fmt;

// ============================================================================
// Error Taxonomy
// ============================================================================
//
// Every component error (catalog, order, user) is a closed enum. Each variant
// maps onto one of four kinds so the transport can pick a response class
// without matching on messages.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is structurally wrong
    Validation,
    /// The addressed order, user or product does not exist
    NotFound,
    /// Well-formed request that violates a business rule given current state
    Conflict,
    /// The product catalog could not be reached or failed
    DependencyUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::DependencyUnavailable => "dependency_unavailable",
        };
        f.write_str(label)
    }
}

/// Classification shared by all component errors
pub trait DomainError: std::error::Error {
    fn kind(&self) -> ErrorKind;

    /// Stable machine-readable code, e.g. `ORDER_NOT_FOUND`
    fn code(&self) -> &'static str;
}

pub(crate) fn join_ids<T: fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
