use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

// Canonical hyphenated form only; braced, URN and simple forms are rejected.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID pattern is a valid regex")
});

/// Which entity a raw identifier was meant to address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Order,
    User,
    Product,
}

impl IdKind {
    pub fn invalid_code(self) -> &'static str {
        match self {
            IdKind::Order => "INVALID_ORDER_ID",
            IdKind::User => "INVALID_USER_ID",
            IdKind::Product => "INVALID_PRODUCT_ID",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Order => "order",
            IdKind::User => "user",
            IdKind::Product => "product",
        })
    }
}

/// Parse a request-supplied identifier
pub fn parse_id(raw: &str) -> Option<Uuid> {
    if !UUID_PATTERN.is_match(raw) {
        return None;
    }
    Uuid::parse_str(raw).ok()
}
