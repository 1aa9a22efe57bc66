// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory with value objects, commands,
// events, errors, the aggregate itself and its in-memory store.
//
// Orders and users reference each other only through the ports traits
// (UserDirectory, OrderLedger).
//
// ============================================================================

pub mod aggregate;
pub mod identifiers;
pub mod order;
pub mod user;

pub use aggregate::Aggregate;
