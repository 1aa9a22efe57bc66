// ============================================================================
// Order Domain - Business Logic for the Order Aggregate
// ============================================================================
//
// - Value objects (OrderLineItem, OrderStatus, OrderAction)
// - Commands and raw request payloads
// - Events (ItemsReplaced, Submitted, Cancelled)
// - Errors (OrderError)
// - Aggregate (Order) with the line-item patch planner
// - Store (process-local order table) and Engine (catalog-backed workflows)
// - Ports (UserDirectory)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod ports;
pub mod store;
pub mod engine;

// Re-export for convenience
pub use value_objects::*;
pub use events::*;
pub use commands::{CreateOrder, LineItemInput, OrderCommand, PatchOrder};
pub use errors::*;
pub use aggregate::*;
pub use ports::*;
pub use store::*;
pub use engine::*;
