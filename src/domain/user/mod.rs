// ============================================================================
// User Domain - accounts, loyalty points and order ownership
// ============================================================================
//
// - Value objects (Username, Email)
// - Commands (NewUser, RedeemPoints, UserCommand)
// - Events (PointsAwarded, PointsRedeemed)
// - Errors (UserError)
// - Aggregate (User)
// - Store (users plus the user -> orders index)
// - Ports (OrderLedger)
//
// ============================================================================

pub mod value_objects;
pub mod events;
pub mod commands;
pub mod errors;
pub mod aggregate;
pub mod ports;
pub mod store;

pub use value_objects::*;
pub use events::*;
pub use commands::*;
pub use errors::*;
pub use aggregate::*;
pub use ports::*;
pub use store::*;
