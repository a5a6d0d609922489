//! Policy value types.
//!
//! These types are immutable once built and are shared by reference
//! between the policy representation and the query engine.

pub mod interval;
pub mod mls;
pub mod portcon;
pub mod role;

pub use interval::{Dominance, Dominate, Interval};
pub use mls::{Category, Level, Range, Sensitivity};
pub use portcon::{Context, Portcon, PortconRange, Protocol, IPPROTO_TCP, IPPROTO_UDP};
pub use role::Role;
