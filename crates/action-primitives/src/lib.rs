//! Action primitives - element model, bounded waiting and the action dispatcher
//!
//! This crate provides the building blocks the locator and scenario layers share:
//! - `ResolvedElement`, `Action`, `Timeouts` and `ActionReport`
//! - `Waiter`, the bounded poll loop behind every wait
//! - `ActionDispatcher`: scroll, wait until interactable, click/type with an
//!   interception fallback

pub mod errors;
mod primitives;
pub mod types;
mod waiting;

pub use errors::*;
pub use primitives::*;
pub use types::*;
pub use waiting::*;
