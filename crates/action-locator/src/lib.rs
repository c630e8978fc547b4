//! Locator - multi-strategy element resolution with ordered fallback
//!
//! This crate resolves a logical target into a live element:
//! - `LocatorSpec`: an ordered chain of attribute, role, label and text strategies
//! - Strategies are evaluated in declaration order, each in full
//! - The first visible and enabled match wins; exhausting the chain yields
//!   `Resolution::NotFound` with the attempted chain for diagnostics

pub mod errors;
pub mod resolver;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use strategies::*;
pub use types::*;
