//! Browser driver surface for waypoint.
//!
//! [`BrowserDriver`] is the narrow capability set the locator, dispatcher,
//! observer and scenario layers consume. [`WebDriverAdapter`] binds it to a W3C
//! WebDriver session; the `stub` feature adds an in-memory browser for tests.

pub mod config;
pub mod driver;
pub mod error;
pub mod query;
pub mod registry;
#[cfg(any(test, feature = "stub"))]
pub mod stub;
pub mod webdriver;

pub use config::{Browser, WebDriverConfig};
pub use driver::BrowserDriver;
pub use error::{AdapterError, AdapterErrorKind};
pub use query::Query;
pub use webdriver::WebDriverAdapter;
pub use waypoint_core_types::{ContextHandle, ElementId, Strategy};
