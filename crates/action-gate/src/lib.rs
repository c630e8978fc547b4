//! Gate - post-action observation for waypoint
//!
//! This crate decides what an action actually did:
//! - `NavigationObserver`: same-tab URL change vs new browsing context vs nothing
//! - `classify`: registrable-domain verdicts for destination URLs
//! - `SubmissionProbe`: first success, error, validity or URL signal after a
//!   form submission

pub mod conditions;
pub mod domain;
pub mod errors;
pub mod navigation;
pub mod types;
pub mod validator;

pub use conditions::*;
pub use domain::*;
pub use errors::*;
pub use navigation::*;
pub use types::*;
pub use validator::*;
