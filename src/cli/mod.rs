pub mod app;
pub mod classify;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod form;
pub mod links;
pub mod locate;
pub mod output;
pub mod runtime;

pub use classify::{cmd_classify, run_classify, ClassifyArgs};
pub use form::{cmd_form, run_form, FormArgs};
pub use links::{cmd_links, run_links, LinksArgs};
pub use locate::{cmd_locate, run_locate, LocateArgs, LocateReport};
