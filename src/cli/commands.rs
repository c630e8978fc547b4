use clap::Subcommand;

use super::classify::ClassifyArgs;
use super::form::FormArgs;
use super::links::LinksArgs;
use super::locate::LocateArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Classify a destination URL against the application origin
    Classify(ClassifyArgs),

    /// Verify every external link on a page
    Links(LinksArgs),

    /// Run a form submission scenario file
    Form(FormArgs),

    /// Resolve a fallback chain of strategies on a page
    Locate(LocateArgs),
}
