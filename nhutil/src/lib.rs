mod app;
pub mod cli;
mod failure;
pub mod logging;
pub mod report;

pub use app::App;
pub use cli::Args;
pub use failure::Failure;
