#[macro_use]
extern crate tracing;

mod app;
mod errors;
mod logging;
pub mod output;

pub use app::App;
pub use errors::init_errors;
pub use logging::init_logging;
