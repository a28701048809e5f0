//! Interactive search screen.

mod app;
mod terminal;

pub use app::App;
pub use terminal::run_app;
