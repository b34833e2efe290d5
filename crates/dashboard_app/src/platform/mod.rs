mod app;
mod input;
mod logging;
mod render;
mod settings;

pub use app::run_app;
