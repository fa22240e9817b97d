mod actions;
mod app;
mod config;
mod dom;
mod export;
mod net;
mod overlay;
mod palette;
mod render;
mod state;
mod toolbar;

pub use app::run;
