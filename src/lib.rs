pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod logging;
pub mod screen;
pub mod state;
pub mod view;
