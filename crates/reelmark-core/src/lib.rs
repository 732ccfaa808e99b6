pub mod config;
pub mod error;
pub mod poster;
pub mod screen;
pub mod state;
pub mod view;

pub use error::CoreError;
