pub mod config;
pub mod error;
pub mod server;
pub mod upscaler;

pub use error::{Error, Result};
