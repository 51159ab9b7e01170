#![warn(clippy::pedantic)]

pub mod config;
pub mod driver;
pub mod error;

pub use config::DriverConfig;
pub use driver::{Progress, ReplyDriver};
pub use error::DriverError;
