pub mod billing;
pub mod config;
pub mod error;

pub use billing::*;
pub use config::Config;
pub use error::*;
