pub mod cascade;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod seed;

pub use cascade::{CascadeOptions, EmptySetPolicy};
pub use config::Config;
pub use error::{Error, Result};
