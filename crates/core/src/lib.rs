pub mod config;
pub mod error;
pub mod integration;
pub mod preferences;
pub mod signal;

pub use config::{Config, HttpConfig, ProviderConfig};
pub use error::*;
pub use integration::*;
pub use preferences::AlertPreferences;
pub use signal::*;
