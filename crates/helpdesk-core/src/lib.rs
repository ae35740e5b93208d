pub mod config;
pub mod error;
pub mod mode;
pub mod types;

pub use config::HelpdeskConfig;
pub use error::{HelpdeskError, Result};
pub use mode::BackendMode;
pub use types::*;
