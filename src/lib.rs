pub mod config;
pub mod error;
pub mod plugins;
pub mod publisher;
pub mod registry;

pub use config::{PublishConfig, RegistryTarget};
pub use error::{PublishError, Result};
pub use registry::RegistryClient;
