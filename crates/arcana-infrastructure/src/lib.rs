//! Infrastructure layer for ARCANA: file locations, configuration and secrets.

pub mod config_service;
pub mod paths;
pub mod secret_service;

pub use config_service::{ConfigService, load_reference_portrait};
pub use paths::{ArcanaPaths, PathError};
pub use secret_service::SecretServiceImpl;
