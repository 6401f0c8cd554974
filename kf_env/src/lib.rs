pub mod dashboard;
pub mod environment;
pub mod error;
pub mod options;
pub mod platform;

pub use environment::{AppFilter, AppLister, EnvironmentClient, ServingClient, ServingFactory};
pub use error::{Error, Result};
pub use options::EnvOptions;
