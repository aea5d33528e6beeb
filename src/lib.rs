pub mod body;
pub mod c_api;
pub mod config;
pub mod distribution;
pub mod error;
pub mod integrator;
pub mod system;
pub mod vector;

pub use body::{Body, State};
pub use config::SimulationConfig;
pub use distribution::{DiskCluster, Distribution};
pub use error::ConfigError;
pub use integrator::{Integrator, IntegratorKind};
pub use system::{System, UpdateOrder};
pub use vector::Vector2;
