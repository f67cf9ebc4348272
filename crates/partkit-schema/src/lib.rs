pub use sea_orm;

pub mod capability;
pub mod error;
pub mod executor;
pub mod partition;
mod partitioner;

pub use capability::{CapabilityCache, CapabilityState, Dialect};
pub use error::{Error, Result};
pub use executor::{SeaOrmExecutor, StatementExecutor};
pub use partitioner::Partitioner;
