pub mod cli;
pub mod commands;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod export;
pub mod report;
pub mod stats;
pub mod summary;
pub mod types;
pub mod utils;

// Re-export main API
pub use ensemble::{EnsembleSource, InMemoryEnsemble, JsonResultLoader};
pub use error::{ConsensusError, Result};
pub use summary::ConsensusSummary;
