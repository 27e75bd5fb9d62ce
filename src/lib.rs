pub mod config;
pub mod executor;
pub mod fetch;
pub mod harvest;
pub mod logging;
pub mod model;
pub mod sinks;
pub mod traits;

// Re-export common types for convenience
pub use config::*;
pub use executor::*;
pub use fetch::*;
pub use harvest::*;
pub use model::*;
pub use traits::*;
