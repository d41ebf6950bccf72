pub mod constants;
pub mod error;
pub mod ids;
pub mod types;

pub use error::ValidationError;
