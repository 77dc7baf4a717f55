pub mod error;
pub mod period;
pub mod types;
