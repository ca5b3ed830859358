pub mod types;
pub mod queries;

pub use types::*;
pub use queries::*;
