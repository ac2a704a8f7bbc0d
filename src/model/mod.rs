pub mod stored;
pub mod types;
pub mod validation;

pub use stored::*;
pub use types::*;
pub use validation::*;
