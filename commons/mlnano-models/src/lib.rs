pub mod dataset;
pub mod schema;
pub mod validation;

pub use dataset::*;
pub use validation::*;
