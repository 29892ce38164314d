mod context;
mod dataset;

pub use context::*;
pub use dataset::*;
