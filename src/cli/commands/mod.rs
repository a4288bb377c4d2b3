//! Command execution functions for bundler operations.

mod bundle;
mod convert;

pub use bundle::bundle;
pub use convert::convert;
