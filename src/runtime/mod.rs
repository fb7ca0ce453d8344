//! Runtime state for the fallback interpreter
//!
//! - [`value`]: Runtime value representation (Int, Double, Bool, Text, List, Map)
//! - [`environment`]: Per-run variable bindings
//!
//! Nothing here outlives a single execution; every run starts from an empty
//! [`Environment`].

pub mod environment;
pub mod value;

pub use environment::Environment;
pub use value::Value;
