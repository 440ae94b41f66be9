//! Definers: parameter descriptors, dependencies and fragment producers.

pub mod params;
pub mod dependency;
pub mod core;

pub use self::core::{Definer, DefinerBuilder, DefinerError, Fragment, LocalFn};
pub use dependency::Dependency;
pub use params::{Arguments, Param, ParamList};
