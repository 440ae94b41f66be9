//! Headless testing support: a canned renderer, fixture definers and
//! snapshot helpers.
//!
//! Use [`CannedRenderer`] to exercise page checks without a template engine,
//! the [`fixtures`] to get realistic composed components, and
//! [`render_to_string`] to capture output for snapshot-style assertions.

pub mod fixtures;
pub mod renderer;
pub mod snapshot;

pub use renderer::CannedRenderer;
pub use snapshot::{collapse_whitespace, render_to_string};
