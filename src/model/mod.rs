//! Conditional models and the refined component types built on them.

pub mod conditional;
pub mod types;

pub use conditional::{AdmissionError, Conditional, GateFn};
pub use types::{render_with_content, Component, Page, SharedRenderer, Static, StaticPage};
