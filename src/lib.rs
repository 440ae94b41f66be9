//! # pagesmith
//!
//! Validated HTML component composition.
//!
//! pagesmith composes HTML documents from reusable components: a
//! [`Definer`](definer::Definer) (a template fragment with declared
//! parameters, internally computed locals and declared dependencies) paired
//! with a context of named values. Before anything is rendered, components
//! are admitted through schemas that prove they can be rendered and that
//! pages come out well-formed.
//!
//! ## Core Systems
//!
//! - **[`definer`]**: Definers, parameters, locals, dependencies and free-variable analysis
//! - **[`component`]**: Contexts, markdown content and unrefined component records
//! - **[`check`]**: Dependency walker, context completeness, marker presence, structural validation
//! - **[`model`]**: Conditional models and the refined COMPONENT, STATIC, PAGE and STATIC_PAGE types
//! - **[`render`]**: Renderer trait and the bundled template renderer
//! - **[`config`]**: Checker configuration
//! - **[`testing`]**: Canned renderer, fixtures and snapshot helpers

// Foundation
pub mod config;

// Components
pub mod definer;
pub mod component;

// Validation
pub mod check;
pub mod model;

// Rendering
pub mod render;

// Test support
pub mod testing;

pub use check::CheckError;
pub use component::{ComponentRecord, Content, Context, PageRecord, StaticPageRecord, StaticRecord};
pub use config::CheckConfig;
pub use definer::{Definer, Dependency};
pub use model::{AdmissionError, Component, Conditional, Page, Static, StaticPage};
pub use render::{Renderer, TemplateRenderer};
