//! Component records: contexts, markdown content and the unrefined
//! COMPONENT, STATIC, PAGE and STATIC_PAGE shapes.

pub mod context;
pub mod content;
pub mod record;

pub use content::{markdown_to_html, Content, ContentError};
pub use context::Context;
pub use record::{ComponentRecord, PageRecord, StaticPageRecord, StaticRecord};
