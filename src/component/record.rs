//! Unrefined component records, prior to admission.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::content::Content;
use super::context::Context;
use crate::config::CheckConfig;
use crate::definer::Definer;

// ---------------------------------------------------------------------------
// ComponentRecord
// ---------------------------------------------------------------------------

/// A definer paired with the context it will be rendered against.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub definer: Arc<Definer>,
    pub context: Context,
}

impl ComponentRecord {
    pub fn new(definer: Arc<Definer>, context: impl Into<Context>) -> Self {
        Self {
            definer,
            context: context.into(),
        }
    }

    /// Placeholder record: the nil definer with an empty context.
    pub fn nil() -> Self {
        Self::new(Definer::nil(), Context::new())
    }
}

// ---------------------------------------------------------------------------
// StaticRecord
// ---------------------------------------------------------------------------

/// A component that accepts rendered markdown through a marker slot.
#[derive(Debug, Clone)]
pub struct StaticRecord {
    pub component: ComponentRecord,
    /// Content slot name; `None` uses [`CheckConfig::marker`].
    pub marker: Option<String>,
    pub content: Content,
    pub frontmatter: Map<String, Value>,
}

impl StaticRecord {
    pub fn new(component: ComponentRecord, content: Content) -> Self {
        Self {
            component,
            marker: None,
            content,
            frontmatter: Map::new(),
        }
    }

    /// Placeholder record: nil component, empty content.
    pub fn nil() -> Self {
        Self::new(ComponentRecord::nil(), Content::default())
    }

    /// Set the marker name (builder).
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// The effective marker name.
    pub fn marker<'a>(&'a self, config: &'a CheckConfig) -> &'a str {
        self.marker.as_deref().unwrap_or(&config.marker)
    }

    /// Set the frontmatter (builder). Non-object values are ignored.
    pub fn with_frontmatter(mut self, frontmatter: Value) -> Self {
        if let Value::Object(map) = frontmatter {
            self.frontmatter = map;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// PageRecord / StaticPageRecord
// ---------------------------------------------------------------------------

/// A component expected to render a full HTML document.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub component: ComponentRecord,
    pub auto_style: bool,
    pub static_dir: PathBuf,
}

impl PageRecord {
    pub fn new(component: ComponentRecord) -> Self {
        Self {
            component,
            auto_style: false,
            static_dir: PathBuf::new(),
        }
    }

    /// Set the auto-style flag (builder).
    pub fn with_auto_style(mut self, auto_style: bool) -> Self {
        self.auto_style = auto_style;
        self
    }

    /// Set the static asset directory (builder).
    pub fn with_static_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.static_dir = dir.as_ref().to_path_buf();
        self
    }
}

/// A STATIC component expected to render a full HTML document.
#[derive(Debug, Clone)]
pub struct StaticPageRecord {
    pub static_: StaticRecord,
    pub auto_style: bool,
    pub static_dir: PathBuf,
}

impl StaticPageRecord {
    pub fn new(static_: StaticRecord) -> Self {
        Self {
            static_,
            auto_style: false,
            static_dir: PathBuf::new(),
        }
    }

    /// Set the auto-style flag (builder).
    pub fn with_auto_style(mut self, auto_style: bool) -> Self {
        self.auto_style = auto_style;
        self
    }

    /// Set the static asset directory (builder).
    pub fn with_static_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.static_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn component(&self) -> &ComponentRecord {
        &self.static_.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nil_records() {
        let comp = ComponentRecord::nil();
        assert_eq!(comp.definer.name(), "nil");
        assert!(comp.context.is_empty());

        let st = StaticRecord::nil();
        assert_eq!(st.marker(&CheckConfig::default()), "content");
        assert!(st.content.is_empty());
        assert!(st.frontmatter.is_empty());
    }

    #[test]
    fn static_builders() {
        let st = StaticRecord::nil()
            .with_marker("body_md")
            .with_frontmatter(json!({"title": "Post"}));
        assert_eq!(st.marker(&CheckConfig::default()), "body_md");
        assert_eq!(st.frontmatter.get("title"), Some(&json!("Post")));

        let ignored = StaticRecord::nil().with_frontmatter(json!([1]));
        assert!(ignored.frontmatter.is_empty());
    }

    #[test]
    fn page_defaults_and_builders() {
        let page = PageRecord::new(ComponentRecord::nil());
        assert!(!page.auto_style);
        assert_eq!(page.static_dir, PathBuf::new());

        let page = page.with_auto_style(true).with_static_dir("assets");
        assert!(page.auto_style);
        assert_eq!(page.static_dir, PathBuf::from("assets"));

        let sp = StaticPageRecord::new(StaticRecord::nil()).with_static_dir("public");
        assert_eq!(sp.component().definer.name(), "nil");
        assert_eq!(sp.static_dir, PathBuf::from("public"));
    }
}
