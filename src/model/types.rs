//! The refined component types: COMPONENT, STATIC, PAGE and STATIC_PAGE.
//!
//! Each type is obtained only through admission against its schema and is
//! read-only afterwards.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::conditional::{AdmissionError, Conditional};
use crate::check::{check_context, has_marker, validate_structure, CheckError};
use crate::component::{
    ComponentRecord, Content, Context, PageRecord, StaticPageRecord, StaticRecord,
};
use crate::config::CheckConfig;
use crate::definer::Definer;
use crate::render::Renderer;

/// A renderer that schemas can hold on to.
pub type SharedRenderer = Arc<dyn Renderer + Send + Sync>;

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

fn component_schema(config: &CheckConfig) -> Conditional<ComponentRecord> {
    let config = config.clone();
    Conditional::new("COMPONENT").gate("context", move |record: &ComponentRecord| {
        check_context(record, &[], &config).map(|()| true)
    })
}

fn static_schema(config: &CheckConfig) -> Conditional<StaticRecord> {
    let context_config = config.clone();
    let marker_config = config.clone();
    Conditional::new("STATIC")
        .gate("context", move |record: &StaticRecord| {
            let marker = record.marker(&context_config);
            check_context(&record.component, &[marker], &context_config).map(|()| true)
        })
        .gate("marker", move |record: &StaticRecord| {
            let marker = record.marker(&marker_config);
            let component = &record.component;
            Ok(has_marker(&component.definer, marker, &component.context))
        })
}

fn page_schema(renderer: SharedRenderer, config: &CheckConfig) -> Conditional<PageRecord> {
    let structure_config = config.clone();
    let marker = config.marker.clone();
    Conditional::new("PAGE")
        .extends(&component_schema(config), |page: &PageRecord| &page.component)
        .gate("structure", move |page: &PageRecord| {
            let component = &page.component;
            let html = renderer.render(&component.definer, &component.context)?;
            validate_structure(&html, &structure_config)?;
            Ok(true)
        })
        .gate("no_content", move |page: &PageRecord| {
            Ok(!page.component.context.contains(&marker))
        })
}

fn static_page_schema(
    renderer: SharedRenderer,
    config: &CheckConfig,
) -> Conditional<StaticPageRecord> {
    let structure_config = config.clone();
    Conditional::new("STATIC_PAGE")
        .extends(&static_schema(config), |page: &StaticPageRecord| &page.static_)
        .gate("content", |page: &StaticPageRecord| {
            Ok(!page.static_.content.is_empty())
        })
        .gate("structure", move |page: &StaticPageRecord| {
            let html = render_with_content(renderer.as_ref(), &page.static_, &structure_config)?;
            validate_structure(&html, &structure_config)?;
            Ok(true)
        })
}

/// Render a STATIC record with its content converted to HTML and placed in
/// the marker slot.
pub fn render_with_content(
    renderer: &dyn Renderer,
    record: &StaticRecord,
    config: &CheckConfig,
) -> Result<String, CheckError> {
    let content = record.content.to_html()?;
    let mut context = record.component.context.clone();
    context.insert(record.marker(config), content);
    Ok(renderer.render(&record.component.definer, &context)?)
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A component whose context covers every variable its tree requires.
#[derive(Debug, Clone)]
pub struct Component(ComponentRecord);

impl Component {
    /// The COMPONENT admission schema.
    pub fn schema(config: &CheckConfig) -> Conditional<ComponentRecord> {
        component_schema(config)
    }

    pub fn admit(record: ComponentRecord, config: &CheckConfig) -> Result<Self, AdmissionError> {
        Self::schema(config).admit(record).map(Self)
    }

    pub fn definer(&self) -> &Arc<Definer> {
        &self.0.definer
    }

    pub fn context(&self) -> &Context {
        &self.0.context
    }

    pub fn record(&self) -> &ComponentRecord {
        &self.0
    }

    pub fn into_record(self) -> ComponentRecord {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Static
// ---------------------------------------------------------------------------

/// A complete component that exposes a content slot.
#[derive(Debug, Clone)]
pub struct Static {
    record: StaticRecord,
    marker: String,
}

impl Static {
    /// The STATIC admission schema.
    pub fn schema(config: &CheckConfig) -> Conditional<StaticRecord> {
        static_schema(config)
    }

    pub fn admit(record: StaticRecord, config: &CheckConfig) -> Result<Self, AdmissionError> {
        let record = Self::schema(config).admit(record)?;
        let marker = record.marker(config).to_owned();
        Ok(Self { record, marker })
    }

    pub fn definer(&self) -> &Arc<Definer> {
        &self.record.component.definer
    }

    pub fn context(&self) -> &Context {
        &self.record.component.context
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn content(&self) -> &Content {
        &self.record.content
    }

    pub fn frontmatter(&self) -> &Map<String, Value> {
        &self.record.frontmatter
    }

    pub fn record(&self) -> &StaticRecord {
        &self.record
    }

    pub fn into_record(self) -> StaticRecord {
        self.record
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A complete component that renders a well-formed HTML document.
#[derive(Debug, Clone)]
pub struct Page(PageRecord);

impl Page {
    /// The PAGE admission schema.
    pub fn schema(renderer: SharedRenderer, config: &CheckConfig) -> Conditional<PageRecord> {
        page_schema(renderer, config)
    }

    pub fn admit(
        record: PageRecord,
        renderer: SharedRenderer,
        config: &CheckConfig,
    ) -> Result<Self, AdmissionError> {
        Self::schema(renderer, config).admit(record).map(Self)
    }

    pub fn definer(&self) -> &Arc<Definer> {
        &self.0.component.definer
    }

    pub fn context(&self) -> &Context {
        &self.0.component.context
    }

    pub fn auto_style(&self) -> bool {
        self.0.auto_style
    }

    pub fn static_dir(&self) -> &Path {
        &self.0.static_dir
    }

    pub fn record(&self) -> &PageRecord {
        &self.0
    }

    pub fn into_record(self) -> PageRecord {
        self.0
    }
}

// ---------------------------------------------------------------------------
// StaticPage
// ---------------------------------------------------------------------------

/// A STATIC component that, with its content in place, renders a
/// well-formed HTML document.
#[derive(Debug, Clone)]
pub struct StaticPage {
    record: StaticPageRecord,
    marker: String,
}

impl StaticPage {
    /// The STATIC_PAGE admission schema.
    pub fn schema(
        renderer: SharedRenderer,
        config: &CheckConfig,
    ) -> Conditional<StaticPageRecord> {
        static_page_schema(renderer, config)
    }

    pub fn admit(
        record: StaticPageRecord,
        renderer: SharedRenderer,
        config: &CheckConfig,
    ) -> Result<Self, AdmissionError> {
        let record = Self::schema(renderer, config).admit(record)?;
        let marker = record.static_.marker(config).to_owned();
        Ok(Self { record, marker })
    }

    pub fn definer(&self) -> &Arc<Definer> {
        &self.record.static_.component.definer
    }

    pub fn context(&self) -> &Context {
        &self.record.static_.component.context
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn content(&self) -> &Content {
        &self.record.static_.content
    }

    pub fn frontmatter(&self) -> &Map<String, Value> {
        &self.record.static_.frontmatter
    }

    pub fn auto_style(&self) -> bool {
        self.record.auto_style
    }

    pub fn static_dir(&self) -> &Path {
        &self.record.static_dir
    }

    pub fn record(&self) -> &StaticPageRecord {
        &self.record
    }

    pub fn into_record(self) -> StaticPageRecord {
        self.record
    }
}
