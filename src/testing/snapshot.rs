//! Snapshot helpers.
//!
//! Functions for rendering components into strings suitable for snapshot
//! testing and assertions.

use crate::component::ComponentRecord;
use crate::render::{RenderError, Renderer};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a component record with `renderer` and collapse its whitespace.
///
/// # Examples
///
/// ```
/// use pagesmith::component::{ComponentRecord, Context};
/// use pagesmith::definer::Definer;
/// use pagesmith::render::TemplateRenderer;
/// use pagesmith::testing::render_to_string;
///
/// let d = Definer::builder("p").template("<p>\n  {{ x }}\n</p>").build().unwrap();
/// let record = ComponentRecord::new(d, Context::new().with("x", "hi"));
/// assert_eq!(render_to_string(&TemplateRenderer::new(), &record).unwrap(), "<p> hi </p>");
/// ```
pub fn render_to_string(
    renderer: &dyn Renderer,
    record: &ComponentRecord,
) -> Result<String, RenderError> {
    let html = renderer.render(&record.definer, &record.context)?;
    Ok(collapse_whitespace(&html))
}

/// Replace every whitespace run with a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}
