//! A renderer that returns canned markup, for testing page checks without
//! evaluating templates.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::component::Context;
use crate::definer::Definer;
use crate::render::{RenderError, Renderer};

/// Returns fixed markup per definer name and records every call.
///
/// # Examples
///
/// ```
/// use pagesmith::component::Context;
/// use pagesmith::definer::Definer;
/// use pagesmith::render::Renderer;
/// use pagesmith::testing::CannedRenderer;
///
/// let renderer = CannedRenderer::new("<p>default</p>").with_output("home", "<h1>home</h1>");
/// let home = Definer::builder("home").build().unwrap();
/// assert_eq!(renderer.render(&home, &Context::new()).unwrap(), "<h1>home</h1>");
/// assert_eq!(renderer.calls(), vec!["home".to_owned()]);
/// ```
#[derive(Debug, Default)]
pub struct CannedRenderer {
    default: Option<String>,
    outputs: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl CannedRenderer {
    /// Render every definer as `html`.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            default: Some(html.into()),
            ..Self::default()
        }
    }

    /// Render nothing unless an output is registered; unregistered definers
    /// are unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render the definer called `name` as `html` (builder).
    pub fn with_output(mut self, name: impl Into<String>, html: impl Into<String>) -> Self {
        self.outputs.insert(name.into(), html.into());
        self
    }

    /// Names of the definers rendered so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Renderer for CannedRenderer {
    fn render(&self, definer: &Definer, _context: &Context) -> Result<String, RenderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(definer.name().to_owned());
        self.outputs
            .get(definer.name())
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| RenderError::Unavailable(definer.name().to_owned()))
    }
}
