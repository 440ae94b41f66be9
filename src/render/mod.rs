//! Rendering: the [`Renderer`] collaborator and the bundled
//! [`TemplateRenderer`].

pub mod template_renderer;

pub use template_renderer::{Helper, TemplateRenderer};

use crate::component::Context;
use crate::definer::{Definer, DefinerError};

/// Errors raised while rendering a definer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("definer '{definer}': undefined value: {source}")]
    Undefined {
        definer: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("definer '{definer}': not a dependency or registered helper: {source}")]
    NotCallable {
        definer: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("call to '{callee}': {message}")]
    Arguments { callee: String, message: String },
    #[error("helper '{helper}' failed: {message}")]
    Helper { helper: String, message: String },
    #[error("dependency nesting exceeds {0} levels while rendering '{1}'")]
    TooDeep(usize, String),
    #[error("no markup available for '{0}'")]
    Unavailable(String),
    #[error(transparent)]
    Definer(#[from] DefinerError),
    #[error("definer '{definer}': {source}")]
    Template {
        definer: String,
        #[source]
        source: minijinja::Error,
    },
}

impl RenderError {
    /// Classify an engine error raised while rendering `definer`.
    pub(crate) fn from_engine(definer: &str, source: minijinja::Error) -> Self {
        let definer = definer.to_owned();
        match source.kind() {
            minijinja::ErrorKind::UndefinedError => RenderError::Undefined { definer, source },
            minijinja::ErrorKind::UnknownFunction => RenderError::NotCallable { definer, source },
            _ => RenderError::Template { definer, source },
        }
    }
}

/// Turns a definer and a context into markup.
///
/// Checks that need rendered output take a `&dyn Renderer`, so tests can
/// substitute canned markup for a real template engine.
pub trait Renderer {
    fn render(&self, definer: &Definer, context: &Context) -> Result<String, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, definer: &Definer, context: &Context) -> Result<String, RenderError> {
        (**self).render(definer, context)
    }
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn render(&self, definer: &Definer, context: &Context) -> Result<String, RenderError> {
        (**self).render(definer, context)
    }
}
