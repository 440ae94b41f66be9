//! Definer: an immutable template-fragment producer.
//!
//! A [`Definer`] records its formal parameters, the locals it binds while
//! producing its fragment, the free variables the fragment references and
//! the dependencies it composes. All of it is computed once, in
//! [`DefinerBuilder::build`], and never changes afterwards, so one definer
//! can back any number of components across threads.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::Value;

use super::dependency::Dependency;
use super::params::{Arguments, Param, ParamList};

/// Names the template engine binds on its own.
const ENGINE_NAMES: &[&str] = &["loop", "caller", "range", "dict", "debug", "namespace"];

/// Errors from building or invoking a definer.
#[derive(Debug, thiserror::Error)]
pub enum DefinerError {
    #[error("definer '{definer}': invalid template: {source}")]
    Parse {
        definer: String,
        #[source]
        source: minijinja::Error,
    },
    #[error("definer '{definer}': duplicate parameter '{name}'")]
    DuplicateParameter { definer: String, name: String },
    #[error("definer '{definer}': duplicate local '{name}'")]
    DuplicateLocal { definer: String, name: String },
    #[error("definer '{definer}': local '{name}' shadows a parameter")]
    LocalShadowsParameter { definer: String, name: String },
    #[error("definer '{definer}': missing required argument '{name}'")]
    MissingArgument { definer: String, name: String },
    #[error("definer '{definer}': unexpected argument '{name}'")]
    UnexpectedArgument { definer: String, name: String },
    #[error("definer '{definer}': computing local '{local}' failed: {message}")]
    Local {
        definer: String,
        local: String,
        message: String,
    },
}

/// Computes a local from the bound parameters (and earlier locals).
pub type LocalFn = Arc<dyn Fn(&Arguments) -> Result<Value, String> + Send + Sync>;

#[derive(Clone)]
struct Local {
    name: String,
    producer: LocalFn,
}

// ---------------------------------------------------------------------------
// Definer
// ---------------------------------------------------------------------------

/// An immutable description of a template-fragment producer.
pub struct Definer {
    name: String,
    params: ParamList,
    locals: Vec<Local>,
    source: String,
    free_vars: IndexSet<String>,
    depends_on: Option<Vec<Dependency>>,
}

/// The result of invoking a definer.
#[derive(Debug, Clone)]
pub struct Fragment<'a> {
    /// Fragment source text.
    pub source: &'a str,
    /// Bound parameters followed by computed locals.
    pub bindings: Arguments,
}

impl Definer {
    /// Start describing a definer called `name`.
    pub fn builder(name: impl Into<String>) -> DefinerBuilder {
        DefinerBuilder::new(name)
    }

    /// An empty definer named `nil`: no parameters, empty fragment.
    pub fn nil() -> Arc<Definer> {
        Arc::new(Definer {
            name: "nil".to_owned(),
            params: ParamList::new(),
            locals: Vec::new(),
            source: String::new(),
            free_vars: IndexSet::new(),
            depends_on: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Names bound internally while producing the fragment, in order.
    pub fn local_vars(&self) -> impl Iterator<Item = &str> {
        self.locals.iter().map(|l| l.name.as_str())
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.locals.iter().any(|l| l.name == name)
    }

    /// Names the fragment references without binding them itself, sorted.
    pub fn free_vars(&self) -> &IndexSet<String> {
        &self.free_vars
    }

    /// Free variables this definer still needs from outside when it is
    /// composed as a dependency. Locals, defaulted parameters and the slots
    /// of its own declared dependencies are resolved by the definer itself.
    pub fn external_vars(&self) -> impl Iterator<Item = &str> {
        self.free_vars.iter().map(String::as_str).filter(|name| {
            !self.has_local(name)
                && !self.params.has_default(name)
                && self.dependency(name).is_none()
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the definer declares a `depends_on` list at all.
    pub fn declares_depends_on(&self) -> bool {
        self.depends_on.is_some()
    }

    /// The declared `depends_on` list, empty if none is declared.
    pub fn dependencies(&self) -> &[Dependency] {
        self.depends_on.as_deref().unwrap_or(&[])
    }

    /// Look up a declared dependency by its slot name.
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies().iter().find(|d| d.name() == name)
    }

    /// Invoke the definer: bind `args`, compute locals and hand back the
    /// fragment.
    pub fn call(&self, args: &Arguments) -> Result<Fragment<'_>, DefinerError> {
        let mut bindings = self.params.bind(&self.name, args)?;
        for local in &self.locals {
            let value = (local.producer)(&bindings).map_err(|message| DefinerError::Local {
                definer: self.name.clone(),
                local: local.name.clone(),
                message,
            })?;
            bindings.insert(local.name.clone(), value);
        }
        Ok(Fragment {
            source: &self.source,
            bindings,
        })
    }
}

impl fmt::Debug for Definer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definer")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("locals", &self.local_vars().collect::<Vec<_>>())
            .field("free_vars", &self.free_vars)
            .field("depends_on", &self.depends_on)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// DefinerBuilder
// ---------------------------------------------------------------------------

/// Builder for [`Definer`].
///
/// # Examples
///
/// ```
/// use pagesmith::definer::Definer;
/// use serde_json::json;
///
/// let button = Definer::builder("button_search")
///     .param_default("button", json!({"label": "Search"}))
///     .local("label", |args| Ok(args["button"]["label"].clone()))
///     .template("<button>{{ label }}</button>")
///     .build()
///     .unwrap();
/// assert_eq!(button.free_vars().len(), 1);
/// ```
pub struct DefinerBuilder {
    name: String,
    params: Vec<Param>,
    locals: Vec<Local>,
    source: String,
    depends_on: Option<Vec<Dependency>>,
}

impl DefinerBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            locals: Vec::new(),
            source: String::new(),
            depends_on: None,
        }
    }

    /// Declare a required parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param::required(name));
        self
    }

    /// Declare a parameter with a default value.
    pub fn param_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param::with_default(name, default));
        self
    }

    /// Declare a local computed from the bound arguments.
    pub fn local<F>(mut self, name: impl Into<String>, producer: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.locals.push(Local {
            name: name.into(),
            producer: Arc::new(producer),
        });
        self
    }

    /// Declare a local with a constant value.
    pub fn local_value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.local(name, move |_| Ok(value.clone()))
    }

    /// Set the fragment source.
    pub fn template(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Declare the dependencies this definer composes.
    pub fn depends_on<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dependency>,
    {
        self.depends_on = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Parse the fragment, analyse it and freeze the definer.
    pub fn build(self) -> Result<Arc<Definer>, DefinerError> {
        let mut params = ParamList::new();
        for param in self.params {
            let name = param.name.clone();
            if !params.push(param) {
                return Err(DefinerError::DuplicateParameter {
                    definer: self.name,
                    name,
                });
            }
        }

        for (i, local) in self.locals.iter().enumerate() {
            if params.contains(&local.name) {
                return Err(DefinerError::LocalShadowsParameter {
                    definer: self.name,
                    name: local.name.clone(),
                });
            }
            if self.locals[..i].iter().any(|l| l.name == local.name) {
                return Err(DefinerError::DuplicateLocal {
                    definer: self.name,
                    name: local.name.clone(),
                });
            }
        }

        let free_vars =
            free_variables(&self.name, &self.source).map_err(|source| DefinerError::Parse {
                definer: self.name.clone(),
                source,
            })?;

        Ok(Arc::new(Definer {
            name: self.name,
            params,
            locals: self.locals,
            source: self.source,
            free_vars,
            depends_on: self.depends_on,
        }))
    }
}

/// Parse `source` and collect the top-level names it reads without binding.
fn free_variables(name: &str, source: &str) -> Result<IndexSet<String>, minijinja::Error> {
    let env = minijinja::Environment::new();
    let template = env.template_from_named_str(name, source)?;
    let mut names: Vec<String> = template
        .undeclared_variables(false)
        .into_iter()
        .filter(|var| !ENGINE_NAMES.contains(&var.as_str()))
        .collect();
    names.sort_unstable();
    Ok(names.into_iter().collect())
}
