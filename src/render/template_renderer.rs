//! The bundled renderer: evaluates definer fragments with minijinja and
//! exposes dependency slots and named helpers as callable values.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use minijinja::value::{Object, ObjectRepr, Value as TemplateValue, ValueKind};
use minijinja::{Environment, ErrorKind, Output, State, UndefinedBehavior};
use serde_json::Value;
use tracing::trace;

use super::{RenderError, Renderer};
use crate::component::Context;
use crate::config::CheckConfig;
use crate::definer::{Arguments, Definer, Dependency};

/// A named callable available to fragments: positional and keyword
/// arguments in, a value out.
pub type Helper = Arc<dyn Fn(&[Value], &[(String, Value)]) -> Result<Value, String> + Send + Sync>;

/// First failure raised inside a slot, kept until the enclosing render
/// returns.
type Failure = Arc<Mutex<Option<RenderError>>>;

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Renders definers by evaluating their fragments with minijinja.
///
/// Names resolve against the fragment's own bindings first, then the
/// definer's parameters and locals, then the context, then the definer's
/// dependencies, then the registered helpers. A dependency referenced bare
/// (`{{ nav }}`) renders with the current context; called
/// (`{{ nav(items, active=1) }}`) it renders with the arguments layered
/// over that context. Strings are emitted verbatim and `none` renders as
/// nothing.
#[derive(Clone, Default)]
pub struct TemplateRenderer {
    helpers: Arc<HashMap<String, Helper>>,
    config: CheckConfig,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for the depth limit (builder).
    pub fn with_config(mut self, config: CheckConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a helper callable under `name` (builder).
    pub fn with_helper<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&[Value], &[(String, Value)]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.helpers).insert(name.into(), Arc::new(helper));
        self
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    fn render_at(
        &self,
        definer: &Definer,
        context: &Context,
        depth: usize,
    ) -> Result<String, RenderError> {
        if depth > self.config.max_depth {
            return Err(RenderError::TooDeep(
                self.config.max_depth,
                definer.name().to_owned(),
            ));
        }
        trace!(definer = definer.name(), depth, "rendering");

        let args: Arguments = context
            .iter()
            .filter(|(name, _)| definer.params().contains(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let fragment = definer.call(&args)?;

        let failure = Failure::default();
        let frame = Arc::new(Frame {
            renderer: self.clone(),
            context: context.clone(),
            depth,
            failure: Arc::clone(&failure),
        });

        let mut values: BTreeMap<String, TemplateValue> = context
            .iter()
            .map(|(name, value)| (name.clone(), TemplateValue::from_serialize(value)))
            .collect();
        for (name, value) in &fragment.bindings {
            values.insert(name.clone(), TemplateValue::from_serialize(value));
        }
        for dependency in definer.dependencies() {
            let Dependency::Definer(child) = dependency else {
                continue;
            };
            values
                .entry(child.name().to_owned())
                .or_insert_with(|| {
                    TemplateValue::from_object(Slot::Dependency {
                        definer: Arc::clone(child),
                        frame: Arc::clone(&frame),
                    })
                });
        }

        let env = self.environment(&failure);
        let rendered = env
            .template_from_named_str(definer.name(), fragment.source)
            .and_then(|template| template.render(&values));
        rendered.map_err(|err| {
            take_failure(&failure).unwrap_or_else(|| RenderError::from_engine(definer.name(), err))
        })
    }

    fn environment<'source>(&self, failure: &Failure) -> Environment<'source> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_formatter(format_value);
        for (name, helper) in self.helpers.iter() {
            env.add_global(
                name.clone(),
                TemplateValue::from_object(Slot::Helper {
                    name: name.clone(),
                    helper: Arc::clone(helper),
                    failure: Arc::clone(failure),
                }),
            );
        }
        env
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, definer: &Definer, context: &Context) -> Result<String, RenderError> {
        self.render_at(definer, context, 0)
    }
}

impl fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut helpers: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        helpers.sort_unstable();
        f.debug_struct("TemplateRenderer")
            .field("helpers", &helpers)
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Frame and slots
// ---------------------------------------------------------------------------

/// The render in progress that a dependency slot was created for.
#[derive(Debug)]
struct Frame {
    renderer: TemplateRenderer,
    context: Context,
    depth: usize,
    failure: Failure,
}

impl Frame {
    fn render_dependency(
        &self,
        dependency: &Definer,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<String, RenderError> {
        let params: Vec<&str> = dependency.params().names().collect();
        if args.len() > params.len() {
            return Err(RenderError::Arguments {
                callee: dependency.name().to_owned(),
                message: format!(
                    "takes {} positional argument(s) but {} were given",
                    params.len(),
                    args.len()
                ),
            });
        }

        let mut context = self.context.clone();
        for (param, value) in params.iter().zip(args) {
            context.insert(*param, value);
        }
        for (name, value) in kwargs {
            if !dependency.params().contains(&name) {
                return Err(RenderError::Arguments {
                    callee: dependency.name().to_owned(),
                    message: format!("unexpected keyword argument '{}'", name),
                });
            }
            context.insert(name, value);
        }

        self.renderer.render_at(dependency, &context, self.depth + 1)
    }
}

/// A callable template value: a dependency definer or a registered helper.
enum Slot {
    Dependency {
        definer: Arc<Definer>,
        frame: Arc<Frame>,
    },
    Helper {
        name: String,
        helper: Helper,
        failure: Failure,
    },
}

impl Slot {
    fn name(&self) -> &str {
        match self {
            Slot::Dependency { definer, .. } => definer.name(),
            Slot::Helper { name, .. } => name,
        }
    }

    /// The value of a bare reference.
    fn resolve(&self) -> Result<TemplateValue, minijinja::Error> {
        self.invoke(&[])
    }

    fn invoke(&self, args: &[TemplateValue]) -> Result<TemplateValue, minijinja::Error> {
        let (positional, keywords) = split_arguments(args)?;
        let result = match self {
            Slot::Dependency { definer, frame } => frame
                .render_dependency(definer, positional, keywords)
                .map(TemplateValue::from),
            Slot::Helper { name, helper, .. } => helper(&positional, &keywords)
                .map(|value| TemplateValue::from_serialize(&value))
                .map_err(|message| RenderError::Helper {
                    helper: name.clone(),
                    message,
                }),
        };
        result.map_err(|err| self.park(err))
    }

    /// Keep `err` for the enclosing render and hand the engine a stand-in.
    fn park(&self, err: RenderError) -> minijinja::Error {
        let stand_in = minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("'{}' failed: {}", self.name(), err),
        );
        let failure = match self {
            Slot::Dependency { frame, .. } => &frame.failure,
            Slot::Helper { failure, .. } => failure,
        };
        failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(err);
        stand_in
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Dependency { definer, .. } => write!(f, "<dependency {}>", definer.name()),
            Slot::Helper { name, .. } => write!(f, "<helper {}>", name),
        }
    }
}

impl Object for Slot {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        args: &[TemplateValue],
    ) -> Result<TemplateValue, minijinja::Error> {
        self.invoke(args)
    }
}

fn take_failure(failure: &Failure) -> Option<RenderError> {
    failure.lock().unwrap_or_else(PoisonError::into_inner).take()
}

// ---------------------------------------------------------------------------
// Value conversion and output
// ---------------------------------------------------------------------------

fn to_json(value: &TemplateValue) -> Result<Value, minijinja::Error> {
    serde_json::to_value(value)
        .map_err(|err| minijinja::Error::new(ErrorKind::BadSerialization, err.to_string()))
}

/// Split engine call arguments into positional values and keyword pairs.
fn split_arguments(
    args: &[TemplateValue],
) -> Result<(Vec<Value>, Vec<(String, Value)>), minijinja::Error> {
    let (positional, keywords) = match args.split_last() {
        Some((last, rest)) if last.is_kwargs() => (rest, Some(last)),
        _ => (args, None),
    };
    let positional = positional.iter().map(to_json).collect::<Result<Vec<_>, _>>()?;
    let keywords = match keywords.map(to_json).transpose()? {
        Some(Value::Object(map)) => map.into_iter().collect(),
        _ => Vec::new(),
    };
    Ok((positional, keywords))
}

/// Output rules: `none` is empty, slots render through their bare value,
/// sequences and maps render as JSON, everything else as the engine would
/// without auto-escaping.
fn format_value(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &TemplateValue,
) -> Result<(), minijinja::Error> {
    if value.is_none() {
        return Ok(());
    }
    if let Some(slot) = value.downcast_object_ref::<Slot>() {
        return format_value(out, state, &slot.resolve()?);
    }
    match value.kind() {
        ValueKind::Seq | ValueKind::Map => {
            let json = serde_json::to_string(value)
                .map_err(|err| minijinja::Error::new(ErrorKind::BadSerialization, err.to_string()))?;
            out.write_str(&json)
                .map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "could not write output"))
        }
        _ => minijinja::escape_formatter(out, state, value),
    }
}
