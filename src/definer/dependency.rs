//! Dependency declarations: other definers or opaque named callables.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::core::Definer;

/// Something a definer composes: another definer, or an opaque callable
/// (a tag builder or helper) known only by name.
#[derive(Clone)]
pub enum Dependency {
    Definer(Arc<Definer>),
    Named(String),
}

impl Dependency {
    /// The slot name this dependency fills in its dependent's fragment.
    pub fn name(&self) -> &str {
        match self {
            Dependency::Definer(definer) => definer.name(),
            Dependency::Named(name) => name,
        }
    }

    /// The underlying definer, if this dependency is one.
    pub fn as_definer(&self) -> Option<&Arc<Definer>> {
        match self {
            Dependency::Definer(definer) => Some(definer),
            Dependency::Named(_) => None,
        }
    }

    /// Normalize a dependency declared as a JSON value.
    ///
    /// Strings name the callable directly. Objects are asked for a
    /// `__name__` or `name` entry. Anything else falls back to its JSON text.
    pub fn from_value(value: &Value) -> Self {
        let name = match value {
            Value::String(name) => name.clone(),
            Value::Object(map) => map
                .get("__name__")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| value.to_string()),
            other => other.to_string(),
        };
        Dependency::Named(name)
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Definer(definer) => write!(f, "Definer({})", definer.name()),
            Dependency::Named(name) => write!(f, "Named({})", name),
        }
    }
}

impl From<Arc<Definer>> for Dependency {
    fn from(definer: Arc<Definer>) -> Self {
        Dependency::Definer(definer)
    }
}

impl From<&Arc<Definer>> for Dependency {
    fn from(definer: &Arc<Definer>) -> Self {
        Dependency::Definer(Arc::clone(definer))
    }
}

impl From<&str> for Dependency {
    fn from(name: &str) -> Self {
        Dependency::Named(name.to_owned())
    }
}

impl From<String> for Dependency {
    fn from(name: String) -> Self {
        Dependency::Named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definer_dependency_uses_definer_name() {
        let definer = Definer::builder("button_search").build().unwrap();
        let dep = Dependency::from(&definer);
        assert_eq!(dep.name(), "button_search");
        assert!(dep.as_definer().is_some());
    }

    #[test]
    fn named_dependency() {
        let dep = Dependency::from("if_div");
        assert_eq!(dep.name(), "if_div");
        assert!(dep.as_definer().is_none());
    }

    #[test]
    fn from_value_name_extraction() {
        assert_eq!(Dependency::from_value(&json!("nav")).name(), "nav");
        assert_eq!(
            Dependency::from_value(&json!({"__name__": "link", "name": "other"})).name(),
            "link"
        );
        assert_eq!(Dependency::from_value(&json!({"name": "ul"})).name(), "ul");
        assert_eq!(Dependency::from_value(&json!(7)).name(), "7");
        assert_eq!(Dependency::from_value(&json!({"x": 1})).name(), r#"{"x":1}"#);
    }

    #[test]
    fn debug_shows_kind_and_name() {
        assert_eq!(format!("{:?}", Dependency::from("ul")), "Named(ul)");
    }
}
