//! Parameter descriptors: Param, ParamList, argument binding.

use std::collections::BTreeMap;

use serde_json::Value;

use super::core::DefinerError;

/// Named argument values passed to a definer.
pub type Arguments = BTreeMap<String, Value>;

/// A single formal parameter: a name and an optional default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
}

impl Param {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a default value.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Whether omitting this parameter is allowed.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered list of parameters with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Returns `false` (and leaves the list unchanged)
    /// if a parameter of that name already exists.
    pub fn push(&mut self, param: Param) -> bool {
        if self.contains(&param.name) {
            return false;
        }
        self.params.push(param);
        true
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `name` is a parameter that carries a default.
    pub fn has_default(&self, name: &str) -> bool {
        self.get(name).is_some_and(Param::has_default)
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Bind `args` to the parameters of `definer`.
    ///
    /// Omitted parameters take their default. A missing required parameter
    /// or an argument that names no parameter is an error.
    pub fn bind(&self, definer: &str, args: &Arguments) -> Result<Arguments, DefinerError> {
        if let Some(unknown) = args.keys().find(|k| !self.contains(k)) {
            return Err(DefinerError::UnexpectedArgument {
                definer: definer.to_owned(),
                name: unknown.clone(),
            });
        }

        let mut bound = Arguments::new();
        for param in &self.params {
            let value = match (args.get(&param.name), &param.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(DefinerError::MissingArgument {
                        definer: definer.to_owned(),
                        name: param.name.clone(),
                    })
                }
            };
            bound.insert(param.name.clone(), value);
        }
        Ok(bound)
    }
}

impl FromIterator<Param> for ParamList {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        let mut list = ParamList::new();
        for param in iter {
            list.push(param);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> ParamList {
        [
            Param::required("title"),
            Param::with_default("level", 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn push_rejects_duplicates() {
        let mut list = params();
        assert!(!list.push(Param::required("title")));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn defaults_are_reported_per_name() {
        let list = params();
        assert!(list.has_default("level"));
        assert!(!list.has_default("title"));
        assert!(!list.has_default("absent"));
    }

    #[test]
    fn names_keep_declaration_order() {
        assert_eq!(params().names().collect::<Vec<_>>(), vec!["title", "level"]);
    }

    #[test]
    fn bind_fills_defaults() {
        let args = Arguments::from([("title".to_owned(), json!("Hi"))]);
        let bound = params().bind("heading", &args).unwrap();
        assert_eq!(bound.get("title"), Some(&json!("Hi")));
        assert_eq!(bound.get("level"), Some(&json!(1)));
    }

    #[test]
    fn bind_rejects_missing_required() {
        let err = params().bind("heading", &Arguments::new()).unwrap_err();
        assert!(matches!(
            err,
            DefinerError::MissingArgument { ref name, .. } if name == "title"
        ));
    }

    #[test]
    fn bind_rejects_unknown_arguments() {
        let args = Arguments::from([
            ("title".to_owned(), json!("Hi")),
            ("colour".to_owned(), json!("red")),
        ]);
        let err = params().bind("heading", &args).unwrap_err();
        assert!(matches!(
            err,
            DefinerError::UnexpectedArgument { ref name, .. } if name == "colour"
        ));
    }
}
