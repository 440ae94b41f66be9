//! Context completeness: prove every variable a component tree requires is
//! resolvable before rendering.

use serde_json::Value;
use tracing::debug;

use super::walker::variables_map;
use super::{CheckError, MissingVariable};
use crate::component::{ComponentRecord, Context};
use crate::config::CheckConfig;
use crate::definer::{Definer, Dependency};

/// Context key that overrides a definer's declared dependencies.
pub const DEPENDS_ON_KEY: &str = "depends_on";

/// The dependencies in effect for `definer` under `context`.
///
/// Only definers that declare `depends_on` honour the context override.
/// The override must be a list (or `null`, meaning none).
pub fn effective_dependencies(
    definer: &Definer,
    context: &Context,
) -> Result<Vec<Dependency>, CheckError> {
    if !definer.declares_depends_on() {
        return Ok(Vec::new());
    }
    match context.get(DEPENDS_ON_KEY) {
        None => Ok(definer.dependencies().to_vec()),
        Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(Dependency::from_value).collect()),
        Some(other) => Err(CheckError::InvalidDependencyDeclaration {
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check that `record`'s context covers every required variable.
///
/// A variable is satisfied when the context has it, when it is a root
/// parameter with a default, when it names an effective dependency, or
/// when it is one of the `reserved` slots. The record's own context is
/// never modified; locals are seeded with `""` on a private copy.
pub fn check_context(
    record: &ComponentRecord,
    reserved: &[&str],
    config: &CheckConfig,
) -> Result<(), CheckError> {
    let definer = &record.definer;

    let mut context = record.context.clone();
    for local in definer.local_vars() {
        if !context.contains(local) {
            context.insert(local, "");
        }
    }

    let dependencies = effective_dependencies(definer, &context)?;
    let required = variables_map(definer, config)?;

    let missing: Vec<MissingVariable> = required
        .into_iter()
        .filter(|(name, _)| {
            !(context.contains(name)
                || definer.params().has_default(name)
                || dependencies.iter().any(|d| d.name() == name)
                || reserved.contains(&name.as_str()))
        })
        .map(|(name, trace)| MissingVariable { name, trace })
        .collect();

    if missing.is_empty() {
        debug!(definer = definer.name(), "context complete");
        Ok(())
    } else {
        debug!(
            definer = definer.name(),
            missing = missing.len(),
            "context incomplete"
        );
        Err(CheckError::MissingContextVariable(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definer::Definer;
    use serde_json::json;
    use std::sync::Arc;

    fn check(definer: Arc<Definer>, context: serde_json::Value) -> Result<(), CheckError> {
        let record = ComponentRecord::new(definer, Context::from_value(context));
        check_context(&record, &[], &CheckConfig::default())
    }

    fn missing_lines(err: CheckError) -> Vec<String> {
        match err {
            CheckError::MissingContextVariable(missing) => {
                missing.iter().map(ToString::to_string).collect()
            }
            other => panic!("expected missing variables, got {other:?}"),
        }
    }

    #[test]
    fn context_satisfies_variables() {
        let d = Definer::builder("t").template("{{ title }}").build().unwrap();
        assert!(check(d, json!({"title": "Home"})).is_ok());
    }

    #[test]
    fn missing_variable_is_reported_with_trace() {
        let d = Definer::builder("t").template("{{ title }}").build().unwrap();
        let err = check(d, json!({})).unwrap_err();
        assert_eq!(missing_lines(err), vec!["'title' (found in: t)"]);
    }

    #[test]
    fn root_defaults_satisfy() {
        let d = Definer::builder("t")
            .param_default("title", "Untitled")
            .template("{{ title }}")
            .build()
            .unwrap();
        assert!(check(d, json!({})).is_ok());
    }

    #[test]
    fn root_required_param_must_be_supplied() {
        let d = Definer::builder("t")
            .param("title")
            .template("{{ title }}")
            .build()
            .unwrap();
        assert!(check(d, json!({})).is_err());
    }

    #[test]
    fn locals_are_seeded() {
        let d = Definer::builder("t")
            .local_value("cls", "x")
            .template("{{ cls }}")
            .build()
            .unwrap();
        assert!(check(d, json!({})).is_ok());
    }

    #[test]
    fn caller_context_is_not_mutated() {
        let d = Definer::builder("t")
            .local_value("cls", "x")
            .template("{{ cls }}")
            .build()
            .unwrap();
        let record = ComponentRecord::new(d, Context::new());
        check_context(&record, &[], &CheckConfig::default()).unwrap();
        assert!(record.context.is_empty());
    }

    #[test]
    fn repeated_checks_agree_and_leave_context_alone() {
        let config = CheckConfig::default();
        let d = Definer::builder("t")
            .local_value("cls", "x")
            .template("{{ cls }}{{ title }}{{ body }}")
            .build()
            .unwrap();

        let passing = ComponentRecord::new(
            Arc::clone(&d),
            Context::new().with("title", "Home").with("body", ""),
        );
        let before = passing.context.clone();
        assert!(check_context(&passing, &[], &config).is_ok());
        assert!(check_context(&passing, &[], &config).is_ok());
        assert_eq!(passing.context, before);

        let failing = ComponentRecord::new(d, Context::new().with("title", "Home"));
        let before = failing.context.clone();
        let first = missing_lines(check_context(&failing, &[], &config).unwrap_err());
        let second = missing_lines(check_context(&failing, &[], &config).unwrap_err());
        assert_eq!(first, vec!["'body' (found in: t)"]);
        assert_eq!(first, second);
        assert_eq!(failing.context, before);
    }

    #[test]
    fn dependency_names_satisfy_their_slot() {
        let button = Definer::builder("button_search").build().unwrap();
        let d = Definer::builder("bar")
            .depends_on([button])
            .template("{{ button_search }}")
            .build()
            .unwrap();
        assert!(check(d, json!({})).is_ok());
    }

    #[test]
    fn dependency_requirements_are_checked() {
        let button = Definer::builder("button_search")
            .template("{{ theme }}")
            .build()
            .unwrap();
        let d = Definer::builder("bar")
            .depends_on([button])
            .template("{{ button_search }}")
            .build()
            .unwrap();
        let err = check(Arc::clone(&d), json!({})).unwrap_err();
        assert_eq!(
            missing_lines(err),
            vec!["'theme' (found in: bar -> button_search)"]
        );
        assert!(check(d, json!({"theme": "dark"})).is_ok());
    }

    #[test]
    fn context_override_replaces_declared_names() {
        let d = Definer::builder("bar")
            .depends_on(Vec::<Dependency>::new())
            .template("{{ nav }}")
            .build()
            .unwrap();
        assert!(check(Arc::clone(&d), json!({})).is_err());
        assert!(check(Arc::clone(&d), json!({"depends_on": ["nav"]})).is_ok());
        assert!(check(d, json!({"depends_on": [{"__name__": "nav"}]})).is_ok());
    }

    #[test]
    fn override_ignored_without_declaration() {
        let d = Definer::builder("bar").template("{{ nav }}").build().unwrap();
        // "depends_on" itself is present in the context, "nav" is not.
        assert!(check(d, json!({"depends_on": ["nav"]})).is_err());
    }

    #[test]
    fn null_override_means_no_dependencies() {
        let button = Definer::builder("button_search").build().unwrap();
        let d = Definer::builder("bar")
            .depends_on([button])
            .template("{{ button_search }}")
            .build()
            .unwrap();
        assert!(check(d, json!({"depends_on": null})).is_err());
    }

    #[test]
    fn scalar_override_is_rejected_before_analysis() {
        let d = Definer::builder("bar")
            .depends_on(Vec::<Dependency>::new())
            .template("{{ missing }}")
            .build()
            .unwrap();
        let err = check(d, json!({"depends_on": "nav"})).unwrap_err();
        assert!(matches!(
            err,
            CheckError::InvalidDependencyDeclaration { found: "string" }
        ));
    }

    #[test]
    fn reserved_slots_satisfy() {
        let d = Definer::builder("post").template("{{ content }}").build().unwrap();
        let record = ComponentRecord::new(d, Context::new());
        assert!(check_context(&record, &["content"], &CheckConfig::default()).is_ok());
        assert!(check_context(&record, &[], &CheckConfig::default()).is_err());
    }

    #[test]
    fn error_message_lists_every_variable() {
        let d = Definer::builder("t").template("{{ a }}{{ b }}").build().unwrap();
        let err = check(d, json!({})).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @r"
        the following template variables are not defined in the context and have no default in the definer's parameters:
        'a' (found in: t)
        'b' (found in: t)
        ");
    }
}
