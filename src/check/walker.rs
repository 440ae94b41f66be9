//! Dependency graph walker: every variable a component tree requires, with
//! the definer path that first required it.

use indexmap::IndexMap;
use tracing::trace;

use super::CheckError;
use crate::config::CheckConfig;
use crate::definer::Definer;

/// Variable name → trace of definer names, root first.
pub type VariableMap = IndexMap<String, Vec<String>>;

/// Collect the variables required by `definer` and its declared
/// dependencies.
///
/// The root contributes all of its free variables. A dependency
/// contributes only what it cannot resolve itself (see
/// [`Definer::external_vars`]). Named dependencies contribute nothing. The
/// first trace seen for a variable wins.
///
/// Definers are immutable and built bottom-up, so the graph is acyclic.
/// Nesting deeper than `config.max_depth` still fails rather than
/// recursing without bound.
pub fn variables_map(definer: &Definer, config: &CheckConfig) -> Result<VariableMap, CheckError> {
    let mut path = Vec::new();
    collect(definer, true, &mut path, config)
}

fn collect(
    definer: &Definer,
    is_root: bool,
    path: &mut Vec<String>,
    config: &CheckConfig,
) -> Result<VariableMap, CheckError> {
    let name = definer.name().to_owned();
    path.push(name.clone());
    if path.len() > config.max_depth + 1 {
        return Err(CheckError::DependencyTooDeep {
            limit: config.max_depth,
            trace: path.clone(),
        });
    }

    let mut map = VariableMap::new();
    if is_root {
        for var in definer.free_vars() {
            map.insert(var.clone(), vec![name.clone()]);
        }
    } else {
        for var in definer.external_vars() {
            map.insert(var.to_owned(), vec![name.clone()]);
        }
    }

    for dependency in definer.dependencies() {
        let Some(child) = dependency.as_definer() else {
            trace!(definer = %name, dependency = dependency.name(), "skipping named dependency");
            continue;
        };
        trace!(definer = %name, dependency = child.name(), "walking dependency");
        for (var, sub_trace) in collect(child, false, path, config)? {
            map.entry(var).or_insert_with(|| {
                let mut full = Vec::with_capacity(sub_trace.len() + 1);
                full.push(name.clone());
                full.extend(sub_trace);
                full
            });
        }
    }

    path.pop();
    Ok(map)
}
