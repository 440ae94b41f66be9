//! Marker presence: does a definer's fragment expose a content slot?

use regex::Regex;
use tracing::{debug, warn};

use crate::component::Context;
use crate::definer::{Arguments, Definer};

/// Whether `definer`'s fragment contains a bare `{{ marker }}` slot that
/// neither its parameters nor `context` fill.
///
/// The definer is invoked with the context entries that match its
/// parameters. A failed invocation counts as "no slot".
pub fn has_marker(definer: &Definer, marker: &str, context: &Context) -> bool {
    if definer.params().contains(marker) || context.contains(marker) {
        return false;
    }

    let args: Arguments = context
        .iter()
        .filter(|(name, _)| definer.params().contains(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    let fragment = match definer.call(&args) {
        Ok(fragment) => fragment,
        Err(err) => {
            warn!(definer = definer.name(), error = %err, "marker probe failed");
            return false;
        }
    };

    let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(marker));
    let found = match Regex::new(&pattern) {
        Ok(re) => re.is_match(fragment.source),
        Err(err) => {
            warn!(marker, error = %err, "invalid marker pattern");
            false
        }
    };
    debug!(definer = definer.name(), marker, found, "marker probe");
    found
}
