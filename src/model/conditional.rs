//! Conditional models: a value is admitted only once every gate accepts it.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::check::CheckError;

/// A gate predicate. `Ok(false)` rejects the value; `Err` fails admission
/// with a diagnostic.
pub type GateFn<T> = Arc<dyn Fn(&T) -> Result<bool, CheckError> + Send + Sync>;

/// Admission failure.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("{model}: condition '{gate}' is not satisfied")]
    Rejected { model: String, gate: String },
    #[error("{model}: condition '{gate}' failed: {source}")]
    Failed {
        model: String,
        gate: String,
        #[source]
        source: CheckError,
    },
}

impl AdmissionError {
    /// The gate that stopped admission.
    pub fn gate(&self) -> &str {
        match self {
            AdmissionError::Rejected { gate, .. } | AdmissionError::Failed { gate, .. } => gate,
        }
    }

    /// The underlying check error, if the gate failed rather than rejected.
    pub fn check_error(&self) -> Option<&CheckError> {
        match self {
            AdmissionError::Failed { source, .. } => Some(source),
            AdmissionError::Rejected { .. } => None,
        }
    }
}

struct Gate<T> {
    name: String,
    check: GateFn<T>,
}

impl<T> Clone for Gate<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

// ---------------------------------------------------------------------------
// Conditional
// ---------------------------------------------------------------------------

/// A named model with an ordered list of admission gates.
///
/// # Examples
///
/// ```
/// use pagesmith::model::Conditional;
///
/// let even = Conditional::<u32>::new("EVEN").gate("even", |n| Ok(n % 2 == 0));
/// assert!(even.admit(4).is_ok());
/// assert!(even.admit(3).is_err());
/// ```
pub struct Conditional<T> {
    name: String,
    gates: Vec<Gate<T>>,
}

impl<T> Conditional<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gates: Vec::new(),
        }
    }

    /// Append a gate (builder).
    pub fn gate<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> Result<bool, CheckError> + Send + Sync + 'static,
    {
        self.gates.push(Gate {
            name: name.into(),
            check: Arc::new(check),
        });
        self
    }

    /// Inherit the gates of `parent`, applied to the part of `T` that
    /// `project` selects (builder).
    pub fn extends<U, P>(mut self, parent: &Conditional<U>, project: P) -> Self
    where
        T: 'static,
        U: 'static,
        P: Fn(&T) -> &U + Clone + Send + Sync + 'static,
    {
        for gate in &parent.gates {
            let inner = Arc::clone(&gate.check);
            let project = project.clone();
            self.gates.push(Gate {
                name: gate.name.clone(),
                check: Arc::new(move |value: &T| inner(project(value))),
            });
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gate names in evaluation order.
    pub fn gate_names(&self) -> impl Iterator<Item = &str> {
        self.gates.iter().map(|g| g.name.as_str())
    }

    /// Run every gate against `value` in order, stopping at the first that
    /// rejects or fails.
    pub fn check(&self, value: &T) -> Result<(), AdmissionError> {
        for gate in &self.gates {
            match (gate.check)(value) {
                Ok(true) => debug!(model = %self.name, gate = %gate.name, "gate passed"),
                Ok(false) => {
                    debug!(model = %self.name, gate = %gate.name, "gate rejected");
                    return Err(AdmissionError::Rejected {
                        model: self.name.clone(),
                        gate: gate.name.clone(),
                    });
                }
                Err(source) => {
                    debug!(model = %self.name, gate = %gate.name, error = %source, "gate failed");
                    return Err(AdmissionError::Failed {
                        model: self.name.clone(),
                        gate: gate.name.clone(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Admit `value` if every gate accepts it.
    pub fn admit(&self, value: T) -> Result<T, AdmissionError> {
        self.check(&value)?;
        Ok(value)
    }
}

impl<T> Clone for Conditional<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            gates: self.gates.clone(),
        }
    }
}

impl<T> fmt::Debug for Conditional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional")
            .field("name", &self.name)
            .field("gates", &self.gate_names().collect::<Vec<_>>())
            .finish()
    }
}
