//! Injectable diagnostics for conversion side notes.
//!
//! The conversion core never logs directly. Callers hand it a [`Diagnostics`]
//! sink: the binary forwards to `tracing`, tests collect events in memory.

use std::sync::Mutex;

/// A non-fatal observation made while converting a Modelfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Parameter has no LM Studio counterpart and was dropped.
    UnsupportedParameter { name: String, value: String },
    /// Parameter value could not be coerced and was dropped.
    InvalidValue {
        name: String,
        value: String,
        expected: &'static str,
    },
    /// Template was rewritten into Jinja syntax.
    TemplateConverted {
        original_len: usize,
        converted_len: usize,
    },
    /// Upstream returned no Modelfile body; defaults are used instead.
    EmptyModelfile { model: String },
}

/// Receiver for [`Diagnostic`] events.
pub trait Diagnostics {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<F> Diagnostics for F
where
    F: Fn(Diagnostic),
{
    fn emit(&self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::UnsupportedParameter { name, value } => {
                tracing::debug!("unsupported parameter '{}' (value: {}) - skipping", name, value);
            }
            Diagnostic::InvalidValue {
                name,
                value,
                expected,
            } => {
                tracing::debug!(
                    "parameter '{}' is not a valid {} (value: {}) - skipping",
                    name,
                    expected,
                    value
                );
            }
            Diagnostic::TemplateConverted {
                original_len,
                converted_len,
            } => {
                tracing::debug!(
                    "converted template: {} -> {} characters",
                    original_len,
                    converted_len
                );
            }
            Diagnostic::EmptyModelfile { model } => {
                tracing::warn!("empty Modelfile for {}; continuing with defaults", model);
            }
        }
    }
}

/// In-memory sink that records every event.
#[derive(Debug, Default)]
pub struct Collector {
    events: Mutex<Vec<Diagnostic>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Diagnostics for Collector {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn collector_keeps_emission_order() {
        let c = Collector::new();
        c.emit(Diagnostic::EmptyModelfile { model: "a".into() });
        c.emit(Diagnostic::UnsupportedParameter {
            name: "seed".into(),
            value: "42".into(),
        });
        let events = c.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Diagnostic::EmptyModelfile { .. }));
        assert!(matches!(events[1], Diagnostic::UnsupportedParameter { .. }));
    }

    #[test]
    fn closures_act_as_sinks() {
        let seen = RefCell::new(0usize);
        let sink = |_: Diagnostic| *seen.borrow_mut() += 1;
        sink.emit(Diagnostic::TemplateConverted {
            original_len: 1,
            converted_len: 2,
        });
        assert_eq!(*seen.borrow(), 1);
    }
}
