use std::collections::BTreeMap;

/// Directives extracted from an Ollama Modelfile.
///
/// Empty strings mean the directive was absent (or never terminated with any
/// captured content).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedModelfile {
    /// Raw `TEMPLATE` body in Go template syntax.
    pub template: String,
    /// Raw `SYSTEM` body.
    pub system: String,
    /// `PARAMETER` values keyed by name, in first-seen order per key.
    pub parameters: BTreeMap<String, Vec<String>>,
}

impl ParsedModelfile {
    pub fn has_template(&self) -> bool {
        !self.template.is_empty()
    }

    pub fn has_system(&self) -> bool {
        !self.system.is_empty()
    }

    /// All values recorded for `name` (e.g. every `stop` sequence).
    pub fn values(&self, name: &str) -> &[String] {
        self.parameters
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Owned copy of the `stop` sequences, empty when none were declared.
    pub fn stop_strings(&self) -> Vec<String> {
        self.values("stop").to_vec()
    }
}
