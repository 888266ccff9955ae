//! Parser for the `TEMPLATE`, `SYSTEM` and `PARAMETER` directives of an Ollama
//! Modelfile.
//!
//! Values may be unquoted, `"quoted"`, or span several lines when opened with
//! `"` or `"""` and closed by a line ending in the same delimiter. Other
//! directives (`FROM`, `LICENSE`, `MESSAGE`, ...) are ignored.

use crate::model::ParsedModelfile;

const TRIPLE_QUOTE: &str = "\"\"\"";
const QUOTE: &str = "\"";

/// Capture state of a single multi-line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Capture {
    #[default]
    Idle,
    TripleQuoted,
    DoubleQuoted,
}

impl Capture {
    fn terminator(self) -> Option<&'static str> {
        match self {
            Capture::Idle => None,
            Capture::TripleQuoted => Some(TRIPLE_QUOTE),
            Capture::DoubleQuoted => Some(QUOTE),
        }
    }
}

/// One capturable field (`TEMPLATE` or `SYSTEM`).
#[derive(Debug, Default)]
struct Field {
    state: Capture,
    single: String,
    lines: Vec<String>,
}

impl Field {
    fn is_capturing(&self) -> bool {
        self.state != Capture::Idle
    }

    /// Handle the value part of a directive line while idle.
    fn open(&mut self, value: &str) {
        if let Some(rest) = value.strip_prefix(TRIPLE_QUOTE) {
            if let Some(inner) = rest.strip_suffix(TRIPLE_QUOTE) {
                self.single = inner.to_string();
            } else {
                self.begin(Capture::TripleQuoted, rest);
            }
        } else if let Some(rest) = value.strip_prefix(QUOTE) {
            if let Some(inner) = rest.strip_suffix(QUOTE) {
                self.single = inner.to_string();
            } else {
                self.begin(Capture::DoubleQuoted, rest);
            }
        } else if !value.is_empty() {
            self.single = value.to_string();
        }
    }

    fn begin(&mut self, state: Capture, first: &str) {
        self.state = state;
        if !first.is_empty() {
            self.lines.push(first.to_string());
        }
    }

    /// Feed a raw line while capturing.
    fn feed(&mut self, line: &str) {
        let Some(terminator) = self.state.terminator() else {
            return;
        };
        let end = line.trim_end();
        if let Some(body) = end.strip_suffix(terminator) {
            if !body.is_empty() {
                self.lines.push(body.to_string());
            }
            self.state = Capture::Idle;
        } else {
            self.lines.push(line.to_string());
        }
    }

    fn finish(self) -> String {
        if self.lines.is_empty() {
            self.single
        } else {
            self.lines.join("\n")
        }
    }
}

/// Return the directive value when `line` starts with `keyword` as a whole word.
fn directive<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.is_empty() {
        return Some(rest);
    }
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Extract template, system prompt, and parameters from Modelfile text.
pub fn parse_modelfile(content: &str) -> ParsedModelfile {
    let mut parsed = ParsedModelfile::default();
    if content.is_empty() {
        return parsed;
    }

    let mut template = Field::default();
    let mut system = Field::default();

    for line in content.split('\n') {
        let trimmed = line.trim();

        if !template.is_capturing()
            && let Some(value) = directive(trimmed, "TEMPLATE")
        {
            template.open(value);
        } else if template.is_capturing() {
            template.feed(line);
        } else if !system.is_capturing()
            && let Some(value) = directive(trimmed, "SYSTEM")
        {
            system.open(value);
        } else if system.is_capturing() {
            system.feed(line);
        } else if let Some(rest) = directive(trimmed, "PARAMETER") {
            let Some((name, value)) = rest.split_once(char::is_whitespace) else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            parsed
                .parameters
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    // Unterminated captures keep whatever was collected.
    parsed.template = template.finish();
    parsed.system = system.finish();
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_full_modelfile() {
        let modelfile = r#"
TEMPLATE """{{ if .System }}{{ .System }}{{ end }}<think>
</think>{{ .Prompt }}"""
SYSTEM "You are a helpful assistant."
PARAMETER temperature 0.7
PARAMETER top_p 0.9
PARAMETER stop "User:"
PARAMETER stop "Assistant:"
"#;
        let parsed = parse_modelfile(modelfile);
        assert_eq!(
            parsed.template,
            "{{ if .System }}{{ .System }}{{ end }}<think>\n</think>{{ .Prompt }}"
        );
        assert_eq!(parsed.system, "You are a helpful assistant.");
        assert_eq!(parsed.values("stop"), ["User:", "Assistant:"]);
        assert_eq!(parsed.values("temperature"), ["0.7"]);
        assert_eq!(parsed.values("top_p"), ["0.9"]);
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(parse_modelfile(""), ParsedModelfile::default());
    }

    #[test]
    fn single_line_quoted_values_strip_quotes() {
        let parsed = parse_modelfile("TEMPLATE \"{{ .Prompt }}\"\nSYSTEM \"Be brief.\"");
        assert_eq!(parsed.template, "{{ .Prompt }}");
        assert_eq!(parsed.system, "Be brief.");
    }

    #[test]
    fn single_line_triple_quoted_value() {
        let parsed = parse_modelfile("SYSTEM \"\"\"Answer in French.\"\"\"\nPARAMETER top_k 40");
        assert_eq!(parsed.system, "Answer in French.");
        assert_eq!(parsed.values("top_k"), ["40"]);
    }

    #[test]
    fn unquoted_value_is_taken_verbatim() {
        let parsed = parse_modelfile("SYSTEM You are terse.");
        assert_eq!(parsed.system, "You are terse.");
    }

    #[test]
    fn triple_quoted_block_keeps_inner_lines_verbatim() {
        let modelfile = "TEMPLATE \"\"\"\n<|user|>\n  {{ .Prompt }}\n<|assistant|>\n\"\"\"";
        let parsed = parse_modelfile(modelfile);
        assert_eq!(parsed.template, "<|user|>\n  {{ .Prompt }}\n<|assistant|>");
    }

    #[test]
    fn double_quoted_block_spans_lines() {
        let modelfile = "SYSTEM \"first line\nsecond line\"\nPARAMETER num_ctx 4096";
        let parsed = parse_modelfile(modelfile);
        assert_eq!(parsed.system, "first line\nsecond line");
        assert_eq!(parsed.values("num_ctx"), ["4096"]);
    }

    #[test]
    fn double_quoted_template_spans_lines() {
        let modelfile = "TEMPLATE \"<|user|>\n{{ .Prompt }}\n<|assistant|>\"\nPARAMETER stop x";
        let parsed = parse_modelfile(modelfile);
        assert_eq!(parsed.template, "<|user|>\n{{ .Prompt }}\n<|assistant|>");
        assert_eq!(parsed.values("stop"), ["x"]);
    }

    #[test]
    fn template_directive_wins_inside_open_system_block() {
        let modelfile = "SYSTEM \"\"\"sys\nTEMPLATE \"{{ .Prompt }}\"\nend\"\"\"";
        let parsed = parse_modelfile(modelfile);
        assert_eq!(parsed.template, "{{ .Prompt }}");
        assert_eq!(parsed.system, "sys\nend");
    }

    #[test]
    fn parameters_inside_capture_are_template_text() {
        let modelfile = "TEMPLATE \"\"\"a\nPARAMETER stop x\nb\"\"\"";
        let parsed = parse_modelfile(modelfile);
        assert_eq!(parsed.template, "a\nPARAMETER stop x\nb");
        assert!(parsed.parameters.is_empty());
    }

    #[test]
    fn unterminated_capture_returns_partial_text() {
        let parsed = parse_modelfile("TEMPLATE \"\"\"{{ .Prompt }}\nmore");
        assert_eq!(parsed.template, "{{ .Prompt }}\nmore");
    }

    #[test]
    fn repeated_parameters_preserve_order() {
        let parsed = parse_modelfile("PARAMETER stop \"A\"\nPARAMETER stop \"B\"\nPARAMETER stop \"C\"");
        assert_eq!(parsed.values("stop"), ["A", "B", "C"]);
    }

    #[test]
    fn parameter_without_value_is_ignored() {
        let parsed = parse_modelfile("PARAMETER seed\nPARAMETER mirostat 0");
        assert!(!parsed.parameters.contains_key("seed"));
        assert_eq!(parsed.values("mirostat"), ["0"]);
    }

    #[test]
    fn keyword_must_be_a_whole_word() {
        let parsed = parse_modelfile("TEMPLATES \"x\"\nSYSTEMIC \"y\"\nPARAMETERS stop z");
        assert_eq!(parsed, ParsedModelfile::default());
    }

    #[test]
    fn other_directives_are_ignored() {
        let modelfile = "FROM llama3\nLICENSE \"\"\"MIT\"\"\"\n# comment\nMESSAGE user hi";
        assert_eq!(parse_modelfile(modelfile), ParsedModelfile::default());
    }

    #[test]
    fn ollama_show_output_shape() {
        let modelfile = r#"# Modelfile generated by "ollama show"
# To build a new Modelfile based on this, replace FROM with:
# FROM glm4:latest

FROM /usr/share/ollama/.ollama/models/blobs/sha256-b506a070d115
TEMPLATE """[gMASK]<sop>{{ if .System }}<|system|>
{{ .System }}{{ end }}<|user|>
{{ .Prompt }}<|assistant|>
"""
PARAMETER stop <|system|>
PARAMETER stop <|user|>
PARAMETER stop <|assistant|>
PARAMETER num_ctx 8192
"#;
        let parsed = parse_modelfile(modelfile);
        assert!(parsed.template.starts_with("[gMASK]<sop>"));
        assert!(parsed.template.ends_with("<|assistant|>"));
        assert_eq!(
            parsed.values("stop"),
            ["<|system|>", "<|user|>", "<|assistant|>"]
        );
        assert_eq!(parsed.values("num_ctx"), ["8192"]);
        assert!(parsed.system.is_empty());
    }

    proptest! {
        #[test]
        fn directive_free_text_parses_empty(lines in proptest::collection::vec("[a-z0-9 #{}.<>|]{0,40}", 0..12)) {
            let content = lines.join("\n");
            let parsed = parse_modelfile(&content);
            prop_assert!(parsed.template.is_empty());
            prop_assert!(parsed.system.is_empty());
            prop_assert!(parsed.parameters.is_empty());
        }

        #[test]
        fn quoted_single_line_round_trips(text in "[A-Za-z0-9 .,!?]{1,60}") {
            let text = text.trim().to_string();
            prop_assume!(!text.is_empty());
            let parsed = parse_modelfile(&format!("SYSTEM \"{text}\""));
            prop_assert_eq!(parsed.system, text);
        }
    }
}
