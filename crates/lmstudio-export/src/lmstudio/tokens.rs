//! Heuristic BOS/EOS detection from a prompt template.

/// Known beginning-of-sequence tokens; the first one the template starts with wins.
pub const BOS_TOKENS: [&str; 4] = ["[gMASK]", "<s>", "<|begin_of_text|>", "<|im_start|>"];

/// Known end-of-sequence tokens; the first one the template contains wins.
///
/// `<|user|>` is a role marker, not an end token, but is matched like the rest.
pub const EOS_TOKENS: [&str; 5] = [
    "<|endoftext|>",
    "</s>",
    "<|end_of_text|>",
    "<|im_end|>",
    "<|user|>",
];

pub fn bos_token(template: &str) -> &'static str {
    BOS_TOKENS
        .iter()
        .find(|t| template.starts_with(**t))
        .copied()
        .unwrap_or("")
}

pub fn eos_token(template: &str) -> &'static str {
    EOS_TOKENS
        .iter()
        .find(|t| template.contains(**t))
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bos_requires_prefix() {
        assert_eq!(bos_token("[gMASK]<sop><|user|>"), "[gMASK]");
        assert_eq!(bos_token("<|im_start|>system"), "<|im_start|>");
        assert_eq!(bos_token(" <s>"), "");
        assert_eq!(bos_token("{{ .Prompt }}"), "");
    }

    #[test]
    fn eos_uses_list_order_not_position() {
        // `</s>` precedes `<|user|>` in the list even though it appears later.
        assert_eq!(eos_token("<|user|>{{ .Prompt }}</s>"), "</s>");
        assert_eq!(eos_token("<|im_start|>user<|im_end|>"), "<|im_end|>");
        assert_eq!(eos_token("[gMASK]<sop><|user|>"), "<|user|>");
        assert_eq!(eos_token("plain"), "");
    }
}
