/// A text template with `{name}` placeholders.
///
/// Rendering is a single pass over the template, so substituted values are
/// never re-scanned for placeholders. Unknown placeholders are left as-is.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let replacement = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, close))
            });

            match replacement {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Returns the longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_placeholders() {
        let template = PromptTemplate::new("You are {name}.\n\nContext:\n{context}");
        let rendered = template.render(&[("name", "Sam"), ("context", "Likes rowing.")]);
        assert_eq!(rendered, "You are Sam.\n\nContext:\nLikes rowing.");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let template = PromptTemplate::new("{context} / {name}");
        let rendered = template.render(&[("context", "{name}"), ("name", "Sam")]);
        assert_eq!(rendered, "{name} / Sam");
    }

    #[test]
    fn test_render_keeps_unknown_and_unbalanced_braces() {
        let template = PromptTemplate::new("json: {\"a\": 1} {missing} {");
        assert_eq!(template.render(&[]), "json: {\"a\": 1} {missing} {");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 500), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
