use crate::domain::PromptTemplate;
use crate::infrastructure::config::{PersonaConfig, PromptsConfig};

/// Renders the chat system prompt: persona, constraints and style are fixed
/// at construction, retrieved context is spliced in per request.
#[derive(Debug, Clone)]
pub struct PersonaPrompt {
    template: PromptTemplate,
    persona: PersonaConfig,
    constraints: String,
    style: String,
}

impl PersonaPrompt {
    pub fn new(template: impl Into<String>, persona: PersonaConfig) -> Self {
        Self {
            template: PromptTemplate::new(template),
            constraints: bullets(&persona.constraints),
            style: bullets(&persona.style),
            persona,
        }
    }

    pub fn from_config(prompts: &PromptsConfig) -> Self {
        Self::new(prompts.chat.system.clone(), prompts.persona.clone())
    }

    pub fn persona_name(&self) -> &str {
        &self.persona.name
    }

    pub fn render(&self, context: &str) -> String {
        let persona = if self.persona.description.is_empty() {
            self.persona.name.clone()
        } else {
            format!("{}, {}", self.persona.name, self.persona.description)
        };

        self.template.render(&[
            ("persona", persona.as_str()),
            ("name", self.persona.name.as_str()),
            ("constraints", self.constraints.as_str()),
            ("style", self.style.as_str()),
            ("context", context),
        ])
    }
}

fn bullets(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
