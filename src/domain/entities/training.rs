use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::{Message, MessageRole};

/// A curated question/answer pair from the training data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// One line of the chat fine-tuning format: a user turn followed by the
/// assistant turn that should be learned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub messages: Vec<Message>,
}

impl From<&QaPair> for TrainingExample {
    fn from(pair: &QaPair) -> Self {
        Self {
            messages: vec![
                Message::user(&pair.question),
                Message::assistant(&pair.answer),
            ],
        }
    }
}

impl TryFrom<TrainingExample> for QaPair {
    type Error = DomainError;

    fn try_from(example: TrainingExample) -> Result<Self, Self::Error> {
        let mut question = None;
        let mut answer = None;
        for message in example.messages {
            match message.role {
                MessageRole::User if question.is_none() => question = Some(message.content),
                MessageRole::Assistant if answer.is_none() => answer = Some(message.content),
                _ => {}
            }
        }

        match (question, answer) {
            (Some(question), Some(answer)) => Ok(Self { question, answer }),
            _ => Err(DomainError::validation(
                "training example needs a user and an assistant message",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineTuneStatus {
    ValidatingFiles,
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FineTuneStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FineTuneJob {
    pub id: String,
    pub status: FineTuneStatus,
    pub model: String,
    pub fine_tuned_model: Option<String>,
    pub training_file: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}
