//! Prompt descriptors and answer handling

use super::collaborators::Prompter;
use crate::config::{AppConfig, Answer};
use crate::dependencies::{DependencyRegistry, Selection};
use crate::error::ConfigError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Question names with this prefix produce dependency keys for the named slot
pub const DEPENDENCY_PREFIX: &str = "dependency:";

/// Answers in the order they were given
pub type Answers = Vec<(String, Answer)>;

/// One entry of a select question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,

    /// Dependency key or literal value; `null` means "none"
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuestionKind {
    Input {
        #[serde(default)]
        default: Option<String>,
    },
    Confirm {
        #[serde(default)]
        default: bool,
    },
    Select {
        choices: Vec<Choice>,
        /// Index into `choices`
        #[serde(default)]
        default: Option<usize>,
    },
}

/// Declarative question descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Slot name, or `dependency:<slot>`
    pub name: String,

    pub message: String,

    #[serde(flatten)]
    pub kind: QuestionKind,

    /// Only ask when the slot does not already hold a truthy value
    #[serde(default)]
    pub skip_if_set: bool,
}

impl Question {
    /// Slot for dependency-producing questions
    pub fn dependency_slot(&self) -> Option<&str> {
        self.name.strip_prefix(DEPENDENCY_PREFIX)
    }

    /// AppConfig slot this question fills
    pub fn slot(&self) -> &str {
        self.dependency_slot().unwrap_or(&self.name)
    }

    /// Non-null values of a select question
    pub fn choice_values(&self) -> impl Iterator<Item = &str> {
        let choices: &[Choice] = match &self.kind {
            QuestionKind::Select { choices, .. } => choices,
            _ => &[],
        };
        choices.iter().filter_map(|c| c.value.as_deref())
    }

    /// Answer used when running non-interactively
    pub fn default_answer(&self) -> Answer {
        match &self.kind {
            QuestionKind::Input { default } => Answer::Text(default.clone().unwrap_or_default()),
            QuestionKind::Confirm { default } => Answer::Flag(*default),
            QuestionKind::Select { choices, default } => choices
                .get(default.unwrap_or(0))
                .map(|c| Answer::from_choice(c.value.as_deref()))
                .unwrap_or(Answer::None),
        }
    }
}

/// Questions still worth asking given the current config
pub fn pending_questions(questions: &[Question], config: &AppConfig) -> Vec<Question> {
    questions
        .iter()
        .filter(|q| !(q.skip_if_set && config.is_set(q.slot())))
        .cloned()
        .collect()
}

/// Feed answers into the config, routing `dependency:` answers through
/// [`Selection::accept`]. Stops at the first unknown dependency key.
pub fn apply_answers(
    answers: &Answers,
    registry: &DependencyRegistry,
    config: &mut AppConfig,
    selection: &mut Selection,
) -> Result<(), ConfigError> {
    for (name, answer) in answers {
        let Some(slot) = name.strip_prefix(DEPENDENCY_PREFIX) else {
            config.set(name.as_str(), answer.clone());
            continue;
        };

        match answer {
            Answer::Text(key) => {
                selection.accept(registry, config, slot, Some(key.as_str()))?;
            }
            Answer::None => {
                selection.accept(registry, config, slot, None)?;
            }
            Answer::Flag(false) => config.set(slot, Answer::Flag(false)),
            Answer::Flag(true) => {
                return Err(ConfigError::UnknownDependency {
                    slot: slot.to_string(),
                    key: "true".to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Answers every question with its default (`--yes` mode)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnswers;

#[async_trait]
impl Prompter for DefaultAnswers {
    async fn ask(&self, questions: &[Question]) -> anyhow::Result<Answers> {
        Ok(questions
            .iter()
            .map(|q| (q.name.clone(), q.default_answer()))
            .collect())
    }
}
