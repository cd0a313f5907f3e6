use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Slot holding the application name
pub const APP_NAME_SLOT: &str = "appName";

/// Value stored in an AppConfig slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Text(String),
    /// Declined or never answered
    None,
}

impl Answer {
    /// Build an answer from an optional choice (`None` means declined)
    pub fn from_choice(value: Option<&str>) -> Self {
        match value {
            Some(v) => Answer::Text(v.to_string()),
            None => Answer::None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Answer::Flag(b) => *b,
            Answer::Text(s) => !s.is_empty(),
            Answer::None => false,
        }
    }

    /// The non-empty text value, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// The evolving configuration for one scaffolding run
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    slots: BTreeMap<String, Answer>,
    project_root: Option<PathBuf>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a config with the application name pre-filled (e.g. from the CLI)
    pub fn with_app_name(app_name: Option<&str>) -> Self {
        let mut config = Self::new();
        if let Some(name) = app_name {
            config.set(APP_NAME_SLOT, Answer::Text(name.to_string()));
        }
        config
    }

    pub fn set(&mut self, slot: impl Into<String>, value: Answer) {
        self.slots.insert(slot.into(), value);
    }

    pub fn get(&self, slot: &str) -> Option<&Answer> {
        self.slots.get(slot)
    }

    /// True when the slot holds a truthy value
    pub fn is_set(&self, slot: &str) -> bool {
        self.get(slot).is_some_and(Answer::is_truthy)
    }

    /// Text value of a slot, ignoring flags and empty strings
    pub fn text(&self, slot: &str) -> Option<&str> {
        self.get(slot).and_then(Answer::as_text)
    }

    pub fn app_name(&self) -> Option<&str> {
        self.text(APP_NAME_SLOT)
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn set_project_root(&mut self, root: PathBuf) {
        self.project_root = Some(root);
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build the template context: every slot by name, plus `appRoot` once known
    pub fn render_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (slot, value) in &self.slots {
            context.insert(slot.as_str(), value);
        }
        if let Some(root) = &self.project_root {
            context.insert("appRoot", &root.display().to_string());
        }
        context
    }
}
