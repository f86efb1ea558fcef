use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::id::IdKind;
use super::patch::RecipePatch;

/// A recipe: a titled, ordered list of steps with per-step completion.
///
/// `done` is positionally aligned with `steps`. Every constructor and
/// mutator in this module keeps `done.len() == steps.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub done: Vec<bool>,
    /// Cover image reference, usually a data URI. Serialized as `null`
    /// when absent.
    #[serde(default)]
    pub image: Option<String>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            steps: Vec::new(),
            done: Vec::new(),
            image: None,
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self.normalized()
    }

    pub fn with_done(mut self, done: Vec<bool>) -> Self {
        self.done = done;
        self.normalized()
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn id_kind(&self) -> IdKind {
        IdKind::of(&self.id)
    }

    pub fn is_local(&self) -> bool {
        self.id_kind() == IdKind::Local
    }

    /// Number of steps marked done.
    pub fn completed(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }

    /// Repairs `done` so it lines up with `steps`: missing entries are
    /// `false`, surplus entries are dropped.
    pub fn normalized(mut self) -> Self {
        self.done.resize(self.steps.len(), false);
        self
    }

    /// Builds a recipe from loosely-typed JSON, as read from the cache or
    /// received from the remote store.
    ///
    /// Returns `None` when `id` or `title` is not a string. Every other
    /// field is coerced: non-array `steps` becomes empty, non-string steps
    /// are dropped, `done` entries that are not booleans become `false`,
    /// and a missing or non-string `image` is absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id")?.as_str()?.to_string();
        let title = obj.get("title")?.as_str()?.to_string();

        let steps: Vec<String> = obj
            .get("steps")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|s| s.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let done: Vec<bool> = obj
            .get("done")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|d| d.as_bool().unwrap_or(false)).collect())
            .unwrap_or_default();

        let image = obj.get("image").and_then(Value::as_str).map(str::to_string);

        Some(
            Self {
                id,
                title,
                steps,
                done,
                image,
            }
            .normalized(),
        )
    }

    /// Normalizes every element of a JSON array, skipping records that
    /// cannot be repaired. Anything other than an array yields `None`.
    pub fn list_from_value(value: &Value) -> Option<Vec<Self>> {
        let items = value.as_array()?;
        Some(items.iter().filter_map(Self::from_value).collect())
    }

    /// Applies the fields present in `patch`, then re-normalizes.
    pub fn apply(&mut self, patch: &RecipePatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(steps) = &patch.steps {
            self.steps = steps.clone();
        }
        if let Some(done) = &patch.done {
            self.done = done.clone();
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
        self.done.resize(self.steps.len(), false);
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        if self.is_local() {
            writeln!(f, "Status: local only (not yet on the server)")?;
        }
        if self.image.is_some() {
            writeln!(f, "Cover image: yes")?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps yet.")?;
        } else {
            writeln!(
                f,
                "\nSteps ({}/{} done):",
                self.completed(),
                self.steps.len()
            )?;
            for (i, (step, done)) in self.steps.iter().zip(&self.done).enumerate() {
                let mark = if *done { "x" } else { " " };
                writeln!(f, "  {:>2}. [{}] {}", i + 1, mark, step)?;
            }
        }

        Ok(())
    }
}
