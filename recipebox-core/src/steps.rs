//! Step list editing.
//!
//! Each [`StepEdit`] turns into a single [`RecipePatch`] that carries
//! `steps` and `done` together whenever positions shift, so the two lists
//! stay aligned for anyone observing the collection.

use crate::models::{Recipe, RecipePatch};

/// One edit to a recipe's step list. Indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEdit {
    /// Append a step (not done).
    Add(String),
    /// Replace the text of a step.
    Edit(usize, String),
    /// Remove a step; later steps shift up.
    Remove(usize),
    /// Flip a step's done flag.
    Toggle(usize),
    /// Move a step to a new position.
    Move { from: usize, to: usize },
}

impl StepEdit {
    /// Computes the patch for this edit, or `None` if the edit is a no-op
    /// (blank new step, index out of range).
    pub fn patch_for(&self, recipe: &Recipe) -> Option<RecipePatch> {
        let len = recipe.steps.len();
        let mut steps = recipe.steps.clone();
        let mut done = recipe.done.clone();
        done.resize(len, false);

        match self {
            StepEdit::Add(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                steps.push(text.to_string());
                done.push(false);
                Some(steps_and_done(steps, done))
            }
            StepEdit::Edit(index, text) => {
                *steps.get_mut(*index)? = text.clone();
                Some(RecipePatch {
                    steps: Some(steps),
                    ..Default::default()
                })
            }
            StepEdit::Remove(index) => {
                if *index >= len {
                    return None;
                }
                steps.remove(*index);
                done.remove(*index);
                Some(steps_and_done(steps, done))
            }
            StepEdit::Toggle(index) => {
                let flag = done.get_mut(*index)?;
                *flag = !*flag;
                Some(RecipePatch {
                    done: Some(done),
                    ..Default::default()
                })
            }
            StepEdit::Move { from, to } => {
                if *from >= len || *to >= len {
                    return None;
                }
                let step = steps.remove(*from);
                steps.insert(*to, step);
                let flag = done.remove(*from);
                done.insert(*to, flag);
                Some(steps_and_done(steps, done))
            }
        }
    }
}

fn steps_and_done(steps: Vec<String>, done: Vec<bool>) -> RecipePatch {
    RecipePatch {
        steps: Some(steps),
        done: Some(done),
        ..Default::default()
    }
}
