use clap::{Args, Subcommand};
use recipebox_core::StepEdit;

use super::{find_recipe, Store};

#[derive(Args)]
pub struct StepCommand {
    #[command(subcommand)]
    pub command: StepSubcommand,
}

/// Step positions on the command line start at 1.
#[derive(Subcommand)]
pub enum StepSubcommand {
    /// Append a step
    Add {
        /// Recipe ID or title
        recipe: String,

        /// Step text
        text: String,
    },

    /// Replace the text of a step
    Edit {
        /// Recipe ID or title
        recipe: String,

        /// Step number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,

        /// New step text
        text: String,
    },

    /// Remove a step
    Remove {
        /// Recipe ID or title
        recipe: String,

        /// Step number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },

    /// Mark a step done, or not done again
    Toggle {
        /// Recipe ID or title
        recipe: String,

        /// Step number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,
    },

    /// Move a step to another position
    Move {
        /// Recipe ID or title
        recipe: String,

        /// Current step number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,

        /// New step number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        to: u32,
    },
}

impl StepSubcommand {
    fn recipe(&self) -> &str {
        match self {
            StepSubcommand::Add { recipe, .. }
            | StepSubcommand::Edit { recipe, .. }
            | StepSubcommand::Remove { recipe, .. }
            | StepSubcommand::Toggle { recipe, .. }
            | StepSubcommand::Move { recipe, .. } => recipe,
        }
    }

    /// Converts to a zero-based edit.
    fn edit(&self) -> StepEdit {
        match self {
            StepSubcommand::Add { text, .. } => StepEdit::Add(text.clone()),
            StepSubcommand::Edit { number, text, .. } => {
                StepEdit::Edit(position(*number), text.clone())
            }
            StepSubcommand::Remove { number, .. } => StepEdit::Remove(position(*number)),
            StepSubcommand::Toggle { number, .. } => StepEdit::Toggle(position(*number)),
            StepSubcommand::Move { from, to, .. } => StepEdit::Move {
                from: position(*from),
                to: position(*to),
            },
        }
    }
}

fn position(number: u32) -> usize {
    (number as usize).saturating_sub(1)
}

impl StepCommand {
    pub async fn run(&self, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
        let recipe = find_recipe(store, self.command.recipe())?;
        let edit = self.command.edit();

        if !store.edit_steps(&recipe.id, &edit) {
            let message = match edit {
                StepEdit::Add(_) => "Step text cannot be empty".to_string(),
                _ => format!(
                    "No such step in '{}' (it has {} step(s))",
                    recipe.title,
                    recipe.steps.len()
                ),
            };
            return Err(message.into());
        }

        if let Some(updated) = store.get(&recipe.id) {
            print!("{}", updated);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> String {
        "Soup".to_string()
    }

    #[test]
    fn test_numbers_become_zero_based() {
        let cmd = StepSubcommand::Move {
            recipe: recipe(),
            from: 1,
            to: 3,
        };
        assert_eq!(cmd.edit(), StepEdit::Move { from: 0, to: 2 });

        let cmd = StepSubcommand::Toggle {
            recipe: recipe(),
            number: 2,
        };
        assert_eq!(cmd.edit(), StepEdit::Toggle(1));
    }

    #[test]
    fn test_add_keeps_text() {
        let cmd = StepSubcommand::Add {
            recipe: recipe(),
            text: "simmer".into(),
        };
        assert_eq!(cmd.edit(), StepEdit::Add("simmer".into()));
        assert_eq!(cmd.recipe(), "Soup");
    }
}
