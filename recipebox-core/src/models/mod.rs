mod id;
mod patch;
mod recipe;

pub use id::{mint_local_id, IdKind, LOCAL_ID_PREFIX};
pub use patch::RecipePatch;
pub use recipe::Recipe;
