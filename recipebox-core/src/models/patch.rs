use serde::{Deserialize, Deserializer, Serialize};

/// A field-level update to a recipe.
///
/// Only the fields that are `Some` are applied and sent to the remote
/// store. `image` is doubly optional: `None` leaves the image untouched,
/// `Some(None)` clears it (`null` on the wire) and `Some(Some(uri))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<Vec<bool>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub image: Option<Option<String>>,
}

impl RecipePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn image(image: Option<String>) -> Self {
        Self {
            image: Some(image),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.steps.is_none() && self.done.is_none() && self.image.is_none()
    }
}

// A key that is present maps to `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
