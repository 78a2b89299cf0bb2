use serde::{Deserialize, Serialize};

/// Signed so decks may use any integer id.
pub type CardId = i64;

/// One entry of the deck. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    id: CardId,
    /// URI of the card picture. Loading it is up to the host.
    #[serde(alias = "img")]
    image_ref: String,
    #[serde(alias = "desc")]
    caption: String,
}

impl CardRecord {
    pub fn new(id: CardId, image_ref: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            id,
            image_ref: image_ref.into(),
            caption: caption.into(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }
}
