use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use swipedeck_ui::{CardRecord, SwipeStackConfig};

/// `{ "config": {...}, "cards": [...] }`; `config` may be omitted.
#[derive(Debug, Deserialize)]
pub struct DeckFile {
    #[serde(default)]
    pub config: SwipeStackConfig,
    pub cards: Vec<CardRecord>,
}

impl DeckFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read deck file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid deck file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn builtin() -> Self {
        Self {
            config: SwipeStackConfig::default(),
            cards: builtin_cards(),
        }
    }
}

fn builtin_cards() -> Vec<CardRecord> {
    vec![
        CardRecord::new(
            1,
            "https://www.pngmart.com/files/3/Husky-PNG-Photos.png",
            "Husky Siberiano",
        ),
        CardRecord::new(
            2,
            "https://static.vecteezy.com/system/resources/previews/024/589/174/original/golden-retriever-with-ai-generated-free-png.png",
            "Golden Retriever",
        ),
        CardRecord::new(
            3,
            "https://assets.stickpng.com/images/580b57fbd9996e24bc43bbd8.png",
            "Pastor Alemán",
        ),
        CardRecord::new(
            4,
            "https://www.pngplay.com/wp-content/uploads/12/Husky-PNG-HD-Photos.png",
            "Alaskan Husky",
        ),
    ]
}
