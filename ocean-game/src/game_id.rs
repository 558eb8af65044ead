//! Catalogue of the mini-games in the suite.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for each mini-game.
///
/// Serialized as the kebab-case string used for storage keys
/// (`"memory-cove"`, `"sentence-sea"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    /// Letter recognition
    BubbleBay,
    /// Word recognition
    WordReef,
    /// Working memory (sequence recall)
    MemoryCove,
    /// Spelling
    SpellShore,
    /// Sentence structure (word ordering)
    SentenceSea,
}

impl GameId {
    /// Every game, in the order the results page lists them.
    pub const ALL: [Self; 5] = [
        Self::BubbleBay,
        Self::WordReef,
        Self::MemoryCove,
        Self::SpellShore,
        Self::SentenceSea,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BubbleBay => "bubble-bay",
            Self::WordReef => "word-reef",
            Self::MemoryCove => "memory-cove",
            Self::SpellShore => "spell-shore",
            Self::SentenceSea => "sentence-sea",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BubbleBay => "Bubble Bay",
            Self::WordReef => "Word Reef",
            Self::MemoryCove => "Memory Cove",
            Self::SpellShore => "Spell Shore",
            Self::SentenceSea => "Sentence Sea",
        }
    }

    /// Skill the game exercises, shown next to the title on the results page.
    #[must_use]
    pub const fn skill(self) -> &'static str {
        match self {
            Self::BubbleBay => "Letter Recognition",
            Self::WordReef => "Word Recognition",
            Self::MemoryCove => "Working Memory",
            Self::SpellShore => "Spelling",
            Self::SentenceSea => "Sentence Structure",
        }
    }

    /// Highest raw score a summary for this game can carry.
    ///
    /// Memory Cove counts the longest recalled sequence (six levels, so at
    /// most seven items); Sentence Sea counts correct rounds out of five.
    #[must_use]
    pub const fn default_max_score(self) -> u32 {
        match self {
            Self::BubbleBay | Self::WordReef | Self::SpellShore => 10,
            Self::MemoryCove => 7,
            Self::SentenceSea => 5,
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game id '{0}'")]
pub struct GameIdError(pub String);

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GameIdError(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_from_their_storage_names() {
        for id in GameId::ALL {
            assert_eq!(id.as_str().parse::<GameId>().unwrap(), id);
        }
        assert_eq!(" Memory-Cove ".parse::<GameId>().unwrap(), GameId::MemoryCove);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = "kelp-forest".parse::<GameId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown game id 'kelp-forest'");
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&GameId::SentenceSea).unwrap();
        assert_eq!(json, "\"sentence-sea\"");
        let back: GameId = serde_json::from_str("\"bubble-bay\"").unwrap();
        assert_eq!(back, GameId::BubbleBay);
    }
}
