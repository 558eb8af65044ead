//! Results page aggregation: percentages, bands and recommendations.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ConfigError;
use crate::game_id::GameId;
use crate::persistence::GameDataStore;
use crate::storage::KeyValueStore;
use crate::summary::GameSummary;

/// Qualitative label for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    NeedsPractice,
    Developing,
    Good,
    Excellent,
}

impl Band {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsPractice => "Needs Practice",
            Self::Developing => "Developing",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    const fn tier(self) -> Tier {
        match self {
            Self::NeedsPractice => Tier::Low,
            Self::Developing => Tier::Medium,
            Self::Good | Self::Excellent => Tier::High,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Low,
    Medium,
    High,
}

/// Lower bounds (inclusive) of each band above Needs Practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    pub excellent: u32,
    pub good: u32,
    pub developing: u32,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            excellent: 90,
            good: 75,
            developing: 60,
        }
    }
}

impl BandThresholds {
    #[must_use]
    pub const fn band_for(&self, percentage: u32) -> Band {
        if percentage >= self.excellent {
            Band::Excellent
        } else if percentage >= self.good {
            Band::Good
        } else if percentage >= self.developing {
            Band::Developing
        } else {
            Band::NeedsPractice
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::BandOrder`] unless the cut points strictly
    /// decrease and the top one is at most 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.excellent > self.good && self.good > self.developing;
        if !ordered || self.excellent > 100 {
            return Err(ConfigError::BandOrder {
                excellent: self.excellent,
                good: self.good,
                developing: self.developing,
            });
        }
        Ok(())
    }
}

/// Maximum raw score per game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreLimits(pub BTreeMap<GameId, u32>);

impl Default for ScoreLimits {
    fn default() -> Self {
        Self(
            GameId::ALL
                .into_iter()
                .map(|id| (id, id.default_max_score()))
                .collect(),
        )
    }
}

impl ScoreLimits {
    /// Configured maximum, or zero for a game with none.
    #[must_use]
    pub fn max_score(&self, game: GameId) -> u32 {
        self.0.get(&game).copied().unwrap_or(0)
    }
}

/// Canned advice for one game, by performance tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub low: String,
    pub medium: String,
    pub high: String,
}

impl Recommendations {
    fn new(low: &str, medium: &str, high: &str) -> Self {
        Self {
            low: low.to_string(),
            medium: medium.to_string(),
            high: high.to_string(),
        }
    }
}

fn default_recommendations() -> BTreeMap<GameId, Recommendations> {
    BTreeMap::from([
        (
            GameId::BubbleBay,
            Recommendations::new(
                "Practice letter recognition with flashcards or letter games.",
                "Continue practicing similar-looking letters like b/d and p/q.",
                "Great job! Keep reading to reinforce letter recognition.",
            ),
        ),
        (
            GameId::WordReef,
            Recommendations::new(
                "Practice reading simple words aloud and identifying them.",
                "Read short stories and identify sight words.",
                "Challenge yourself with more complex words and reading materials.",
            ),
        ),
        (
            GameId::MemoryCove,
            Recommendations::new(
                "Practice remembering short sequences of items in daily activities.",
                "Play memory games that gradually increase in difficulty.",
                "Challenge your memory with longer sequences and patterns.",
            ),
        ),
        (
            GameId::SpellShore,
            Recommendations::new(
                "Practice spelling common words using letter tiles or writing.",
                "Focus on words with similar spelling patterns.",
                "Challenge yourself with more complex spelling patterns.",
            ),
        ),
        (
            GameId::SentenceSea,
            Recommendations::new(
                "Practice arranging simple sentences with word cards.",
                "Read sentences aloud and identify the correct word order.",
                "Try writing your own sentences and stories.",
            ),
        ),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    pub bands: BandThresholds,
    pub limits: ScoreLimits,
    pub recommendations: BTreeMap<GameId, Recommendations>,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            bands: BandThresholds::default(),
            limits: ScoreLimits::default(),
            recommendations: default_recommendations(),
        }
    }
}

impl ResultsConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] for misordered bands or a game missing its
    /// maximum or recommendation texts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bands.validate()?;
        for game in GameId::ALL {
            if !self.limits.0.contains_key(&game) {
                return Err(ConfigError::MissingMaximum(game));
            }
            if !self.recommendations.contains_key(&game) {
                return Err(ConfigError::MissingRecommendations(game));
            }
        }
        Ok(())
    }

    /// Advice text for `game` at `band`; empty when the table has no entry.
    #[must_use]
    pub fn recommendation(&self, game: GameId, band: Band) -> &str {
        self.recommendations.get(&game).map_or("", |r| match band.tier() {
            Tier::Low => r.low.as_str(),
            Tier::Medium => r.medium.as_str(),
            Tier::High => r.high.as_str(),
        })
    }
}

/// `round(100 * raw / maximum)` rounded half up and clamped to 0..=100.
/// A zero maximum yields zero.
#[must_use]
pub fn percentage(raw: u32, maximum: u32) -> u32 {
    if maximum == 0 {
        return 0;
    }
    let raw = u64::from(raw);
    let maximum = u64::from(maximum);
    let rounded = (200 * raw + maximum) / (2 * maximum);
    u32::try_from(rounded.min(100)).unwrap_or(100)
}

/// One row of the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: GameId,
    pub title: String,
    pub skill: String,
    pub played: bool,
    pub raw_score: u32,
    pub maximum: u32,
    pub percentage: u32,
    pub band: Band,
    pub recommendation: String,
}

/// Derived view over every stored summary. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsReport {
    pub games: Vec<GameResult>,
    /// Sum of raw scores over sum of maximums, counting played games only.
    pub overall_percentage: u32,
    pub overall_band: Band,
}

impl ResultsReport {
    /// Aggregate `summaries`; games without one are listed as unplayed at zero
    /// percent and left out of the overall score.
    #[must_use]
    pub fn build(summaries: &BTreeMap<GameId, GameSummary>, config: &ResultsConfig) -> Self {
        let mut total_raw = 0u32;
        let mut total_max = 0u32;
        let games: Vec<GameResult> = GameId::ALL
            .into_iter()
            .map(|game_id| {
                let maximum = config.limits.max_score(game_id);
                let summary = summaries.get(&game_id);
                let raw_score = summary.map_or(0, GameSummary::raw_score);
                if summary.is_some() {
                    total_raw = total_raw.saturating_add(raw_score.min(maximum));
                    total_max = total_max.saturating_add(maximum);
                }
                let pct = percentage(raw_score, maximum);
                let band = config.bands.band_for(pct);
                GameResult {
                    game_id,
                    title: game_id.title().to_string(),
                    skill: game_id.skill().to_string(),
                    played: summary.is_some(),
                    raw_score,
                    maximum,
                    percentage: pct,
                    band,
                    recommendation: config.recommendation(game_id, band).to_string(),
                }
            })
            .collect();
        let overall_percentage = percentage(total_raw, total_max);
        Self {
            games,
            overall_percentage,
            overall_band: config.bands.band_for(overall_percentage),
        }
    }

    /// Load every stored summary and aggregate it.
    #[must_use]
    pub fn from_store<S: KeyValueStore>(store: &GameDataStore<S>, config: &ResultsConfig) -> Self {
        Self::build(&store.load_all(), config)
    }

    #[must_use]
    pub fn game(&self, game_id: GameId) -> Option<&GameResult> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    #[must_use]
    pub fn played_count(&self) -> usize {
        self.games.iter().filter(|g| g.played).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::GameMetric;

    fn summary(game_id: GameId, metric: GameMetric) -> GameSummary {
        GameSummary {
            game_id,
            rounds: Vec::new(),
            total_time_seconds: 30.0,
            metric,
            completed: true,
            hints_used: 0,
        }
    }

    #[test]
    fn percentage_rounds_half_up_and_stays_in_range() {
        assert_eq!(percentage(3, 5), 60);
        assert_eq!(percentage(5, 7), 71);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 10), 0);
        assert_eq!(percentage(10, 10), 100);
        assert_eq!(percentage(12, 10), 100);
        assert_eq!(percentage(4, 0), 0);
        for max in 1..=20 {
            for raw in 0..=max {
                assert!(percentage(raw, max) <= 100);
            }
        }
    }

    #[test]
    fn bands_follow_cut_points() {
        let bands = BandThresholds::default();
        assert_eq!(bands.band_for(100), Band::Excellent);
        assert_eq!(bands.band_for(90), Band::Excellent);
        assert_eq!(bands.band_for(89), Band::Good);
        assert_eq!(bands.band_for(75), Band::Good);
        assert_eq!(bands.band_for(74), Band::Developing);
        assert_eq!(bands.band_for(60), Band::Developing);
        assert_eq!(bands.band_for(59), Band::NeedsPractice);
        assert_eq!(bands.band_for(0), Band::NeedsPractice);
    }

    #[test]
    fn misordered_bands_are_rejected() {
        let bands = BandThresholds {
            excellent: 90,
            good: 60,
            developing: 75,
        };
        assert!(matches!(bands.validate(), Err(ConfigError::BandOrder { .. })));
    }

    #[test]
    fn empty_report_has_zero_overall() {
        let report = ResultsReport::build(&BTreeMap::new(), &ResultsConfig::default());
        assert_eq!(report.overall_percentage, 0);
        assert_eq!(report.overall_band, Band::NeedsPractice);
        assert_eq!(report.played_count(), 0);
        assert_eq!(report.games.len(), 5);
        assert!(report.games.iter().all(|g| g.percentage == 0 && !g.played));
    }

    #[test]
    fn overall_counts_played_games_only() {
        let config = ResultsConfig::default();
        let summaries = BTreeMap::from([
            (
                GameId::SentenceSea,
                summary(GameId::SentenceSea, GameMetric::Score { score: 3 }),
            ),
            (
                GameId::MemoryCove,
                summary(
                    GameId::MemoryCove,
                    GameMetric::MaxSequence {
                        max_sequence_reached: 5,
                    },
                ),
            ),
        ]);
        let report = ResultsReport::build(&summaries, &config);
        // (3 + 5) / (5 + 7)
        assert_eq!(report.overall_percentage, 67);
        assert_eq!(report.overall_band, Band::Developing);

        let sea = report.game(GameId::SentenceSea).unwrap();
        assert_eq!(sea.percentage, 60);
        assert_eq!(sea.band, Band::Developing);
        assert_eq!(
            sea.recommendation,
            "Read sentences aloud and identify the correct word order."
        );
        let bay = report.game(GameId::BubbleBay).unwrap();
        assert!(!bay.played);
        assert_eq!(
            bay.recommendation,
            "Practice letter recognition with flashcards or letter games."
        );
    }

    #[test]
    fn good_and_excellent_share_high_advice() {
        let config = ResultsConfig::default();
        assert_eq!(
            config.recommendation(GameId::MemoryCove, Band::Good),
            config.recommendation(GameId::MemoryCove, Band::Excellent)
        );
        assert_eq!(
            config.recommendation(GameId::WordReef, Band::NeedsPractice),
            "Practice reading simple words aloud and identifying them."
        );
    }
}
