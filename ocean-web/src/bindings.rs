//! `wasm_bindgen` surface used by the JavaScript front end.
//!
//! Values cross the boundary as plain JS objects through `serde-wasm-bindgen`;
//! errors surface as rejected calls carrying a message string.
use anyhow::Context;
use ocean_game::{
    GameSession, GameSuite, MemoryCoveSession, RevealStep, SeaItem, SentenceSeaSession,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::clock::{BrowserClock, entropy_seed};
use crate::loader::suite_config;
use crate::reveal::{self, RevealFrame};
use crate::storage::LocalStore;

fn suite() -> anyhow::Result<GameSuite<LocalStore>> {
    let config = suite_config().context("loading embedded suite configuration")?;
    Ok(GameSuite::with_config(config.clone(), LocalStore)?)
}

#[allow(clippy::needless_pass_by_value)]
fn js_err(err: anyhow::Error) -> JsValue {
    JsError::new(&format!("{err:#}")).into()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(Into::into)
}

fn session_seed(seed: Option<u32>) -> u64 {
    seed.map_or_else(entropy_seed, u64::from)
}

#[wasm_bindgen]
pub struct MemoryCoveHandle {
    session: MemoryCoveSession<BrowserClock>,
}

#[wasm_bindgen]
impl MemoryCoveHandle {
    /// # Errors
    /// Rejects if the embedded configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<MemoryCoveHandle, JsValue> {
        let suite = suite().map_err(js_err)?;
        Ok(Self {
            session: suite.memory_cove(session_seed(seed), BrowserClock),
        })
    }

    /// Start (or restart) at level 1 and return the first sequence.
    ///
    /// # Errors
    /// Rejects if no sequence can be drawn.
    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        let sequence = self
            .session
            .start_session()
            .map_err(|err| js_err(err.into()))?
            .clone();
        to_js(&sequence)
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.session.level()
    }

    #[wasm_bindgen(js_name = maxLevel)]
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.session.max_level()
    }

    #[wasm_bindgen(js_name = maxSequenceReached)]
    #[must_use]
    pub fn max_sequence_reached(&self) -> u32 {
        self.session.max_sequence_reached()
    }

    #[must_use]
    pub fn phase(&self) -> String {
        self.session.phase().to_string()
    }

    #[wasm_bindgen(js_name = feedbackMs)]
    #[must_use]
    pub fn feedback_ms(&self) -> u32 {
        self.session.config().timing.feedback_ms
    }

    /// # Errors
    /// Rejects if the schedule cannot be converted.
    #[wasm_bindgen(js_name = revealSchedule)]
    pub fn reveal_schedule(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.reveal_schedule())
    }

    /// # Errors
    /// Rejects if the marks cannot be converted.
    #[wasm_bindgen(js_name = progressMarks)]
    pub fn progress_marks(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.progress_marks())
    }

    /// Add one creature (by slug) to the answer.
    ///
    /// # Errors
    /// Rejects for an unknown creature or outside the player's turn.
    #[wasm_bindgen(js_name = selectItem)]
    pub fn select_item(&mut self, item: JsValue) -> Result<JsValue, JsValue> {
        let item: SeaItem = serde_wasm_bindgen::from_value(item)?;
        let pick = self
            .session
            .select_item(item)
            .map_err(|err| js_err(err.into()))?;
        to_js(&pick)
    }

    /// Submit a whole answer at once.
    ///
    /// # Errors
    /// Rejects for malformed input or outside the player's turn.
    pub fn submit(&mut self, items: JsValue) -> Result<bool, JsValue> {
        let items: Vec<SeaItem> = serde_wasm_bindgen::from_value(items)?;
        self.session
            .submit_response(items)
            .map_err(|err| js_err(err.into()))
    }

    /// # Errors
    /// Rejects unless an answer was just evaluated.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        self.session
            .advance()
            .map(|phase| phase.to_string())
            .map_err(|err| js_err(err.into()))
    }

    /// Summary once complete, otherwise `null`.
    ///
    /// # Errors
    /// Rejects if the summary cannot be converted.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.summary())
    }

    /// Persist the summary; resolves `false` if the session is still running.
    ///
    /// # Errors
    /// Rejects if storage is unavailable or refuses the write.
    pub fn save(&self) -> Result<bool, JsValue> {
        let saved = suite()
            .and_then(|suite| Ok(suite.finish(&self.session)?))
            .map_err(js_err)?;
        Ok(saved.is_some())
    }
}

#[wasm_bindgen]
pub struct SentenceSeaHandle {
    session: SentenceSeaSession<BrowserClock>,
}

#[wasm_bindgen]
impl SentenceSeaHandle {
    /// # Errors
    /// Rejects if the embedded configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>) -> Result<SentenceSeaHandle, JsValue> {
        let suite = suite().map_err(js_err)?;
        Ok(Self {
            session: suite.sentence_sea(session_seed(seed), BrowserClock),
        })
    }

    /// Start (or restart) at round 1 and return the first challenge.
    ///
    /// # Errors
    /// Rejects if the sentence pool is empty.
    pub fn start(&mut self) -> Result<JsValue, JsValue> {
        let challenge = self
            .session
            .start_session()
            .map_err(|err| js_err(err.into()))?
            .clone();
        to_js(&challenge)
    }

    /// Current challenge, or `null` before the session starts.
    ///
    /// # Errors
    /// Rejects if the challenge cannot be converted.
    pub fn challenge(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.current_challenge())
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.session.round()
    }

    #[wasm_bindgen(js_name = totalRounds)]
    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.session.total_rounds()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score()
    }

    #[must_use]
    pub fn phase(&self) -> String {
        self.session.phase().to_string()
    }

    #[wasm_bindgen(js_name = feedbackMs)]
    #[must_use]
    pub fn feedback_ms(&self) -> u32 {
        self.session.config().feedback_ms
    }

    /// # Errors
    /// Rejects outside a round.
    #[wasm_bindgen(js_name = showHint)]
    pub fn show_hint(&mut self) -> Result<Option<String>, JsValue> {
        self.session
            .show_hint()
            .map(|hint| hint.map(str::to_string))
            .map_err(|err| js_err(err.into()))
    }

    #[must_use]
    pub fn hint(&self) -> Option<String> {
        self.session.hint().map(str::to_string)
    }

    /// # Errors
    /// Rejects for an unknown tile or outside a round.
    #[wasm_bindgen(js_name = selectTile)]
    pub fn select_tile(&mut self, index: usize) -> Result<(), JsValue> {
        self.session
            .select_tile(index)
            .map_err(|err| js_err(err.into()))
    }

    /// # Errors
    /// Rejects for an unknown tile or outside a round.
    #[wasm_bindgen(js_name = deselectTile)]
    pub fn deselect_tile(&mut self, index: usize) -> Result<(), JsValue> {
        self.session
            .deselect_tile(index)
            .map_err(|err| js_err(err.into()))
    }

    /// # Errors
    /// Rejects if the words cannot be converted.
    #[wasm_bindgen(js_name = selectedWords)]
    pub fn selected_words(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.selected_words())
    }

    /// `[index, word]` pairs still available.
    ///
    /// # Errors
    /// Rejects if the tiles cannot be converted.
    #[wasm_bindgen(js_name = availableTiles)]
    pub fn available_tiles(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.available_tiles())
    }

    /// # Errors
    /// Rejects outside a round.
    #[wasm_bindgen(js_name = checkSentence)]
    pub fn check_sentence(&mut self) -> Result<bool, JsValue> {
        self.session
            .check_sentence()
            .map_err(|err| js_err(err.into()))
    }

    /// # Errors
    /// Rejects unless a sentence was just checked.
    pub fn advance(&mut self) -> Result<String, JsValue> {
        self.session
            .advance()
            .map(|phase| phase.to_string())
            .map_err(|err| js_err(err.into()))
    }

    /// Summary once complete, otherwise `null`.
    ///
    /// # Errors
    /// Rejects if the summary cannot be converted.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.summary())
    }

    /// Persist the summary; resolves `false` if the session is still running.
    ///
    /// # Errors
    /// Rejects if storage is unavailable or refuses the write.
    pub fn save(&self) -> Result<bool, JsValue> {
        let saved = suite()
            .and_then(|suite| Ok(suite.finish(&self.session)?))
            .map_err(js_err)?;
        Ok(saved.is_some())
    }
}

/// Play a reveal schedule, calling `on_frame` with a creature slug to
/// highlight or `null` to clear.
///
/// # Errors
/// Rejects for a malformed schedule or if a timer cannot be scheduled.
#[wasm_bindgen(js_name = playReveal)]
#[allow(clippy::future_not_send)]
pub async fn play_reveal(schedule: JsValue, on_frame: js_sys::Function) -> Result<(), JsValue> {
    let schedule: Vec<RevealStep> = serde_wasm_bindgen::from_value(schedule)?;
    reveal::play(&schedule, |frame| {
        let arg = match frame {
            RevealFrame::Highlight(item) => JsValue::from_str(item.slug()),
            RevealFrame::Clear => JsValue::NULL,
        };
        if let Err(err) = on_frame.call1(&JsValue::NULL, &arg) {
            log::warn!("reveal callback failed: {}", crate::dom::js_error_message(&err));
        }
    })
    .await
}

/// Aggregated report over every stored summary.
///
/// # Errors
/// Rejects if the configuration is invalid or the report cannot be converted.
#[wasm_bindgen(js_name = resultsReport)]
pub fn results_report() -> Result<JsValue, JsValue> {
    let report = suite().map_err(js_err)?.results_report();
    to_js(&report)
}

/// Erase every stored summary ("play again").
///
/// # Errors
/// Rejects if storage is unavailable.
#[wasm_bindgen(js_name = clearResults)]
pub fn clear_results() -> Result<(), JsValue> {
    suite()
        .and_then(|suite| Ok(suite.clear_results()?))
        .map_err(js_err)
}
