//! Timed playback of a memory sequence.
use ocean_game::{RevealStep, SeaItem};
use wasm_bindgen::JsValue;

use crate::dom;

/// What the page should show at one point of the playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealFrame {
    Highlight(SeaItem),
    Clear,
}

/// Frames and the pause before each, in playback order.
#[must_use]
pub fn frames(schedule: &[RevealStep]) -> Vec<(u32, RevealFrame)> {
    schedule
        .iter()
        .flat_map(|step| {
            [
                (step.wait_ms, RevealFrame::Highlight(step.item)),
                (step.highlight_ms, RevealFrame::Clear),
            ]
        })
        .collect()
}

/// Play `schedule`, awaiting each timer before the next frame.
///
/// # Errors
///
/// Returns the JavaScript error if a timer cannot be scheduled.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn play<F>(schedule: &[RevealStep], mut show: F) -> Result<(), JsValue>
where
    F: FnMut(RevealFrame),
{
    for (wait_ms, frame) in frames(schedule) {
        dom::sleep_ms(wait_ms).await?;
        show(frame);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_step_highlights_then_clears() {
        let schedule = [
            RevealStep {
                item: SeaItem::Crab,
                wait_ms: 800,
                highlight_ms: 600,
            },
            RevealStep {
                item: SeaItem::Shell,
                wait_ms: 800,
                highlight_ms: 600,
            },
        ];
        assert_eq!(
            frames(&schedule),
            vec![
                (800, RevealFrame::Highlight(SeaItem::Crab)),
                (600, RevealFrame::Clear),
                (800, RevealFrame::Highlight(SeaItem::Shell)),
                (600, RevealFrame::Clear),
            ]
        );
    }
}
