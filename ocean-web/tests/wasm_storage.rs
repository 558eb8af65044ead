#![cfg(target_arch = "wasm32")]

use ocean_game::{
    GameDataStore, GameId, GameMetric, GameSummary, KeyValueStore, REGISTRY_KEY, summary_key,
};
use ocean_web::{BrowserClock, LocalStore, dom};
use ocean_game::Clock;
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn reset() {
    dom::local_storage().expect("localStorage").clear().expect("clear");
}

fn memory_summary(max: u32) -> GameSummary {
    GameSummary {
        game_id: GameId::MemoryCove,
        rounds: Vec::new(),
        total_time_seconds: 12.5,
        metric: GameMetric::MaxSequence {
            max_sequence_reached: max,
        },
        completed: false,
        hints_used: 0,
    }
}

#[wasm_bindgen_test]
fn local_store_roundtrips_values() {
    reset();
    let store = LocalStore;
    store.set("ocean.test", "value").unwrap();
    assert_eq!(store.get("ocean.test").unwrap().as_deref(), Some("value"));
    assert!(store.keys().unwrap().contains(&"ocean.test".to_string()));
    store.remove("ocean.test").unwrap();
    assert!(store.get("ocean.test").unwrap().is_none());
}

#[wasm_bindgen_test]
fn summaries_persist_in_local_storage() {
    reset();
    let data = GameDataStore::new(LocalStore);
    data.save(GameId::MemoryCove, &memory_summary(4)).unwrap();

    let raw = LocalStore.get(&summary_key(GameId::MemoryCove)).unwrap();
    assert!(raw.is_some());
    assert_eq!(
        LocalStore.get(REGISTRY_KEY).unwrap().as_deref(),
        Some("[\"memory-cove\"]")
    );
    assert_eq!(data.load(GameId::MemoryCove), Some(memory_summary(4)));

    data.clear_all().unwrap();
    assert!(data.load_all().is_empty());
}

#[wasm_bindgen_test]
fn browser_clock_moves_forward() {
    let first = BrowserClock.now_ms();
    assert!(first > 0.0);
    assert!(BrowserClock.now_ms() >= first);
}

#[wasm_bindgen_test]
async fn sleep_resolves() {
    dom::sleep_ms(5).await.unwrap();
}
