//! Save/load for the durable subset of the economy state.
//!
//! The blob is versionless JSON under one key per player identity. Field
//! tolerance does the compatibility work: missing fields default, unknown
//! fields are ignored, and saved units are merged into the static catalog
//! by id, so the catalog can grow over time without invalidating old
//! saves. Active boost timers are ephemeral and deliberately not saved.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::EconomyState;
use crate::storage::KeyValueStore;

/// Prefix for per-identity storage keys.
const STORAGE_KEY_PREFIX: &str = "money_machine_state_";

/// Storage key for a player identity. Identities are case-normalized so a
/// wallet address checksummed differently still maps to the same slot.
pub fn storage_key(identity: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, identity.to_lowercase())
}

fn one() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize)]
struct SavedUnit {
    id: String,
    count: u32,
    cost: f64,
}

/// Serialized shape of a save. Only the mutable fields; catalog
/// definitions are never persisted.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct SavedState {
    coins: f64,
    units: Vec<SavedUnit>,
    click_power_base: f64,
    auto_rate_base: f64,
    premium_purchased: Vec<String>,
    premium_click_multiplier: f64,
    premium_auto_multiplier: f64,
    crit_chance: f64,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            coins: 0.0,
            units: Vec::new(),
            click_power_base: one(),
            auto_rate_base: 0.0,
            premium_purchased: Vec::new(),
            premium_click_multiplier: one(),
            premium_auto_multiplier: one(),
            crit_chance: 0.0,
        }
    }
}

fn extract(state: &EconomyState) -> SavedState {
    SavedState {
        coins: state.coins,
        units: state
            .units
            .iter()
            .map(|u| SavedUnit {
                id: u.id.clone(),
                count: u.count,
                cost: u.cost,
            })
            .collect(),
        click_power_base: state.click_power_base,
        auto_rate_base: state.auto_rate_base,
        premium_purchased: state.premium_purchased.clone(),
        premium_click_multiplier: state.premium_click_multiplier,
        premium_auto_multiplier: state.premium_auto_multiplier,
        crit_chance: state.crit_chance,
    }
}

/// Merge a save into a freshly-built state. Saved units are matched to the
/// catalog by id; saved ids the catalog no longer knows are dropped, and
/// catalog entries the save predates keep their defaults.
fn apply(state: &mut EconomyState, saved: SavedState) {
    state.coins = saved.coins;
    state.click_power_base = saved.click_power_base;
    state.auto_rate_base = saved.auto_rate_base;
    state.premium_purchased = saved.premium_purchased;
    state.premium_click_multiplier = saved.premium_click_multiplier;
    state.premium_auto_multiplier = saved.premium_auto_multiplier;
    state.crit_chance = saved.crit_chance;

    for su in saved.units {
        if let Some(unit) = state.units.iter_mut().find(|u| u.id == su.id) {
            unit.count = su.count;
            unit.cost = su.cost;
        }
    }
}

/// Serialize the durable subset. Returns None (after a warning) if the
/// state cannot be serialized, which would indicate a bug rather than bad
/// player data.
pub fn to_json(state: &EconomyState) -> Option<String> {
    match serde_json::to_string(&extract(state)) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("failed to serialize save: {e}");
            None
        }
    }
}

/// Write an already-serialized save for the given identity. Storage
/// failures are logged and swallowed; gameplay state is never affected.
pub fn write(store: &dyn KeyValueStore, identity: &str, json: &str) {
    if let Err(e) = store.set(&storage_key(identity), json) {
        warn!("failed to write save for {identity}: {e}");
    }
}

/// Serialize and write in one step.
pub fn save(state: &EconomyState, store: &dyn KeyValueStore, identity: &str) {
    if let Some(json) = to_json(state) {
        write(store, identity, json.as_str());
    }
}

/// Load the save for the given identity into `state`, if one exists.
/// Returns true if a save was found and merged. A corrupt blob is
/// discarded with a warning and leaves `state` untouched.
pub fn load(state: &mut EconomyState, store: &dyn KeyValueStore, identity: &str) -> bool {
    let key = storage_key(identity);
    let json = match store.get(&key) {
        Ok(Some(j)) => j,
        Ok(None) => return false,
        Err(e) => {
            warn!("failed to read save for {identity}: {e}");
            return false;
        }
    };

    let saved: SavedState = match serde_json::from_str(&json) {
        Ok(s) => s,
        Err(e) => {
            warn!("discarding corrupt save for {identity}: {e}");
            return false;
        }
    };

    apply(state, saved);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::logic;
    use crate::storage::MemoryStore;
    use anyhow::{anyhow, Result};

    fn fresh() -> EconomyState {
        EconomyState::with_seed(Catalog::default(), 1)
    }

    #[test]
    fn storage_key_lowercases_identity() {
        assert_eq!(
            storage_key("0xAbCd1234"),
            "money_machine_state_0xabcd1234"
        );
        assert_eq!(storage_key("0xABCD1234"), storage_key("0xabcd1234"));
    }

    #[test]
    fn roundtrip_preserves_everything_durable() {
        let mut original = fresh();
        original.coins = 1e12;
        logic::buy_unit(&mut original, "hamster");
        logic::buy_unit(&mut original, "hamster");
        logic::buy_unit(&mut original, "printer");
        logic::grant_premium_bonus(&mut original, "whale_mode");
        logic::grant_premium_bonus(&mut original, "lucky_coin");

        let store = MemoryStore::new();
        save(&original, &store, "0xWallet");

        let mut restored = fresh();
        assert!(load(&mut restored, &store, "0xwallet")); // different case, same slot

        assert!((restored.coins - original.coins).abs() < 0.001);
        assert!((restored.click_power_base - original.click_power_base).abs() < 0.001);
        assert!((restored.auto_rate_base - original.auto_rate_base).abs() < 0.001);
        for (a, b) in original.units.iter().zip(&restored.units) {
            assert_eq!(a.count, b.count);
            assert!((a.cost - b.cost).abs() < 0.001);
        }
        assert_eq!(restored.premium_purchased, original.premium_purchased);
        assert!((restored.premium_click_multiplier - 5.0).abs() < 0.001);
        assert!((restored.crit_chance - 0.1).abs() < 0.001);
    }

    #[test]
    fn no_save_returns_false() {
        let store = MemoryStore::new();
        let mut state = fresh();
        assert!(!load(&mut state, &store, "0xnobody"));
        assert!((state.coins - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(&storage_key("0xp"), "{not json at all").unwrap();
        let mut state = fresh();
        assert!(!load(&mut state, &store, "0xp"));
        assert!((state.coins - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_default_individually() {
        let store = MemoryStore::new();
        // Hand-crafted partial save: only coins and one unit.
        store
            .set(
                &storage_key("0xp"),
                r#"{"coins": 42.0, "units": [{"id": "hamster", "count": 3, "cost": 36.0}]}"#,
            )
            .unwrap();
        let mut state = fresh();
        assert!(load(&mut state, &store, "0xp"));
        assert!((state.coins - 42.0).abs() < 0.001);
        assert_eq!(state.unit("hamster").unwrap().count, 3);
        assert!((state.unit("hamster").unwrap().cost - 36.0).abs() < 0.001);
        // Everything absent keeps its initial value.
        assert!((state.click_power_base - 1.0).abs() < 0.001);
        assert!((state.premium_click_multiplier - 1.0).abs() < 0.001);
        assert!((state.premium_auto_multiplier - 1.0).abs() < 0.001);
        assert_eq!(state.unit("intern").unwrap().count, 0);
    }

    #[test]
    fn unknown_fields_and_unit_ids_ignored() {
        let store = MemoryStore::new();
        store
            .set(
                &storage_key("0xp"),
                r#"{
                    "coins": 7.0,
                    "units": [{"id": "retired_unit", "count": 9, "cost": 1.0}],
                    "future_field": {"nested": true}
                }"#,
            )
            .unwrap();
        let mut state = fresh();
        assert!(load(&mut state, &store, "0xp"));
        assert!((state.coins - 7.0).abs() < 0.001);
        assert!(state.units.iter().all(|u| u.count == 0));
    }

    #[test]
    fn catalog_growth_keeps_defaults_for_new_units() {
        // Save against today's catalog, load into a larger one.
        let mut original = fresh();
        original.coins = 1_000.0;
        logic::buy_unit(&mut original, "hamster");
        let store = MemoryStore::new();
        save(&original, &store, "0xp");

        let mut grown = Catalog::default();
        grown.units.push(crate::catalog::UnitDef {
            id: "quantum".into(),
            name: "Quantum Miner".into(),
            desc: "Superposition of rich and poor".into(),
            base_cost: 5e7,
            auto: 50_000.0,
            power: 25_000.0,
        });
        let mut restored = EconomyState::with_seed(grown, 1);
        assert!(load(&mut restored, &store, "0xp"));
        assert_eq!(restored.unit("hamster").unwrap().count, 1);
        let quantum = restored.unit("quantum").unwrap();
        assert_eq!(quantum.count, 0);
        assert!((quantum.cost - 5e7).abs() < 0.001);
    }

    #[test]
    fn active_effects_are_not_persisted() {
        let mut original = fresh();
        original.coins = 100.0;
        logic::buy_boost(&mut original, "coffee");
        let store = MemoryStore::new();
        save(&original, &store, "0xp");

        let mut restored = fresh();
        assert!(load(&mut restored, &store, "0xp"));
        assert!(restored.active_effects.is_empty());
    }

    /// A store where every operation fails, to prove failures stay local.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn broken_store_never_panics_or_mutates() {
        let mut state = fresh();
        state.coins = 55.0;
        save(&state, &BrokenStore, "0xp");
        assert!(!load(&mut state, &BrokenStore, "0xp"));
        assert!((state.coins - 55.0).abs() < 0.001);
    }
}
