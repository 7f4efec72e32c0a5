//! Read-only view handed to the presentation layer.

use serde::Serialize;

use crate::catalog::{BoostDef, PremiumBonusDef};
use crate::state::{ActiveEffect, EconomyState, ProductionUnit};

/// Lightweight container for UI sync. Carries the live unit catalog, the
/// static boost and premium catalogs, and everything a render pass needs.
/// The UI never mutates state through this; commands go through the
/// session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EconomySnapshot {
    pub coins: f64,
    /// Click power with temporary and premium multipliers applied.
    pub click_power: f64,
    /// Income per second with temporary and premium multipliers applied.
    pub auto_rate: f64,
    pub units: Vec<ProductionUnit>,
    pub boosts: Vec<BoostDef>,
    pub active_effects: Vec<ActiveEffect>,
    pub premium_bonuses: Vec<PremiumBonusDef>,
    pub premium_purchased: Vec<String>,
}

impl EconomySnapshot {
    pub fn of(state: &EconomyState) -> Self {
        Self {
            coins: state.coins,
            click_power: state.effective_click_power(),
            auto_rate: state.effective_auto_rate(),
            units: state.units.clone(),
            boosts: state.boosts.clone(),
            active_effects: state.active_effects.clone(),
            premium_bonuses: state.premium.clone(),
            premium_purchased: state.premium_purchased.clone(),
        }
    }
}
