//! Economy state definitions and derived values.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::catalog::{BoostDef, Catalog, EffectTarget, PremiumBonusDef, UnitDef};

/// Live entry for one production unit: catalog identity plus the mutable
/// fields (current cost, owned count).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionUnit {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub base_cost: f64,
    /// Current purchase cost. Grows by [`crate::catalog::COST_GROWTH`]
    /// after every purchase.
    pub cost: f64,
    pub auto: f64,
    pub power: f64,
    pub count: u32,
}

impl ProductionUnit {
    pub fn new(def: &UnitDef) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            desc: def.desc.clone(),
            base_cost: def.base_cost,
            cost: def.base_cost,
            auto: def.auto,
            power: def.power,
            count: 0,
        }
    }
}

/// A running temporary boost. At most one per boost id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: String,
    /// Whole seconds left. Decremented once per decay tick; the effect is
    /// removed the instant this reaches zero.
    pub remaining: u32,
    pub multiplier: f64,
    pub target: EffectTarget,
}

/// Full economy state for one player session.
///
/// Owned exclusively by the session; every mutation goes through the
/// transition functions in [`crate::logic`] or the two tick steps. The
/// presentation layer only ever sees [`crate::snapshot::EconomySnapshot`].
#[derive(Clone, Debug)]
pub struct EconomyState {
    pub coins: f64,
    /// Click power before temporary and premium multipliers.
    pub click_power_base: f64,
    /// Income per second before temporary and premium multipliers.
    pub auto_rate_base: f64,
    pub units: Vec<ProductionUnit>,
    pub boosts: Vec<BoostDef>,
    pub premium: Vec<PremiumBonusDef>,
    pub active_effects: Vec<ActiveEffect>,
    /// Premium bonus ids already granted, in grant order.
    pub premium_purchased: Vec<String>,
    pub premium_click_multiplier: f64,
    pub premium_auto_multiplier: f64,
    /// Probability that a click is doubled. Uncapped: any value >= 1 makes
    /// every click critical.
    pub crit_chance: f64,
    pub(crate) rng: Pcg64Mcg,
}

impl EconomyState {
    /// Fresh state from a catalog, crit stream seeded from OS entropy.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_rng(catalog, Pcg64Mcg::from_entropy())
    }

    /// Fresh state with a pinned crit seed. Deterministic; used by tests
    /// and replay tooling.
    pub fn with_seed(catalog: Catalog, seed: u64) -> Self {
        Self::with_rng(catalog, Pcg64Mcg::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, rng: Pcg64Mcg) -> Self {
        Self {
            coins: 0.0,
            click_power_base: 1.0,
            auto_rate_base: 0.0,
            units: catalog.units.iter().map(ProductionUnit::new).collect(),
            boosts: catalog.boosts,
            premium: catalog.premium,
            active_effects: Vec::new(),
            premium_purchased: Vec::new(),
            premium_click_multiplier: 1.0,
            premium_auto_multiplier: 1.0,
            crit_chance: 0.0,
            rng,
        }
    }

    /// Product of active-effect multipliers on the given channel.
    pub fn effect_multiplier(&self, target: EffectTarget) -> f64 {
        self.active_effects
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.multiplier)
            .product()
    }

    /// Click power with temporary and premium multipliers applied.
    pub fn effective_click_power(&self) -> f64 {
        self.click_power_base
            * self.effect_multiplier(EffectTarget::Click)
            * self.premium_click_multiplier
    }

    /// Income per second with temporary and premium multipliers applied.
    pub fn effective_auto_rate(&self) -> f64 {
        self.auto_rate_base
            * self.effect_multiplier(EffectTarget::Auto)
            * self.premium_auto_multiplier
    }

    pub fn can_afford(&self, amount: f64) -> bool {
        self.coins >= amount
    }

    pub fn unit(&self, id: &str) -> Option<&ProductionUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn boost(&self, id: &str) -> Option<&BoostDef> {
        self.boosts.iter().find(|b| b.id == id)
    }

    pub fn premium_bonus(&self, id: &str) -> Option<&PremiumBonusDef> {
        self.premium.iter().find(|b| b.id == id)
    }

    pub fn has_premium(&self, id: &str) -> bool {
        self.premium_purchased.iter().any(|p| p == id)
    }

    pub fn is_boost_active(&self, id: &str) -> bool {
        self.active_effects.iter().any(|e| e.id == id)
    }
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
