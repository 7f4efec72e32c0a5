//! Static catalog definitions and tuning constants.
//!
//! Kept separate from the engine so balance tweaks stay isolated from the
//! transition logic. Catalogs are loaded once at session start and never
//! mutated; live per-unit fields (count, cost) belong to the state.

use serde::{Deserialize, Serialize};

/// Cost growth applied after each production-unit purchase.
pub const COST_GROWTH: f64 = 1.35;

/// Seconds of base auto income granted by collecting a loot goblin.
pub const GOBLIN_REWARD_SECONDS: f64 = 60.0 * 5.0;

/// Period of the income accrual tick.
pub const INCOME_TICK_SECS: u64 = 1;

/// Period of the effect decay tick.
pub const DECAY_TICK_SECS: u64 = 1;

/// Period of the autosave worker.
pub const AUTOSAVE_SECS: u64 = 5;

/// Which channel a temporary effect multiplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Click,
    Auto,
}

/// A purchasable production unit: permanently raises automatic income and
/// click power.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub base_cost: f64,
    /// Income per second added per owned unit.
    pub auto: f64,
    /// Click power added per owned unit.
    pub power: f64,
}

/// A purchasable temporary multiplier boost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostDef {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub cost: f64,
    /// Lifetime in whole seconds.
    pub duration: u32,
    pub multiplier: f64,
    pub target: EffectTarget,
}

/// Permanent effect applied when a premium bonus is granted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PremiumEffect {
    /// Flat coin grant.
    GrantCoins(f64),
    /// Instantly mint the given seconds of base auto income.
    GrantIdleIncome { seconds: f64 },
    /// Multiply the permanent click multiplier.
    ClickMultiplier(f64),
    /// Multiply the permanent auto multiplier.
    AutoMultiplier(f64),
    /// Add to the critical-hit probability.
    CritChance(f64),
}

/// A one-time-per-player bonus unlocked by an external crypto payment.
/// The engine never sees the payment itself, only the confirmation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PremiumBonusDef {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub effect: PremiumEffect,
}

/// Full static configuration for one game.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    pub units: Vec<UnitDef>,
    pub boosts: Vec<BoostDef>,
    pub premium: Vec<PremiumBonusDef>,
}

fn unit(id: &str, name: &str, desc: &str, base_cost: f64, auto: f64, power: f64) -> UnitDef {
    UnitDef {
        id: id.into(),
        name: name.into(),
        desc: desc.into(),
        base_cost,
        auto,
        power,
    }
}

fn boost(
    id: &str,
    name: &str,
    desc: &str,
    cost: f64,
    duration: u32,
    multiplier: f64,
    target: EffectTarget,
) -> BoostDef {
    BoostDef {
        id: id.into(),
        name: name.into(),
        desc: desc.into(),
        cost,
        duration,
        multiplier,
        target,
    }
}

fn premium(id: &str, name: &str, desc: &str, effect: PremiumEffect) -> PremiumBonusDef {
    PremiumBonusDef {
        id: id.into(),
        name: name.into(),
        desc: desc.into(),
        effect,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            units: vec![
                unit("hamster", "Hamster Wheel", "Rodent generates power", 15.0, 1.0, 1.0),
                unit("intern", "Unpaid Intern", "Exploiting youth", 50.0, 5.0, 2.0),
                unit("printer", "Money Printer", "BRRRRRR", 200.0, 10.0, 5.0),
                unit("oil", "Oil Rig", "Foreign intervention", 800.0, 25.0, 10.0),
                unit("crypto", "Crypto Scam", "Pump & dump", 2_000.0, 50.0, 20.0),
                unit("reserve", "Fed Reserve", "Infinite liquidity", 5_000.0, 100.0, 50.0),
                unit("void", "Void Harvester", "Extract from nothing", 15_000.0, 250.0, 100.0),
                unit("time", "Time Machine", "Steal from future", 50_000.0, 500.0, 200.0),
                unit("alchemy", "Alchemy Lab", "Lead to gold", 150_000.0, 1_000.0, 500.0),
                unit("dragon", "Dragon Hoard", "Ancient reptile", 500_000.0, 2_500.0, 1_000.0),
                unit("tree", "Money Tree", "Impossible", 2_000_000.0, 5_000.0, 2_500.0),
                unit("goose", "Golden Goose", "Golden eggs", 10_000_000.0, 10_000.0, 5_000.0),
            ],
            boosts: vec![
                boost(
                    "coffee",
                    "Espresso Shot",
                    "2x Click Power (10s)",
                    100.0,
                    10,
                    2.0,
                    EffectTarget::Click,
                ),
                boost(
                    "roids",
                    "Steroids",
                    "10x Click Power (5s)",
                    2_000.0,
                    5,
                    10.0,
                    EffectTarget::Click,
                ),
            ],
            premium: vec![
                premium(
                    "golden_touch",
                    "Golden Touch",
                    "Midas would be jealous",
                    PremiumEffect::GrantCoins(1_000_000.0),
                ),
                premium(
                    "time_warp",
                    "Time Warp",
                    "Skip ahead in time",
                    PremiumEffect::GrantIdleIncome { seconds: 300.0 },
                ),
                premium(
                    "whale_mode",
                    "Whale Mode",
                    "Become the market",
                    PremiumEffect::ClickMultiplier(5.0),
                ),
                premium(
                    "robot_army",
                    "Robot Army",
                    "Automation revolution",
                    PremiumEffect::AutoMultiplier(3.0),
                ),
                premium(
                    "lucky_coin",
                    "Lucky Coin",
                    "Fortune favors you",
                    PremiumEffect::CritChance(0.1),
                ),
            ],
        }
    }
}
