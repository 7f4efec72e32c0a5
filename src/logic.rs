//! Economy transition functions. Pure functions over `&mut EconomyState`,
//! fully testable without timers or storage.
//!
//! Every function here is one atomic transaction: the session calls them
//! with the state mutex held, so no two transitions ever interleave.

use rand::Rng;

use crate::catalog::{PremiumEffect, COST_GROWTH, GOBLIN_REWARD_SECONDS};
use crate::state::{ActiveEffect, EconomyState};

/// Manual click. Returns the amount credited (post-crit) so the caller can
/// display it. Always succeeds.
pub fn click(state: &mut EconomyState) -> f64 {
    let mut power = state.effective_click_power();
    if state.crit_chance > 0.0 && state.rng.gen::<f64>() < state.crit_chance {
        power *= 2.0;
    }
    state.coins += power;
    power
}

/// Try to buy one production unit. Returns true if successful.
///
/// On success the debit, count increment, rate increments, and cost
/// recompute all land together; an unknown id or insufficient coins
/// changes nothing.
pub fn buy_unit(state: &mut EconomyState, id: &str) -> bool {
    let idx = match state.units.iter().position(|u| u.id == id) {
        Some(i) => i,
        None => return false,
    };
    let cost = state.units[idx].cost;
    if state.coins < cost {
        return false;
    }

    state.coins -= cost;
    let unit = &mut state.units[idx];
    unit.count += 1;
    unit.cost = (unit.cost * COST_GROWTH).floor();
    let auto = unit.auto;
    let power = unit.power;
    state.auto_rate_base += auto;
    state.click_power_base += power;
    true
}

/// Try to buy a temporary boost. Returns true if successful.
/// Rejected if the id is unknown, the boost is already running, or coins
/// fall short.
pub fn buy_boost(state: &mut EconomyState, id: &str) -> bool {
    let boost = match state.boost(id) {
        Some(b) => b.clone(),
        None => return false,
    };
    if state.is_boost_active(id) {
        return false;
    }
    if state.coins < boost.cost {
        return false;
    }

    state.coins -= boost.cost;
    state.active_effects.push(ActiveEffect {
        id: boost.id,
        remaining: boost.duration,
        multiplier: boost.multiplier,
        target: boost.target,
    });
    true
}

/// Apply a premium bonus after the external payment collaborator confirmed
/// the purchase. Returns true if the bonus was applied.
///
/// Idempotent: duplicate confirmations (and unknown ids) are no-ops, so a
/// replayed payment notification can never double-apply.
pub fn grant_premium_bonus(state: &mut EconomyState, id: &str) -> bool {
    if state.has_premium(id) {
        return false;
    }
    let bonus = match state.premium_bonus(id) {
        Some(b) => b.clone(),
        None => return false,
    };

    state.premium_purchased.push(bonus.id);
    match bonus.effect {
        PremiumEffect::GrantCoins(amount) => {
            state.coins += amount;
        }
        PremiumEffect::GrantIdleIncome { seconds } => {
            state.coins += state.auto_rate_base * state.premium_auto_multiplier * seconds;
        }
        PremiumEffect::ClickMultiplier(factor) => {
            state.premium_click_multiplier *= factor;
        }
        PremiumEffect::AutoMultiplier(factor) => {
            state.premium_auto_multiplier *= factor;
        }
        PremiumEffect::CritChance(increment) => {
            state.crit_chance += increment;
        }
    }
    true
}

/// Collect a loot goblin: credits five minutes of current base auto income
/// and returns the reward. Temporary effects do not apply; the rate is
/// sampled at collection time, not accumulated.
pub fn collect_goblin(state: &mut EconomyState) -> f64 {
    let reward = state.auto_rate_base * state.premium_auto_multiplier * GOBLIN_REWARD_SECONDS;
    state.coins += reward;
    reward
}

/// One income accrual tick: credits one second of effective auto income.
pub fn income_tick(state: &mut EconomyState) {
    state.coins += state.effective_auto_rate();
}

/// One effect decay tick: count every active effect down one second and
/// drop the ones that hit zero.
pub fn decay_tick(state: &mut EconomyState) {
    for effect in &mut state.active_effects {
        effect.remaining = effect.remaining.saturating_sub(1);
    }
    state.active_effects.retain(|e| e.remaining > 0);
}

/// Format a coin amount for display: K/M/B/T/Q suffixes with one decimal
/// from a thousand up, floored integer below.
pub fn format_amount(n: f64) -> String {
    if n >= 1e15 {
        format!("{:.1}Q", n / 1e15)
    } else if n >= 1e12 {
        format!("{:.1}T", n / 1e12)
    } else if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{}", n.floor() as i64)
    }
}
