//! Balance simulator for the Money Machine economy.
//! Run with: cargo test simulate_greedy -- --nocapture

use crate::catalog::Catalog;
use crate::logic;
use crate::state::EconomyState;

/// Find the unit purchase with the best payback time, assuming the given
/// sustained click rate. A unit pays for itself through both its auto
/// income and the extra click power it grants.
fn find_best_unit(state: &EconomyState, clicks_per_second: f64) -> Option<String> {
    let mut best: Option<(f64, String)> = None;
    for unit in &state.units {
        if state.coins < unit.cost {
            continue;
        }
        let gain = unit.auto + unit.power * clicks_per_second;
        if gain <= 0.0 {
            continue;
        }
        let payback = unit.cost / gain;
        let dominated = best.as_ref().map_or(false, |(bp, _)| *bp <= payback);
        if !dominated {
            best = Some((payback, unit.id.clone()));
        }
    }
    best.map(|(_, id)| id)
}

fn report(state: &EconomyState, seconds: u32, purchases: u32) {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    eprintln!("┌─── {}m{}s ─────────────────────────", minutes, secs);
    eprintln!(
        "│ Coins: {}  Rate: {}/s  Click: {}",
        logic::format_amount(state.coins),
        logic::format_amount(state.effective_auto_rate()),
        logic::format_amount(state.effective_click_power()),
    );
    let counts: Vec<String> = state
        .units
        .iter()
        .filter(|u| u.count > 0)
        .map(|u| format!("{}:{}", u.id, u.count))
        .collect();
    eprintln!("│ Units ({} buys): {}", purchases, counts.join("  "));
    eprintln!("└────────────────────────────────────");
}

/// Simulate greedy play for `total_seconds`: click steadily, buy the best
/// payback every second, report pacing at checkpoints.
fn simulate(total_seconds: u32) {
    let mut state = EconomyState::with_seed(Catalog::default(), 42);
    let clicks_per_second = 5u32;

    let mut purchases = 0u32;
    let mut max_idle_gap = 0u32;
    let mut last_purchase = 0u32;

    let report_times = [30u32, 60, 120, 300, 600, 1200, 1800, 3600];
    let mut next_report = 0usize;

    eprintln!("\n========================================");
    eprintln!("  Money Machine balance simulator");
    eprintln!("  Play time: {}m, {} clicks/s", total_seconds / 60, clicks_per_second);
    eprintln!("========================================");

    for second in 1..=total_seconds {
        for _ in 0..clicks_per_second {
            logic::click(&mut state);
        }
        logic::income_tick(&mut state);
        logic::decay_tick(&mut state);

        // Greedy purchasing until nothing pays off.
        let mut bought = false;
        for _ in 0..20 {
            match find_best_unit(&state, clicks_per_second as f64) {
                Some(id) => {
                    if logic::buy_unit(&mut state, &id) {
                        purchases += 1;
                        bought = true;
                    } else {
                        break;
                    }
                }
                None => break,
            }
        }
        if bought {
            let gap = second - last_purchase;
            if gap > max_idle_gap {
                max_idle_gap = gap;
            }
            last_purchase = second;
        }

        if next_report < report_times.len() && second >= report_times[next_report] {
            report(&state, second, purchases);
            next_report += 1;
        }
    }

    eprintln!("\n======== Final ========");
    report(&state, total_seconds, purchases);
    eprintln!("Longest wait between purchases: {}s", max_idle_gap);
    eprintln!("=======================\n");
}
