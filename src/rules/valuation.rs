//! Company valuation.
//!
//! ```text
//! base      = seed_valuation + funding_raised + product_value
//! valuation = base * sentiment_pct / 100
//! public    => valuation * ipo_premium_pct / 100
//! ```
//!
//! All arithmetic is integer, widened to `i128` and clamped back to `i64`.

use crate::core::money::clamp_i128;
use crate::core::{Cash, Company, GameState, Market, RulesConfig};

/// Valuation of a company under the given market and rules.
#[must_use]
pub fn company_valuation(company: &Company, market: &Market, rules: &RulesConfig) -> Cash {
    let base = i128::from(rules.seed_valuation.dollars())
        + i128::from(company.funding_raised.dollars())
        + i128::from(company.product_value.dollars());

    let mut value = base * i128::from(market.sentiment_pct) / 100;
    if company.public {
        value = value * i128::from(rules.ipo_premium_pct) / 100;
    }
    Cash::new(clamp_i128(value.max(0)))
}

/// Refresh every cached valuation in place.
pub(crate) fn revalue_all(state: &mut GameState) {
    let GameState {
        players,
        market,
        rules,
        ..
    } = state;
    for player in players.iter_mut() {
        player.company.valuation = company_valuation(&player.company, market, rules);
    }
}
