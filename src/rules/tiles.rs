//! Tile and market-card effects, applied during the `Resolve` phase.

use super::turn::Events;
use crate::core::{
    BuildOffer, Cash, Event, FundingOffer, GameRng, GameState, MarketCard, PlayerId, Tile,
};

/// Apply the effect of the tile `player` just landed on.
pub(crate) fn resolve_landing(
    state: &mut GameState,
    player: PlayerId,
    tile: Tile,
    rng: &mut GameRng,
    events: &mut Events,
) {
    match tile {
        Tile::Launchpad | Tile::IpoGate => {}
        Tile::Opportunity {
            build_cost,
            product_value,
        } => {
            state.turn.build = Some(BuildOffer {
                cost: build_cost,
                value: product_value,
            });
        }
        Tile::FundingRound {
            max_stake,
            terms_pct,
        } => {
            state.turn.funding = Some(FundingOffer {
                remaining_stake: max_stake,
                terms_pct,
            });
            events.push(Event::FundingOffered {
                max_stake,
                terms_pct,
            });
        }
        Tile::MarketEvent => {
            if let Some(card) = state.market.draw(rng) {
                events.push(Event::CardDrawn(card));
                apply_card(state, player, card, events);
            }
        }
        Tile::DemoDay => {
            let bonus = state.rules.demo_day_bonus;
            pay(state, player, bonus, events);
        }
        Tile::Burn { amount } => charge(state, player, amount, events),
    }
}

/// Apply a market card drawn by `player`.
pub(crate) fn apply_card(
    state: &mut GameState,
    player: PlayerId,
    card: MarketCard,
    events: &mut Events,
) {
    match card {
        MarketCard::Boom { points } => shift_sentiment(state, i32::from(points), events),
        MarketCard::Correction { points } => shift_sentiment(state, -i32::from(points), events),
        MarketCard::Windfall { amount } => pay(state, player, amount, events),
        MarketCard::Lawsuit { amount } => charge(state, player, amount, events),
        MarketCard::TalentWar { per_product } => {
            let products = state.player(player).map_or(0, |p| p.company.products);
            charge(state, player, per_product.times(products), events);
        }
    }
}

fn shift_sentiment(state: &mut GameState, delta: i32, events: &mut Events) {
    let from = state.market.sentiment_pct;
    let (floor, ceiling) = (state.rules.sentiment_floor, state.rules.sentiment_ceiling);
    state.market.shift_sentiment(delta, floor, ceiling);
    let to = state.market.sentiment_pct;
    if from != to {
        events.push(Event::SentimentChanged { from, to });
    }
}

/// Give `amount` to a player.
pub(crate) fn pay(state: &mut GameState, player: PlayerId, amount: Cash, events: &mut Events) {
    if amount.is_zero() {
        return;
    }
    if let Some(p) = state.player_mut(player) {
        p.cash = p.cash.saturating_add(amount);
        events.push(Event::Received { player, amount });
    }
}

/// Take `amount` from a player. Whatever cash cannot cover becomes debt,
/// so cash never goes negative.
pub(crate) fn charge(state: &mut GameState, player: PlayerId, amount: Cash, events: &mut Events) {
    if amount.is_zero() {
        return;
    }
    let Some(p) = state.player_mut(player) else {
        return;
    };
    let paid = p.cash.min(amount);
    let shortfall = Cash::new(amount.dollars() - paid.dollars());
    p.cash = Cash::new(p.cash.dollars() - paid.dollars());

    if !paid.is_zero() {
        events.push(Event::Paid {
            player,
            amount: paid,
        });
    }
    if !shortfall.is_zero() {
        p.debt = p.debt.saturating_add(shortfall);
        events.push(Event::DebtIncurred {
            player,
            amount: shortfall,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSetup;

    fn setup() -> (GameState, GameRng) {
        let state = GameSetup::new(3).players(["a", "b"]).build().unwrap();
        let rng = GameRng::from_cursor(&state.rng_cursor());
        (state, rng)
    }

    #[test]
    fn test_charge_within_cash() {
        let (mut state, _) = setup();
        let p0 = PlayerId::new(0);
        let mut events = Events::new();

        charge(&mut state, p0, Cash::new(200_000), &mut events);

        assert_eq!(state.players[0].cash, Cash::new(300_000));
        assert_eq!(state.players[0].debt, Cash::ZERO);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_charge_shortfall_becomes_debt() {
        let (mut state, _) = setup();
        let p0 = PlayerId::new(0);
        let mut events = Events::new();

        charge(&mut state, p0, Cash::new(650_000), &mut events);

        assert_eq!(state.players[0].cash, Cash::ZERO);
        assert_eq!(state.players[0].debt, Cash::new(150_000));
        assert!(events.contains(&Event::DebtIncurred {
            player: p0,
            amount: Cash::new(150_000)
        }));
    }

    #[test]
    fn test_demo_day_pays_bonus() {
        let (mut state, mut rng) = setup();
        let mut events = Events::new();

        resolve_landing(&mut state, PlayerId::new(1), Tile::DemoDay, &mut rng, &mut events);

        assert_eq!(state.players[1].cash, Cash::new(700_000));
    }

    #[test]
    fn test_funding_round_opens_offer() {
        let (mut state, mut rng) = setup();
        let mut events = Events::new();
        let tile = Tile::FundingRound {
            max_stake: 15,
            terms_pct: 110,
        };

        resolve_landing(&mut state, PlayerId::new(0), tile, &mut rng, &mut events);

        assert_eq!(
            state.turn.funding,
            Some(FundingOffer {
                remaining_stake: 15,
                terms_pct: 110
            })
        );
    }

    #[test]
    fn test_opportunity_opens_build() {
        let (mut state, mut rng) = setup();
        let mut events = Events::new();
        let tile = Tile::Opportunity {
            build_cost: Cash::new(1),
            product_value: Cash::new(2),
        };

        resolve_landing(&mut state, PlayerId::new(0), tile, &mut rng, &mut events);

        assert_eq!(
            state.turn.build,
            Some(BuildOffer {
                cost: Cash::new(1),
                value: Cash::new(2)
            })
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_market_event_draws_card() {
        let (mut state, mut rng) = setup();
        let mut events = Events::new();

        resolve_landing(&mut state, PlayerId::new(0), Tile::MarketEvent, &mut rng, &mut events);

        assert_eq!(state.market.next_card, 1);
        assert!(matches!(events[0], Event::CardDrawn(_)));
    }

    #[test]
    fn test_talent_war_scales_with_products() {
        let (mut state, _) = setup();
        state.players[0].company.products = 3;
        let mut events = Events::new();

        apply_card(
            &mut state,
            PlayerId::new(0),
            MarketCard::TalentWar {
                per_product: Cash::new(50_000),
            },
            &mut events,
        );

        assert_eq!(state.players[0].cash, Cash::new(350_000));
    }

    #[test]
    fn test_boom_and_correction() {
        let (mut state, _) = setup();
        let mut events = Events::new();

        apply_card(&mut state, PlayerId::new(0), MarketCard::Boom { points: 20 }, &mut events);
        assert_eq!(state.market.sentiment_pct, 120);

        apply_card(&mut state, PlayerId::new(0), MarketCard::Correction { points: 30 }, &mut events);
        assert_eq!(state.market.sentiment_pct, 90);
        assert_eq!(events.len(), 2);
    }
}
