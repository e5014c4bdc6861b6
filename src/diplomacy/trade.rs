//! Resource exchange between friendly neighbours

use rand::seq::SliceRandom;

use crate::civilization::entity::Civilization;
use crate::core::types::{SimRng, Tick};
use crate::diplomacy::RelationLedger;
use crate::events::EventKind;
use crate::world::ResourceKind;

/// Largest amount moved in one direction per exchange
const MAX_SHIPMENT: f64 = 10.0;

/// Goodwill from a completed exchange
const TRADE_GOODWILL: f64 = 0.05;

fn ship(from: &mut Civilization, to: &mut Civilization, kind: ResourceKind) -> f64 {
    let amount = (from.resources[kind].max(0.0) * 0.1).min(MAX_SHIPMENT);
    from.resources[kind] -= amount;
    to.resources[kind] += amount;
    amount
}

/// `a` sends one resource and receives a different one back
pub fn engage_trade(
    a: &mut Civilization,
    b: &mut Civilization,
    relations: &mut RelationLedger,
    rng: &mut SimRng,
    now: Tick,
) -> Option<(ResourceKind, f64, ResourceKind, f64)> {
    let &sent_kind = ResourceKind::ALL.choose(rng)?;
    let sent = ship(a, b, sent_kind);

    let returns: Vec<ResourceKind> = ResourceKind::ALL
        .iter()
        .copied()
        .filter(|k| *k != sent_kind)
        .collect();
    let &returned_kind = returns.choose(rng)?;
    let returned = ship(b, a, returned_kind);

    relations.adjust(a.id, b.id, TRADE_GOODWILL);

    a.log_event(
        now,
        EventKind::Trade,
        format!(
            "Traded {:.1} {} for {:.1} {} with {}",
            sent,
            sent_kind.name(),
            returned,
            returned_kind.name(),
            b.name
        ),
    );
    b.log_event(
        now,
        EventKind::Trade,
        format!(
            "Traded {:.1} {} for {:.1} {} with {}",
            returned,
            returned_kind.name(),
            sent,
            sent_kind.name(),
            a.name
        ),
    );

    Some((sent_kind, sent, returned_kind, returned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CivId, Position};
    use crate::world::{GridWorld, TerrainKind};
    use rand::SeedableRng;

    #[test]
    fn test_trade_conserves_goods_and_improves_relations() {
        let world = GridWorld::filled(40, 20, TerrainKind::Plains);
        let mut rng = SimRng::seed_from_u64(1);
        let mut a = Civilization::found(CivId(1), Position::new(8, 10), &world, 0, &mut rng);
        let mut b = Civilization::found(CivId(2), Position::new(30, 10), &world, 0, &mut rng);
        let mut ledger = RelationLedger::new();
        ledger.set(a.id, b.id, 0.5);
        let total = a.resources.total() + b.resources.total();

        let (sent_kind, sent, returned_kind, returned) =
            engage_trade(&mut a, &mut b, &mut ledger, &mut rng, 4).unwrap();

        assert_ne!(sent_kind, returned_kind);
        assert!(sent <= MAX_SHIPMENT && returned <= MAX_SHIPMENT);
        assert!((a.resources.total() + b.resources.total() - total).abs() < 1e-9);
        assert!((ledger.get(a.id, b.id).unwrap() - 0.55).abs() < 1e-9);
        assert_eq!(a.event_log.last().map(|e| e.kind), Some(EventKind::Trade));
    }
}
