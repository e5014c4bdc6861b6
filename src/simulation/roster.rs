//! Ordered set of active civilizations with id lookup

use ahash::AHashMap;

use crate::civilization::{Civilization, Others};
use crate::core::types::{CivId, Position};

#[derive(Clone, Debug, Default)]
pub struct Roster {
    civs: Vec<Civilization>,
    index: AHashMap<CivId, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(civs: Vec<Civilization>) -> Self {
        let mut roster = Self { civs, index: AHashMap::new() };
        roster.reindex();
        roster
    }

    fn reindex(&mut self) {
        self.index = self.civs.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
    }

    pub fn len(&self) -> usize {
        self.civs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.civs.is_empty()
    }

    pub fn push(&mut self, civ: Civilization) {
        self.index.insert(civ.id, self.civs.len());
        self.civs.push(civ);
    }

    pub fn as_slice(&self) -> &[Civilization] {
        &self.civs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Civilization> {
        self.civs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Civilization> {
        self.civs.iter_mut()
    }

    pub fn ids(&self) -> Vec<CivId> {
        self.civs.iter().map(|c| c.id).collect()
    }

    pub fn contains(&self, id: CivId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: CivId) -> Option<&Civilization> {
        self.index.get(&id).map(|&i| &self.civs[i])
    }

    pub fn get_mut(&mut self, id: CivId) -> Option<&mut Civilization> {
        let i = *self.index.get(&id)?;
        self.civs.get_mut(i)
    }

    /// Mutable access to two distinct civilizations at once
    pub fn pair_mut(&mut self, a: CivId, b: CivId) -> Option<(&mut Civilization, &mut Civilization)> {
        let ia = *self.index.get(&a)?;
        let ib = *self.index.get(&b)?;
        if ia == ib {
            return None;
        }

        if ia < ib {
            let (left, right) = self.civs.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.civs.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// The civilization at `index` plus a read-only view of the rest
    pub fn split_one_mut(&mut self, index: usize) -> Option<(&mut Civilization, Others<'_>)> {
        let (before, rest) = self.civs.split_at_mut(index);
        let (civ, after) = rest.split_first_mut()?;
        Some((civ, Others::new(before, after)))
    }

    /// Live civilizations whose territory includes `pos`
    pub fn civilizations_at(&self, pos: Position) -> Vec<&Civilization> {
        self.civs
            .iter()
            .filter(|c| !c.has_collapsed && c.territory.contains(&pos))
            .collect()
    }

    /// Drop `id` from every war set
    pub fn end_wars_with(&mut self, id: CivId) {
        for civ in &mut self.civs {
            civ.at_war_with.remove(&id);
        }
    }

    /// Remove and return every collapsed civilization
    pub fn purge_collapsed(&mut self) -> Vec<Civilization> {
        if !self.civs.iter().any(|c| c.has_collapsed) {
            return Vec::new();
        }

        let (collapsed, live): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.civs).into_iter().partition(|c| c.has_collapsed);
        self.civs = live;
        self.reindex();
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SimRng;
    use crate::world::{GridWorld, TerrainKind};
    use rand::SeedableRng;

    fn roster(n: u32) -> Roster {
        let world = GridWorld::filled(60, 60, TerrainKind::Plains);
        let mut rng = SimRng::seed_from_u64(1);
        let mut roster = Roster::new();
        for i in 0..n {
            let pos = Position::new(5 + i as i32 * 12, 30);
            roster.push(Civilization::found(CivId(i + 1), pos, &world, 0, &mut rng));
        }
        roster
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut r = roster(3);
        let (a, b) = r.pair_mut(CivId(3), CivId(1)).unwrap();
        assert_eq!((a.id, b.id), (CivId(3), CivId(1)));
        assert!(r.pair_mut(CivId(2), CivId(2)).is_none());
        assert!(r.pair_mut(CivId(2), CivId(9)).is_none());
    }

    #[test]
    fn test_split_one_excludes_self() {
        let mut r = roster(3);
        let (civ, others) = r.split_one_mut(1).unwrap();
        assert_eq!(civ.id, CivId(2));
        let ids: Vec<_> = others.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![CivId(1), CivId(3)]);
        assert!(r.split_one_mut(3).is_none());
    }

    #[test]
    fn test_purge_reindexes() {
        let mut r = roster(3);
        r.get_mut(CivId(2)).unwrap().mark_collapsed();
        let gone = r.purge_collapsed();
        assert_eq!(gone.len(), 1);
        assert_eq!(r.ids(), vec![CivId(1), CivId(3)]);
        assert_eq!(r.get(CivId(3)).map(|c| c.id), Some(CivId(3)));
        assert!(!r.contains(CivId(2)));
    }

    #[test]
    fn test_end_wars_with_clears_every_enemy() {
        let mut r = roster(3);
        for id in [CivId(1), CivId(3)] {
            r.get_mut(id).unwrap().at_war_with.insert(CivId(2));
        }
        r.get_mut(CivId(1)).unwrap().at_war_with.insert(CivId(3));

        r.end_wars_with(CivId(2));

        assert!(r.iter().all(|c| !c.is_at_war_with(CivId(2))));
        assert!(r.get(CivId(1)).unwrap().is_at_war_with(CivId(3)));
    }

    #[test]
    fn test_civilizations_at() {
        let r = roster(2);
        let pos = r.get(CivId(1)).unwrap().position;
        let owners = r.civilizations_at(pos);
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id, CivId(1));
    }
}
