//! Main simulation loop
//!
//! One `tick()` is one year. The order inside a tick is fixed:
//! wars, purge, civilization updates, protection floors, global checks,
//! snapshots, auto-pause.

use rand::{Rng, SeedableRng};

use crate::civilization::{Civilization, TickContext};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{CivId, Position, SimRng, Tick};
use crate::diplomacy::{self, RelationLedger};
use crate::events::{Chronicle, EventKind, EventLogger, MajorEvent};
use crate::simulation::disasters;
use crate::simulation::roster::Roster;
use crate::simulation::snapshot::{HistorySnapshot, RunSummary};
use crate::world::{GridWorld, ResourceKind, WorldMap};

/// Ticks between population reports in the debug log
const REPORT_INTERVAL: Tick = 50;

/// Floors applied every tick to civilizations under protection
const PROTECTED_FOOD_FLOOR: f64 = 100.0;
const PROTECTED_POPULATION_FLOOR: u64 = 50;

pub struct Simulation<W: WorldMap = GridWorld> {
    pub(super) name: String,
    pub(super) config: SimulationConfig,
    pub(super) world: W,
    pub(super) roster: Roster,
    pub(super) relations: RelationLedger,
    pub(super) rng: SimRng,
    pub(super) tick: Tick,
    pub(super) year: u64,
    pub(super) next_id: u32,
    pub(super) event_log: EventLogger,
    pub(super) major_events: Vec<MajorEvent>,
    pub(super) history: Vec<HistorySnapshot>,
    pub(super) auto_pause: bool,
    pub(super) paused: bool,
}

impl Simulation<GridWorld> {
    /// Create a simulation on a freshly generated grid world
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let world = GridWorld::generate(config.world_width, config.world_height, config.seed);
        Self::with_world(config, world)
    }
}

impl<W: WorldMap> Simulation<W> {
    /// Create a simulation on a caller-supplied world
    pub fn with_world(config: SimulationConfig, world: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            rng: SimRng::seed_from_u64(config.seed),
            auto_pause: config.auto_pause_on_events,
            config,
            world,
            roster: Roster::new(),
            relations: RelationLedger::new(),
            tick: 0,
            year: 0,
            next_id: 1,
            event_log: EventLogger::new(),
            major_events: Vec::new(),
            history: Vec::new(),
            paused: false,
        })
    }

    /// Found up to `count` civilizations, never exceeding the configured maximum
    ///
    /// Returns how many were founded.
    pub fn initialize(&mut self, count: usize) -> usize {
        let max = self.config.max_civilizations;
        if count > max {
            tracing::warn!(
                "Requested {} civilizations, but maximum is {}. Initializing {}.",
                count,
                max,
                max
            );
        }

        let mut founded = 0;
        while founded < count && self.roster.len() < max {
            let id = self.found_civilization(None);
            if let Some(civ) = self.roster.get(id) {
                self.event_log.add_event(
                    self.year,
                    EventKind::Founding,
                    format!("Civilization {} founded", civ.name),
                );
            }
            founded += 1;
        }

        self.history.push(HistorySnapshot::capture(self.year, &self.roster));
        tracing::info!("Initialized {} with {} civilizations", self.name, self.roster.len());
        founded
    }

    /// Found one civilization; the world picks the site when none is given
    pub(super) fn found_civilization(&mut self, position: Option<Position>) -> CivId {
        let position = match position {
            Some(pos) => pos,
            None => {
                let cities: Vec<Position> = self
                    .roster
                    .iter()
                    .flat_map(|c| c.cities.keys().copied())
                    .collect();
                let territory: Vec<Position> = self
                    .roster
                    .iter()
                    .flat_map(|c| c.territory.iter().copied())
                    .collect();
                self.world.find_settlement_location(&cities, &territory, &mut self.rng)
            }
        };

        let id = CivId(self.next_id);
        self.next_id += 1;
        let civ = Civilization::found(id, position, &self.world, self.tick, &mut self.rng);
        tracing::info!("{} ({}) founded at {}", civ.name, civ.id, position);
        self.roster.push(civ);
        id
    }

    /// Advance one year. Returns true when this tick triggered an auto-pause.
    pub fn tick(&mut self) -> bool {
        self.tick += 1;
        self.year += 1;
        self.major_events.clear();
        let now = self.tick;

        if now % REPORT_INTERVAL == 0 {
            tracing::debug!("Year {}: {} civilizations active", self.year, self.roster.len());
            for civ in self.roster.iter() {
                tracing::debug!(
                    "  - {}: pop={}, food={:.1}, territory={}",
                    civ.name,
                    civ.population,
                    civ.food(),
                    civ.territory.len()
                );
            }
        }

        {
            let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
            diplomacy::process_wars(
                &mut self.roster,
                &mut self.relations,
                &mut self.rng,
                &self.config,
                &mut chronicle,
                now,
            );
        }

        self.purge_collapsed(true);
        self.update_civilizations(now);
        self.apply_protection(now);

        if now % self.config.global_check_interval == 0 {
            self.global_checks(now);
        }

        if now % self.config.snapshot_interval == 0 {
            self.history.push(HistorySnapshot::capture(self.year, &self.roster));
        }

        if self.auto_pause && !self.major_events.is_empty() {
            self.paused = true;
            tracing::info!("Paused after {} major events in year {}", self.major_events.len(), self.year);
            return true;
        }
        false
    }

    /// Advance `ticks` years without stopping for auto-pause
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
            self.paused = false;
        }
    }

    fn update_civilizations(&mut self, now: Tick) {
        let chunks = u64::from(self.config.update_chunks.max(1));

        for index in 0..self.roster.len() {
            let (id, intents) = {
                let Some((civ, others)) = self.roster.split_one_mut(index) else {
                    continue;
                };
                if civ.has_collapsed {
                    continue;
                }

                let full_update = u64::from(civ.id.0) % chunks == now % chunks;
                let first_new = civ.event_log.len();
                let mut ctx = TickContext {
                    world: &self.world,
                    others,
                    relations: &mut self.relations,
                    rng: &mut self.rng,
                    config: &self.config,
                    now,
                };
                let result = civ.tick(full_update, &mut ctx);

                let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
                forward_events(civ, first_new, &mut chronicle);

                match result {
                    Ok(intents) => (civ.id, intents),
                    Err(err) => {
                        tracing::error!("Skipping update for {}: {}", civ.name, err);
                        continue;
                    }
                }
            };

            if !intents.is_empty() {
                let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
                diplomacy::resolve_intents(
                    id,
                    intents,
                    &mut self.roster,
                    &mut self.relations,
                    &mut self.rng,
                    &mut chronicle,
                    now,
                );
            }
        }
    }

    fn apply_protection(&mut self, now: Tick) {
        for civ in self.roster.iter_mut().filter(|c| c.is_protected(now)) {
            let food = &mut civ.resources[ResourceKind::Food];
            *food = food.max(PROTECTED_FOOD_FLOOR);
            civ.population = civ.population.max(PROTECTED_POPULATION_FLOOR);
        }
    }

    fn global_checks(&mut self, now: Tick) {
        if self.rng.gen::<f64>() < self.config.disaster_chance {
            let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
            disasters::natural_disaster(&mut self.roster, &self.world, &mut self.rng, &mut chronicle);
        }

        self.collapse_sweep(now);
    }

    /// Collapse and remove every unprotected civilization that can no longer sustain itself
    fn collapse_sweep(&mut self, now: Tick) {
        {
            let mut chronicle = Chronicle::new(&mut self.event_log, &mut self.major_events, self.year);
            for civ in self.roster.iter_mut() {
                if civ.has_collapsed || civ.is_protected(now) {
                    continue;
                }
                let Some(reason) = collapse_reason(civ) else {
                    continue;
                };

                let message = format!("{} has collapsed due to {}!", civ.name, reason);
                civ.log_event(now, EventKind::Collapse, message.clone());
                chronicle.record(EventKind::Collapse, message.clone());
                chronicle.announce(
                    MajorEvent::new("Civilization Collapsed!", message).about(civ.id, civ.name.clone()),
                );
                civ.mark_collapsed();
            }
        }

        self.purge_collapsed(false);
    }

    /// Drop collapsed civilizations from the active set, ending their wars and relations
    fn purge_collapsed(&mut self, log: bool) {
        for civ in self.roster.purge_collapsed() {
            self.roster.end_wars_with(civ.id);
            self.relations.forget(civ.id);
            if log {
                self.event_log.add_event(
                    self.year,
                    EventKind::Collapse,
                    format!("Civilization {} has collapsed", civ.name),
                );
            }
            tracing::info!("Removed {} ({}) from the active civilizations", civ.name, civ.id);
        }
    }

    // === ACCESSORS ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn year(&self) -> u64 {
        self.year
    }

    /// Live civilizations in update order
    pub fn active_civilizations(&self) -> impl Iterator<Item = &Civilization> {
        self.roster.iter().filter(|c| c.is_alive())
    }

    pub fn civilization_count(&self) -> usize {
        self.active_civilizations().count()
    }

    pub fn civilization(&self, id: CivId) -> Option<&Civilization> {
        self.roster.get(id).filter(|c| c.is_alive())
    }

    /// Direct edit access; changes made here bypass every rule of the tick
    pub fn civilization_mut(&mut self, id: CivId) -> Option<&mut Civilization> {
        self.roster.get_mut(id).filter(|c| c.is_alive())
    }

    /// Live civilizations whose territory includes `pos`
    pub fn civilizations_at(&self, pos: Position) -> Vec<&Civilization> {
        self.roster.civilizations_at(pos)
    }

    pub fn relations(&self) -> &RelationLedger {
        &self.relations
    }

    pub fn relation(&self, a: CivId, b: CivId) -> Option<f64> {
        self.relations.get(a, b)
    }

    pub fn event_log(&self) -> &EventLogger {
        &self.event_log
    }

    /// Notifications raised during the most recent tick
    pub fn major_events(&self) -> &[MajorEvent] {
        &self.major_events
    }

    pub fn civilization_history(&self) -> &[HistorySnapshot] {
        &self.history
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn auto_pause_on_events(&self) -> bool {
        self.auto_pause
    }

    /// Flip auto-pause and return the new setting
    pub fn toggle_auto_pause(&mut self) -> bool {
        self.auto_pause = !self.auto_pause;
        self.auto_pause
    }

    pub fn summary(&self, elapsed_ms: u64) -> RunSummary {
        RunSummary::new(&self.name, self.year, &self.roster, &self.event_log, elapsed_ms)
    }
}

/// Why an unprotected civilization collapses, if it does
pub fn collapse_reason(civ: &Civilization) -> Option<&'static str> {
    let food = civ.food();
    if food < 2.0 {
        Some("starvation")
    } else if civ.population < 8 {
        Some("critically low population")
    } else if civ.population < 15 && food < 10.0 {
        Some("unsustainable resources and population")
    } else {
        None
    }
}

/// Copy a civilization's new log lines into the chronicle
fn forward_events(civ: &Civilization, first_new: usize, chronicle: &mut Chronicle<'_>) {
    for event in civ.event_log.iter().skip(first_new) {
        chronicle.record(event.kind, format!("{}: {}", civ.name, event.description));
        if event.kind.is_major() {
            chronicle.announce(
                MajorEvent::new(format!("Major Event in {}", civ.name), event.description.clone())
                    .about(civ.id, civ.name.clone()),
            );
        }
    }
}
