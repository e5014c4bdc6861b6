//! Event and history logging
//!
//! `EventLogger` is the simulation-wide chronicle. It is append-only; only
//! `clear()` removes entries. `MajorEvent`s are the notifications raised during
//! a single tick and are cleared when the next tick starts.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::CivId;

/// Category of a logged event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Founding,
    Population,
    Expansion,
    CityFounded,
    CityAbandoned,
    TerritoryRestored,
    FirstContact,
    WarDeclared,
    Battle,
    Conquest,
    Peace,
    Unification,
    Trade,
    Disaster,
    Collapse,
    Intervention,
}

impl EventKind {
    /// Kinds that raise a notification when a civilization logs them
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            EventKind::CityFounded
                | EventKind::FirstContact
                | EventKind::WarDeclared
                | EventKind::Conquest
                | EventKind::Unification
                | EventKind::Collapse
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub year: u64,
    pub description: String,
    pub kind: EventKind,
    /// Wall-clock milliseconds when the entry was written
    pub timestamp: u64,
}

/// Notification for observers, valid until the next tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MajorEvent {
    pub title: String,
    pub message: String,
    pub civilization: Option<CivId>,
    pub civilization_name: Option<String>,
}

impl MajorEvent {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            civilization: None,
            civilization_name: None,
        }
    }

    pub fn about(mut self, id: CivId, name: impl Into<String>) -> Self {
        self.civilization = Some(id);
        self.civilization_name = Some(name.into());
        self
    }
}

/// Era summary produced by `EventLogger::history_summary`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Era {
    pub start_year: u64,
    pub end_year: u64,
    pub events: Vec<String>,
}

/// Years covered by one era in the summary
pub const ERA_LENGTH: u64 = 100;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLogger {
    events: Vec<LoggedEvent>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, year: u64, kind: EventKind, description: impl Into<String>) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        self.events.push(LoggedEvent {
            year,
            description: description.into(),
            kind,
            timestamp,
        });
    }

    pub fn all(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn by_year(&self, year: u64) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.year == year)
    }

    pub fn by_kind(&self, kind: EventKind) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Events with `start <= year <= end`
    pub fn in_range(&self, start: u64, end: u64) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| (start..=end).contains(&e.year))
    }

    pub(crate) fn set_events(&mut self, events: Vec<LoggedEvent>) {
        self.events = events;
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    /// Events grouped into consecutive 100-year eras, oldest first
    pub fn history_summary(&self) -> Vec<Era> {
        let mut eras: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for event in &self.events {
            eras.entry(event.year / ERA_LENGTH)
                .or_default()
                .push(format!("Year {}: {}", event.year, event.description));
        }

        eras.into_iter()
            .map(|(era, events)| Era {
                start_year: era * ERA_LENGTH,
                end_year: era * ERA_LENGTH + ERA_LENGTH - 1,
                events,
            })
            .collect()
    }
}

/// Write access to the chronicle and this tick's notifications
pub struct Chronicle<'a> {
    pub log: &'a mut EventLogger,
    pub majors: &'a mut Vec<MajorEvent>,
    pub year: u64,
}

impl<'a> Chronicle<'a> {
    pub fn new(log: &'a mut EventLogger, majors: &'a mut Vec<MajorEvent>, year: u64) -> Self {
        Self { log, majors, year }
    }

    pub fn record(&mut self, kind: EventKind, description: impl Into<String>) {
        self.log.add_event(self.year, kind, description);
    }

    pub fn announce(&mut self, event: MajorEvent) {
        tracing::info!("{}: {}", event.title, event.message);
        self.majors.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EventLogger {
        let mut log = EventLogger::new();
        log.add_event(5, EventKind::Founding, "Lumina founded");
        log.add_event(120, EventKind::WarDeclared, "War between A and B");
        log.add_event(150, EventKind::Peace, "Peace between A and B");
        log.add_event(150, EventKind::Disaster, "Flood");
        log
    }

    #[test]
    fn test_queries() {
        let log = sample();
        assert_eq!(log.by_year(150).count(), 2);
        assert_eq!(log.by_kind(EventKind::WarDeclared).count(), 1);
        assert_eq!(log.in_range(100, 150).count(), 3);
        assert_eq!(log.in_range(6, 119).count(), 0);
    }

    #[test]
    fn test_history_summary_groups_by_century() {
        let eras = sample().history_summary();
        assert_eq!(eras.len(), 2);
        assert_eq!(eras[0].start_year, 0);
        assert_eq!(eras[0].end_year, 99);
        assert_eq!(eras[1].start_year, 100);
        assert_eq!(eras[1].events.len(), 3);
    }

    #[test]
    fn test_export_is_verbatim() {
        let log = sample();
        let json = log.export_to_json().unwrap();
        let back: Vec<LoggedEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), log.all());
    }

    #[test]
    fn test_clear() {
        let mut log = sample();
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_chronicle_records_and_announces() {
        let mut log = EventLogger::new();
        let mut majors = Vec::new();
        let mut chronicle = Chronicle::new(&mut log, &mut majors, 42);
        chronicle.record(EventKind::Collapse, "Nova collapsed");
        chronicle.announce(MajorEvent::new("Collapse", "Nova collapsed").about(CivId(3), "Nova"));
        assert_eq!(log.by_year(42).count(), 1);
        assert_eq!(majors[0].civilization, Some(CivId(3)));
    }
}
