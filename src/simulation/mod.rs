//! Simulation orchestrator
//!
//! Owns the roster, the relation ledger, the event log and the random
//! source, and runs the fixed per-tick pipeline over them.

pub mod disasters;
pub mod engine;
pub mod god_mode;
pub mod persistence;
pub mod roster;
pub mod snapshot;

pub use disasters::{DisasterKind, DisasterReport};
pub use engine::{collapse_reason, Simulation};
pub use god_mode::DisasterTarget;
pub use persistence::SaveState;
pub use roster::Roster;
pub use snapshot::{CivilizationStatus, HistorySnapshot, RunSummary};
