pub mod detail;
pub mod search;

pub use detail::{DetailOrchestrator, DetailOutcome, DetailState};
pub use search::{SearchOptions, SearchOrchestrator, SearchOutcome, SearchState};
