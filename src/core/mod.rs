//! Record types, timestamps, and errors shared by every analyzer.

pub mod dates;
pub mod errors;
pub mod types;

pub use errors::{Error, Result, ResultExt};
pub use types::{ChangeRecord, ChangeState, DateRange, ImpactCounts, ImpactTier, TicketRecord};
