// Library root: valuation pipeline and trade matcher.
//
// The crate is synchronous and performs no I/O. Callers load the source
// tables, build an `AnalysisConfig`, and query an `Analysis`.

pub mod analysis;
pub mod config;
pub mod error;
pub mod player;
pub mod sources;
pub mod summary;
pub mod trade;
pub mod valuation;

pub use analysis::{Analysis, TeamBreakdown};
pub use config::{AnalysisConfig, ConfigError, ForecastConfig, InterpretationBands};
pub use error::AnalysisError;
pub use player::{PlayerIdentity, Position};
pub use sources::SourceTables;
pub use summary::SummaryStats;
pub use trade::TradeSuggestion;
pub use valuation::{Interpretation, ValuationRow, ValueCategory};
