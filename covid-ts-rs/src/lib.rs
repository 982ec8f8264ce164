//! Daily COVID-19 case-count time series: parsing of the published
//! per-country tables, derived metrics (still-infected counts, doubling
//! times), and a deterministic what-if outbreak simulator.

pub mod collection;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod metrics;
pub mod series;
pub mod simulate;
pub mod source;

pub use collection::SeriesCollection;
pub use config::{Config, ScenarioConfig};
pub use error::{CovidError, CovidResult};
pub use series::CaseSeries;
pub use simulate::{OutbreakModel, Scenario, Schedule};
pub use source::SourceFiles;
