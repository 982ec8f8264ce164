use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{CovidError, CovidResult};
use crate::simulate::{Scenario, Schedule};
use crate::source::SourceFiles;

/// One run's configuration: where the data lives, which countries to load,
/// and an optional synthetic scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Root directory holding the `COVID-19` data clone.
    pub data_dir: PathBuf,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub countries: Vec<String>,
    #[serde(default)]
    pub scenario: Option<ScenarioConfig>,
}

/// Synthetic-outbreak inputs. Exactly one schedule flavor must be present:
/// date-keyed doubling times or day-offset-keyed growth multipliers.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub doubling_times: Vec<DoublingTimeEntry>,
    #[serde(default)]
    pub growth_rates: Vec<GrowthRateEntry>,
    pub mortality: f64,
    pub days_to_recovery: f64,
    #[serde(default)]
    pub extrapolate_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoublingTimeEntry {
    pub date: NaiveDate,
    /// Doubling time in days from this date on.
    pub days: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrowthRateEntry {
    pub day: i64,
    pub rate: f64,
}

impl Config {
    /// Read a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CovidResult<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Read a JSON configuration from stdin.
    pub fn from_json_stdin() -> CovidResult<Self> {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        if raw.trim().is_empty() {
            return Err(CovidError::Config("no input on stdin".into()));
        }
        Ok(serde_json::from_str(&raw)?)
    }

    /// Source tables under the standard sibling layout.
    pub fn source_files(&self) -> SourceFiles {
        SourceFiles::sibling_layout(&self.data_dir)
    }
}

impl ScenarioConfig {
    /// Build the runnable scenario; `origin` anchors date-keyed schedules.
    pub fn to_scenario(&self, origin: NaiveDate) -> CovidResult<Scenario> {
        let schedule = match (self.doubling_times.is_empty(), self.growth_rates.is_empty()) {
            (false, true) => {
                let entries: Vec<(NaiveDate, f64)> = self
                    .doubling_times
                    .iter()
                    .map(|entry| (entry.date, entry.days))
                    .collect();
                Schedule::from_doubling_times(origin, &entries)?
            }
            (true, false) => {
                let entries: Vec<(i64, f64)> = self
                    .growth_rates
                    .iter()
                    .map(|entry| (entry.day, entry.rate))
                    .collect();
                Schedule::from_growth_rates(&entries)?
            }
            _ => {
                return Err(CovidError::Config(
                    "scenario needs exactly one of doubling_times or growth_rates".into(),
                ));
            }
        };
        Ok(Scenario {
            name: self.name.clone().unwrap_or_else(|| "simulated".into()),
            schedule,
            mortality: self.mortality,
            days_to_recovery: self.days_to_recovery,
            extrapolate_to: self.extrapolate_to,
        })
    }
}
