use chrono::NaiveDate;

use crate::dates;
use crate::error::{CovidError, CovidResult};
use crate::metrics::doubling_time_to_rate;
use crate::series::CaseSeries;

/// Piecewise-constant growth-rate schedule.
///
/// Entries are `(day threshold, daily growth multiplier)` pairs sorted by
/// threshold. Day `t` uses the first entry whose threshold is `>= t`; days
/// past every threshold keep the last entry's rate.
#[derive(Debug, Clone)]
pub struct Schedule {
    entries: Vec<(i64, f64)>,
}

impl Schedule {
    /// Schedule keyed directly by day offset and growth multiplier.
    pub fn from_growth_rates(entries: &[(i64, f64)]) -> CovidResult<Self> {
        if entries.is_empty() {
            return Err(CovidError::Validation("empty growth-rate schedule".into()));
        }
        let mut entries = entries.to_vec();
        entries.sort_by_key(|(threshold, _)| *threshold);
        Ok(Schedule { entries })
    }

    /// Schedule keyed by calendar date and doubling time in days. Dates are
    /// offset from `origin`, doubling times converted to daily rates via
    /// `exp(ln 2 / T)`.
    pub fn from_doubling_times(
        origin: NaiveDate,
        entries: &[(NaiveDate, f64)],
    ) -> CovidResult<Self> {
        let offsets: Vec<(i64, f64)> = entries
            .iter()
            .map(|(date, doubling_time)| {
                (
                    (*date - origin).num_days(),
                    doubling_time_to_rate(*doubling_time),
                )
            })
            .collect();
        Schedule::from_growth_rates(&offsets)
    }

    /// Growth multiplier active on day `day`.
    pub fn rate_on(&self, day: i64) -> f64 {
        match self.entries.iter().find(|(threshold, _)| *threshold >= day) {
            Some((_, rate)) => *rate,
            // past every threshold: the last rate stays in effect
            None => self.entries[self.entries.len() - 1].1,
        }
    }
}

/// Inputs for one synthetic outbreak.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Name given to the generated series.
    pub name: String,
    pub schedule: Schedule,
    /// Fraction of confirmed cases that die once resolved.
    pub mortality: f64,
    /// Days from confirmation to death or recovery.
    pub days_to_recovery: f64,
    /// Extend the date axis out to this date before simulating.
    pub extrapolate_to: Option<NaiveDate>,
}

/// Deterministic exponential outbreak generator.
///
/// One confirmed case seeds day zero; each following day multiplies the
/// confirmed count by the scheduled rate, and resolved cases split into
/// deaths and recoveries after the configured delay. Susceptible-population
/// depletion is deliberately not modeled.
pub struct OutbreakModel {}

impl OutbreakModel {
    pub fn simulate(days: Vec<NaiveDate>, scenario: &Scenario) -> CovidResult<CaseSeries> {
        if days.is_empty() {
            return Err(CovidError::Validation("empty date axis".into()));
        }
        if !(0.0..=1.0).contains(&scenario.mortality) {
            return Err(CovidError::Validation(format!(
                "mortality {} outside [0, 1]",
                scenario.mortality
            )));
        }
        if !scenario.days_to_recovery.is_finite() || scenario.days_to_recovery < 0.0 {
            return Err(CovidError::Validation(format!(
                "days to recovery {} is not a non-negative number",
                scenario.days_to_recovery
            )));
        }

        let mut days = days;
        if let Some(target) = scenario.extrapolate_to {
            dates::extend_to(&mut days, target);
        }
        let len = days.len();
        let mut confirmed = vec![0.0; len];
        let mut recovered = vec![0.0; len];
        let mut deaths = vec![0.0; len];
        confirmed[0] = 1.0;
        let resolution_lag = scenario.days_to_recovery.round() as usize;
        for day in 1..len {
            confirmed[day] = confirmed[day - 1] * scenario.schedule.rate_on(day as i64);
            if day as f64 >= scenario.days_to_recovery {
                let resolved = confirmed[day - resolution_lag];
                deaths[day] = resolved * scenario.mortality;
                recovered[day] = resolved * (1.0 - scenario.mortality);
            }
        }
        CaseSeries::new(scenario.name.clone(), None, days, confirmed, recovered, deaths)
    }
}
