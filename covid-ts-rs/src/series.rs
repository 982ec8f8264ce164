use chrono::NaiveDate;

use crate::dates;
use crate::error::{CovidError, CovidResult};
use crate::source::{self, SourceFiles};

/// One country's (or one scenario's) aligned daily time series.
///
/// All five sequences share the date axis index-for-index, and the struct is
/// immutable once constructed.
#[derive(Debug, Clone)]
pub struct CaseSeries {
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    days: Vec<NaiveDate>,
    confirmed: Vec<f64>,
    recovered: Vec<f64>,
    deaths: Vec<f64>,
    still_infected: Vec<f64>,
}

impl CaseSeries {
    /// Build a series from aligned raw sequences, deriving the still-infected
    /// counts. All sequences must match the axis length.
    pub fn new(
        country: impl Into<String>,
        coords: Option<(f64, f64)>,
        days: Vec<NaiveDate>,
        confirmed: Vec<f64>,
        recovered: Vec<f64>,
        deaths: Vec<f64>,
    ) -> CovidResult<Self> {
        if confirmed.len() != days.len()
            || recovered.len() != days.len()
            || deaths.len() != days.len()
        {
            return Err(CovidError::Validation(format!(
                "series lengths diverge: {} days, {} confirmed, {} recovered, {} deaths",
                days.len(),
                confirmed.len(),
                recovered.len(),
                deaths.len()
            )));
        }
        // Reporting noise (and simulation startup) can push the balance below
        // zero; clamp instead of carrying negative counts.
        let still_infected = confirmed
            .iter()
            .zip(&recovered)
            .zip(&deaths)
            .map(|((c, r), d)| (c - d - r).max(0.0))
            .collect();
        Ok(CaseSeries {
            country: country.into(),
            latitude: coords.map(|(lat, _)| lat),
            longitude: coords.map(|(_, lon)| lon),
            days,
            confirmed,
            recovered,
            deaths,
            still_infected,
        })
    }

    /// Load one country's national aggregates from the three source tables.
    ///
    /// This is a two-phase build: the date axis comes from the confirmed
    /// table's header, then the three value rows are parsed against that
    /// fixed axis. A country absent from all three tables yields an empty
    /// series rather than an error.
    pub fn from_source(files: &SourceFiles, country: &str) -> CovidResult<Self> {
        let days = source::header_dates(&files.confirmed)?;
        let confirmed = source::country_row(&files.confirmed, country)?;
        let deaths = source::country_row(&files.deaths, country)?;
        let recovered = source::country_row(&files.recovered, country)?;

        match (confirmed, deaths, recovered) {
            (None, None, None) => CaseSeries::new(
                country,
                None,
                Vec::new(),
                Vec::new(),
                Vec::new(),
                Vec::new(),
            ),
            (Some(confirmed), Some(deaths), Some(recovered)) => CaseSeries::new(
                country,
                confirmed.coords,
                days,
                confirmed.counts,
                recovered.counts,
                deaths.counts,
            ),
            _ => Err(CovidError::Validation(format!(
                "{country} is present in some source tables but missing from others"
            ))),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }

    pub fn confirmed(&self) -> &[f64] {
        &self.confirmed
    }

    pub fn recovered(&self) -> &[f64] {
        &self.recovered
    }

    pub fn deaths(&self) -> &[f64] {
        &self.deaths
    }

    pub fn still_infected(&self) -> &[f64] {
        &self.still_infected
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    /// Half-open index interval into the aligned sequences for an optional
    /// date range.
    pub fn time_range_indices(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> (usize, usize) {
        dates::resolve_range(&self.days, start, end)
    }
}
