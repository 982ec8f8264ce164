use std::f64::consts::LN_2;

use chrono::{Duration, NaiveDate};

use crate::series::CaseSeries;

/// Convert a doubling time in days to a daily growth multiplier.
pub fn doubling_time_to_rate(doubling_time: f64) -> f64 {
    (LN_2 / doubling_time).exp()
}

/// Convert a daily growth multiplier to a doubling time in days.
pub fn rate_to_doubling_time(rate: f64) -> f64 {
    LN_2 / rate.ln()
}

impl CaseSeries {
    /// Doubling time of the confirmed count on `date`, averaged over a
    /// `window`-day look-back.
    ///
    /// With `nc1` and `nc2` the confirmed counts at the window's ends, the
    /// daily growth estimate is `1 + (nc2/nc1 - 1)/window` and the doubling
    /// time `ln(2)/ln(rate)`. Flat or shrinking counts and series boundaries
    /// produce infinite, NaN, zero or negative values; callers treat those as
    /// undefined for the date and skip them rather than plot them.
    pub fn doubling_time_on(&self, date: NaiveDate, window: u32) -> f64 {
        let (ix_start, ix_end) =
            self.time_range_indices(Some(date - Duration::days(window as i64)), Some(date));
        let confirmed = self.confirmed();
        if ix_start >= confirmed.len() || ix_end >= confirmed.len() {
            return f64::NAN;
        }
        let nc2 = confirmed[ix_end];
        let nc1 = confirmed[ix_start];
        let rate = 1.0 + (nc2 / nc1 - 1.0) / window as f64;
        LN_2 / rate.ln()
    }

    /// Doubling time for every date in the half-open range, aligned with
    /// `days[ix_start..ix_end]`. Degenerate values pass through unfiltered.
    pub fn doubling_time_over(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        window: u32,
    ) -> Vec<f64> {
        let (ix_start, ix_end) = self.time_range_indices(start, end);
        self.days()[ix_start..ix_end]
            .iter()
            .map(|day| self.doubling_time_on(*day, window))
            .collect()
    }

    /// Dated doubling times over the range, with undefined entries
    /// (non-finite or exactly zero) removed. The result can seed a
    /// simulation schedule.
    pub fn doubling_time_schedule(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        window: u32,
    ) -> Vec<(NaiveDate, f64)> {
        let (ix_start, ix_end) = self.time_range_indices(start, end);
        self.days()[ix_start..ix_end]
            .iter()
            .filter_map(|day| {
                let value = self.doubling_time_on(*day, window);
                if !value.is_finite() || value == 0.0 {
                    return None;
                }
                Some((*day, value))
            })
            .collect()
    }
}
