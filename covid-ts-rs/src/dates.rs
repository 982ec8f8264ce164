use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::error::{CovidError, CovidResult};

/// Source table headers carry dates as `M/D/YY`.
const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

/// Parse one header token. The final header field of the published tables
/// sometimes carries a stray trailing character; retry without it.
pub fn parse_header_date(token: &str) -> CovidResult<NaiveDate> {
    NaiveDate::parse_from_str(token, HEADER_DATE_FORMAT)
        .or_else(|_| {
            let trimmed = match token.char_indices().last() {
                Some((ix, _)) => &token[..ix],
                None => token,
            };
            NaiveDate::parse_from_str(trimmed, HEADER_DATE_FORMAT)
        })
        .map_err(|err| CovidError::Parse(format!("bad header date {token:?}: {err}")))
}

/// Resolve optional date bounds to a half-open index interval into `days`.
///
/// `None` maps to the corresponding boundary; a bound past the end of the
/// axis falls back to the boundary with a warning instead of failing.
pub fn resolve_range(
    days: &[NaiveDate],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (usize, usize) {
    let ix_start = match start {
        Some(date) => match days.iter().position(|day| *day >= date) {
            Some(ix) => ix,
            None => {
                warn!(%date, "start date not found, using first date");
                0
            }
        },
        None => 0,
    };
    let ix_end = match end {
        Some(date) => match days.iter().position(|day| *day >= date) {
            Some(ix) => ix,
            None => {
                warn!(%date, "end date not found, using last date");
                days.len()
            }
        },
        None => days.len(),
    };
    (ix_start, ix_end)
}

/// Extend the axis one day at a time until it reaches `target`.
pub fn extend_to(days: &mut Vec<NaiveDate>, target: NaiveDate) {
    while let Some(last) = days.last().copied() {
        if last >= target {
            break;
        }
        days.push(last + Duration::days(1));
    }
}
