use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dates::parse_header_date;
use crate::error::{CovidError, CovidResult};

/// Column layout of the published tables: province/state, country/region,
/// latitude, longitude, then one column per day.
const DAY_COLUMNS_FROM: usize = 4;

/// The three parallel source tables.
#[derive(Debug, Clone)]
pub struct SourceFiles {
    pub confirmed: PathBuf,
    pub recovered: PathBuf,
    pub deaths: PathBuf,
}

impl SourceFiles {
    /// Standard layout: a clone of the CSSE `COVID-19` repository inside
    /// `root`, which sits next to this project's own directory.
    pub fn sibling_layout(root: impl AsRef<Path>) -> Self {
        let series_dir = root
            .as_ref()
            .join("COVID-19")
            .join("csse_covid_19_data")
            .join("csse_covid_19_time_series");
        SourceFiles {
            confirmed: series_dir.join("time_series_covid19_confirmed_global.csv"),
            recovered: series_dir.join("time_series_covid19_recovered_global.csv"),
            deaths: series_dir.join("time_series_covid19_deaths_global.csv"),
        }
    }
}

/// One country's row of a single table.
#[derive(Debug, Clone)]
pub(crate) struct CountryRow {
    pub coords: Option<(f64, f64)>,
    pub counts: Vec<f64>,
}

fn open_table(path: &Path) -> CovidResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|source| CovidError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

/// Parse the date axis from a table's header row (day columns only).
pub(crate) fn header_dates(path: &Path) -> CovidResult<Vec<NaiveDate>> {
    let mut reader = open_table(path)?;
    let headers = reader.headers()?.clone();
    headers
        .iter()
        .skip(DAY_COLUMNS_FROM)
        .map(parse_header_date)
        .collect()
}

/// Find the national aggregate row for `country`: the first row whose
/// sub-region field is empty and whose country field matches exactly.
/// A country without such a row is not an error.
pub(crate) fn country_row(path: &Path, country: &str) -> CovidResult<Option<CountryRow>> {
    let mut reader = open_table(path)?;
    for record in reader.records() {
        let record = record?;
        if record.get(0) != Some("") || record.get(1) != Some(country) {
            continue;
        }
        let coords = match (
            record.get(2).and_then(|cell| cell.trim().parse::<f64>().ok()),
            record.get(3).and_then(|cell| cell.trim().parse::<f64>().ok()),
        ) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        let counts = record
            .iter()
            .skip(DAY_COLUMNS_FROM)
            .map(|cell| {
                cell.trim().parse::<i64>().map(|n| n as f64).map_err(|err| {
                    CovidError::Parse(format!(
                        "bad count {cell:?} for {country} in {}: {err}",
                        path.display()
                    ))
                })
            })
            .collect::<CovidResult<Vec<f64>>>()?;
        return Ok(Some(CountryRow { coords, counts }));
    }
    Ok(None)
}


#[cfg(test)]
mod test {
    use std::io::Write;

    use super::fixtures::tables;
    use super::*;

    #[test]
    fn header_dates_from_day_columns() {
        let (_dir, files) = tables(&[], &[], &[]);
        let days = header_dates(&files.confirmed).unwrap();
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(days[3], NaiveDate::from_ymd_opt(2020, 1, 25).unwrap());
    }

    #[test]
    fn header_tolerates_stray_trailing_character() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confirmed.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "a,b,Lat,Long,1/22/20,1/23/20 \n,X,0.0,0.0,1,2\n").unwrap();
        drop(file);
        let days = header_dates(&path).unwrap();
        assert_eq!(days[1], NaiveDate::from_ymd_opt(2020, 1, 23).unwrap());
    }

    #[test]
    fn national_aggregate_row_only() {
        let (_dir, files) = tables(
            &["Bavaria,Germany,48.7,11.4,9,9,9,9", ",Germany,51.0,9.0,1,2,4,8"],
            &[],
            &[],
        );
        let row = country_row(&files.confirmed, "Germany").unwrap().unwrap();
        assert_eq!(row.counts, vec![1.0, 2.0, 4.0, 8.0]);
        assert_eq!(row.coords, Some((51.0, 9.0)));
    }

    #[test]
    fn quoted_country_names() {
        let (_dir, files) = tables(&[",\"Korea, South\",35.9,127.8,1,2,3,4"], &[], &[]);
        let row = country_row(&files.confirmed, "Korea, South").unwrap().unwrap();
        assert_eq!(row.counts, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn absent_country_is_not_an_error() {
        let (_dir, files) = tables(&[",Germany,51.0,9.0,1,2,4,8"], &[], &[]);
        assert!(country_row(&files.confirmed, "Atlantis").unwrap().is_none());
    }

    #[test]
    fn missing_table_is_fatal_with_layout_guidance() {
        let err = header_dates(Path::new("/nonexistent/confirmed.csv")).unwrap_err();
        assert!(matches!(err, CovidError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("COVID-19"));
    }

    #[test]
    fn malformed_count_cell() {
        let (_dir, files) = tables(&[",Germany,51.0,9.0,1,x,4,8"], &[], &[]);
        assert!(matches!(
            country_row(&files.confirmed, "Germany"),
            Err(CovidError::Parse(_))
        ));
    }
}
