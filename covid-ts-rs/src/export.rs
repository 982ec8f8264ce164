use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CovidResult;
use crate::series::CaseSeries;

/// Write one series as `date,confirmed,recovered,deaths,still_infected`
/// rows. Returns the path written.
pub fn write_series_csv(dir: &Path, series: &CaseSeries) -> CovidResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", slug(series.country())));
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["date", "confirmed", "recovered", "deaths", "still_infected"])?;
    for ix in 0..series.days().len() {
        writer.write_record([
            series.days()[ix].to_string(),
            series.confirmed()[ix].to_string(),
            series.recovered()[ix].to_string(),
            series.deaths()[ix].to_string(),
            series.still_infected()[ix].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Write a doubling-time ranking as `country,doubling_time_days` rows.
pub fn write_ranking_csv(dir: &Path, ranking: &[(String, f64)]) -> CovidResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("doubling_time_ranking.csv");
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["country", "doubling_time_days"])?;
    for (country, value) in ranking {
        writer.write_record([country.as_str(), value.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(path)
}

/// File-name-safe version of a country name.
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn series(name: &str, confirmed: Vec<f64>) -> CaseSeries {
        let days = (0..confirmed.len())
            .map(|ix| {
                NaiveDate::from_ymd_opt(2020, 1, 22).unwrap() + Duration::days(ix as i64)
            })
            .collect();
        let zeros = vec![0.0; confirmed.len()];
        CaseSeries::new(name, None, days, confirmed, zeros.clone(), zeros).unwrap()
    }

    #[test]
    fn series_csv_has_one_row_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_series_csv(dir.path(), &series("Korea, South", vec![1.0, 2.0])).unwrap();
        assert!(path.ends_with("korea__south.csv"));
        let raw = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,confirmed,recovered,deaths,still_infected");
        assert_eq!(lines[1], "2020-01-22,1,0,0,1");
    }

    #[test]
    fn ranking_csv_keeps_the_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let ranking = vec![
            ("Flat".to_owned(), f64::INFINITY),
            ("Fast".to_owned(), 1.0),
        ];
        let path = write_ranking_csv(dir.path(), &ranking).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines[1], "Flat,inf");
        assert_eq!(lines[2], "Fast,1");
    }
}
