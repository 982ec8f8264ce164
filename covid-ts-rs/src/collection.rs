use chrono::NaiveDate;

use crate::error::CovidResult;
use crate::series::CaseSeries;
use crate::source::SourceFiles;

/// Ordered, append-only registry of per-country series.
///
/// Iteration order is insertion order; subplot layouts depend on it.
/// Duplicate country names may coexist, and lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct SeriesCollection {
    countries: Vec<String>,
    records: Vec<CaseSeries>,
}

impl SeriesCollection {
    /// Load one series per country name from the source tables. Any single
    /// failed load aborts the whole build.
    pub fn from_countries<S: AsRef<str>>(files: &SourceFiles, names: &[S]) -> CovidResult<Self> {
        let mut collection = SeriesCollection::default();
        for name in names {
            collection.push(CaseSeries::from_source(files, name.as_ref())?);
        }
        Ok(collection)
    }

    /// Append a series, typically a simulated one.
    pub fn push(&mut self, series: CaseSeries) {
        self.countries.push(series.country().to_owned());
        self.records.push(series);
    }

    /// First series registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&CaseSeries> {
        self.records.iter().find(|series| series.country() == name)
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn records(&self) -> &[CaseSeries] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Doubling time of every member on `date` (each member's own last day
    /// when `None`), sorted descending by value. Undefined values are kept,
    /// unlike the per-series schedule variant.
    pub fn doubling_time_ranking(
        &self,
        date: Option<NaiveDate>,
        window: u32,
    ) -> Vec<(String, f64)> {
        let mut ranking: Vec<(String, f64)> = self
            .records
            .iter()
            .map(|series| {
                let value = match date.or_else(|| series.last_day()) {
                    Some(day) => series.doubling_time_on(day, window),
                    None => f64::NAN,
                };
                (series.country().to_owned(), value)
            })
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;
    use crate::source::fixtures::tables;

    const TOLERANCE: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(name: &str, confirmed: Vec<f64>) -> CaseSeries {
        let days = (0..confirmed.len())
            .map(|ix| date(2020, 1, 22) + Duration::days(ix as i64))
            .collect();
        let zeros = vec![0.0; confirmed.len()];
        CaseSeries::new(name, None, days, confirmed, zeros.clone(), zeros).unwrap()
    }

    #[test]
    fn builds_in_the_given_order() {
        let (_dir, files) = tables(
            &[",Germany,51.0,9.0,1,2,4,8", ",Italy,41.9,12.6,2,3,5,9"],
            &[",Germany,51.0,9.0,0,0,0,0", ",Italy,41.9,12.6,0,0,0,0"],
            &[",Germany,51.0,9.0,0,0,0,0", ",Italy,41.9,12.6,0,0,0,0"],
        );
        let collection = SeriesCollection::from_countries(&files, &["Italy", "Germany"]).unwrap();
        assert_eq!(collection.countries(), ["Italy", "Germany"]);
        assert_eq!(collection.records()[0].country(), "Italy");
    }

    #[test]
    fn unknown_country_still_joins_the_collection_empty() {
        let (_dir, files) = tables(
            &[",Germany,51.0,9.0,1,2,4,8"],
            &[",Germany,51.0,9.0,0,0,0,0"],
            &[",Germany,51.0,9.0,0,0,0,0"],
        );
        let collection =
            SeriesCollection::from_countries(&files, &["Germany", "Atlantis"]).unwrap();
        assert_eq!(collection.len(), 2);
        assert!(collection.get("Atlantis").unwrap().is_empty());
    }

    #[test]
    fn missing_source_table_aborts_the_whole_build() {
        let files = SourceFiles {
            confirmed: "/nonexistent/confirmed.csv".into(),
            recovered: "/nonexistent/recovered.csv".into(),
            deaths: "/nonexistent/deaths.csv".into(),
        };
        assert!(SeriesCollection::from_countries(&files, &["Germany"]).is_err());
    }

    #[test]
    fn append_then_lookup_returns_the_record() {
        let mut collection = SeriesCollection::default();
        let before = collection.len();
        collection.push(series("synthetic", vec![1.0, 2.0, 4.0]));
        assert_eq!(collection.len(), before + 1);
        let found = collection.get("synthetic").unwrap();
        assert_eq!(found.confirmed(), &[1.0, 2.0, 4.0]);
        assert!(collection.get("nowhere").is_none());
    }

    #[test]
    fn duplicates_coexist_and_lookup_prefers_the_first() {
        let mut collection = SeriesCollection::default();
        collection.push(series("Testland", vec![1.0]));
        collection.push(series("Testland", vec![2.0]));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("Testland").unwrap().confirmed(), &[1.0]);
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_undefined_values() {
        let mut collection = SeriesCollection::default();
        // Doubling every day, every 2 days, and not at all.
        collection.push(series("Fast", vec![1.0, 2.0, 4.0, 8.0]));
        collection.push(series(
            "Slow",
            (0..4).map(|ix| 2f64.powf(ix as f64 / 2.0)).collect(),
        ));
        collection.push(series("Flat", vec![3.0, 3.0, 3.0, 3.0]));
        let ranking = collection.doubling_time_ranking(None, 1);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].0, "Flat");
        assert!(ranking[0].1.is_infinite());
        assert_eq!(ranking[1].0, "Slow");
        assert!(f64::abs(ranking[1].1 - 2.0) < TOLERANCE);
        assert_eq!(ranking[2].0, "Fast");
        assert!(f64::abs(ranking[2].1 - 1.0) < TOLERANCE);
    }

    #[test]
    fn ranking_on_a_fixed_date() {
        let mut collection = SeriesCollection::default();
        collection.push(series("Fast", vec![1.0, 2.0, 4.0, 8.0]));
        let ranking = collection.doubling_time_ranking(Some(date(2020, 1, 23)), 1);
        assert!(f64::abs(ranking[0].1 - 1.0) < TOLERANCE);
    }
}
