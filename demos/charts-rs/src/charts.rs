use chrono::NaiveDate;
use covid_ts::{CaseSeries, SeriesCollection, export::slug};
use plotly::common::{DashType, Font, Line, Marker, Title};
use plotly::layout::{Axis, AxisType, BarMode, Layout};
use plotly::{Bar, NamedColor, Plot, Scatter};

/// Time-series chart for one country: confirmed, recovered, deaths and
/// still-infected curves over the selected date range.
pub fn series_chart(series: &CaseSeries, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Plot {
    let (ix_start, ix_end) = series.time_range_indices(from, to);
    let labels = date_labels(series, ix_start, ix_end);
    let mut plot = Plot::new();
    plot.add_trace(trace(
        &labels,
        &series.confirmed()[ix_start..ix_end],
        "total confirmed",
        NamedColor::Red,
        DashType::Solid,
        1.0,
    ));
    plot.add_trace(trace(
        &labels,
        &series.recovered()[ix_start..ix_end],
        "total recovered",
        NamedColor::Green,
        DashType::Solid,
        1.0,
    ));
    plot.add_trace(trace(
        &labels,
        &series.deaths()[ix_start..ix_end],
        "total deaths",
        NamedColor::Black,
        DashType::Solid,
        1.0,
    ));
    plot.add_trace(trace(
        &labels,
        &series.still_infected()[ix_start..ix_end],
        "still infected",
        NamedColor::Blue,
        DashType::Solid,
        2.0,
    ));
    plot.set_layout(dated_layout(series.country(), "Number of cases"));
    plot
}

/// Two countries in one chart, the second in dark dash-dot variants.
pub fn comparison_chart(
    first: &CaseSeries,
    second: &CaseSeries,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Plot {
    let mut plot = Plot::new();
    add_country_traces(&mut plot, first, from, to, false);
    add_country_traces(&mut plot, second, from, to, true);
    plot.set_layout(dated_layout(
        &format!("{} vs. {}", first.country(), second.country()),
        "Cases",
    ));
    plot
}

/// Doubling-time bars over an interval; undefined entries are skipped,
/// not drawn.
pub fn doubling_chart(
    series: &CaseSeries,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    window: u32,
) -> Plot {
    let (labels, bars) = defined_doubling_bars(series, from, to, window);
    let mut plot = Plot::new();
    plot.add_trace(Bar::new(labels, bars).name("doubling time"));
    plot.set_layout(dated_layout(series.country(), "Doubling time (days)"));
    plot
}

/// Per-country doubling times for one date as a bar chart, widest first.
pub fn ranking_chart(ranking: &[(String, f64)], heading: &str) -> Plot {
    let (countries, values): (Vec<String>, Vec<f64>) = ranking
        .iter()
        .filter(|(_, value)| value.is_finite())
        .cloned()
        .unzip();
    let mut plot = Plot::new();
    plot.add_trace(
        Bar::new(countries, values)
            .name("doubling time")
            .marker(Marker::new().color(NamedColor::DarkGray)),
    );
    plot.set_layout(
        Layout::new()
            .bar_mode(BarMode::Group)
            .title(Title::new(heading).font(Font::new().size(24)))
            .y_axis(Axis::new().title(Title::new("Doubling time (days)"))),
    );
    plot
}

/// One page with a fixed grid of per-country subplots, shaped like the
/// single-figure overview: up to 3x3, wider collections wrap in rows of 3.
pub fn overview_page(
    collection: &SeriesCollection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> String {
    let (_, columns) = grid_shape(collection.len());
    let mut cells = String::new();
    for (ix, series) in collection.records().iter().enumerate() {
        let plot = series_chart(series, from, to);
        let div_id: &'static str =
            Box::leak(format!("{}-{ix}", slug(series.country())).into_boxed_str());
        cells.push_str(&format!(
            "<div class=\"cell\">{}</div>\n",
            plot.to_inline_html(Some(div_id))
        ));
    }
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <script src=\"https://cdn.plot.ly/plotly-latest.min.js\"></script>\n\
         <style>.grid {{ display: grid; grid-template-columns: repeat({columns}, 1fr); }}</style>\n\
         </head>\n<body>\n<div class=\"grid\">\n{cells}</div>\n</body>\n</html>\n"
    )
}

/// Subplot grid shape for `n` countries, as (rows, columns).
pub fn grid_shape(n: usize) -> (usize, usize) {
    match n {
        0..=1 => (1, 1),
        2 => (2, 1),
        3..=4 => (2, 2),
        5..=6 => (3, 2),
        7..=9 => (3, 3),
        n => (n.div_ceil(3), 3),
    }
}

/// Doubling-time bars with the undefined (non-finite or zero) dates removed.
pub(crate) fn defined_doubling_bars(
    series: &CaseSeries,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    window: u32,
) -> (Vec<String>, Vec<f64>) {
    let (ix_start, ix_end) = series.time_range_indices(from, to);
    let values = series.doubling_time_over(from, to, window);
    series.days()[ix_start..ix_end]
        .iter()
        .zip(values)
        .filter(|(_, value)| value.is_finite() && *value != 0.0)
        .map(|(day, value)| (day.to_string(), value))
        .unzip()
}

fn add_country_traces(
    plot: &mut Plot,
    series: &CaseSeries,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    second: bool,
) {
    let (ix_start, ix_end) = series.time_range_indices(from, to);
    let labels = date_labels(series, ix_start, ix_end);
    let (colors, dash, width) = if second {
        (
            [
                NamedColor::DarkRed,
                NamedColor::DarkGreen,
                NamedColor::Black,
                NamedColor::DarkBlue,
            ],
            DashType::DashDot,
            1.0,
        )
    } else {
        (
            [
                NamedColor::Red,
                NamedColor::Green,
                NamedColor::DarkGray,
                NamedColor::Blue,
            ],
            DashType::Solid,
            2.0,
        )
    };
    let country = series.country();
    let [color0, color1, color2, color3] = colors;
    plot.add_trace(trace(
        &labels,
        &series.confirmed()[ix_start..ix_end],
        &format!("{country} confirmed"),
        color0,
        dash.clone(),
        width,
    ));
    plot.add_trace(trace(
        &labels,
        &series.recovered()[ix_start..ix_end],
        &format!("{country} recovered"),
        color1,
        dash.clone(),
        width,
    ));
    plot.add_trace(trace(
        &labels,
        &series.deaths()[ix_start..ix_end],
        &format!("{country} deaths"),
        color2,
        dash.clone(),
        width,
    ));
    plot.add_trace(trace(
        &labels,
        &series.still_infected()[ix_start..ix_end],
        &format!("{country} still infected"),
        color3,
        dash,
        width,
    ));
}

fn trace(
    labels: &[String],
    values: &[f64],
    name: &str,
    color: NamedColor,
    dash: DashType,
    width: f64,
) -> Box<Scatter<String, f64>> {
    Scatter::new(labels.to_vec(), values.to_vec())
        .name(name)
        .line(Line::new().color(color).dash(dash).width(width))
}

fn date_labels(series: &CaseSeries, ix_start: usize, ix_end: usize) -> Vec<String> {
    series.days()[ix_start..ix_end]
        .iter()
        .map(|day| day.to_string())
        .collect()
}

fn dated_layout(title: &str, y_title: &str) -> Layout {
    Layout::new()
        .title(Title::new(title).font(Font::new().size(24)))
        .x_axis(Axis::new().type_(AxisType::Date).title(Title::new("Date")))
        .y_axis(Axis::new().title(Title::new(y_title)))
}

#[cfg(test)]
mod test {
    use chrono::Duration;
    use covid_ts::CaseSeries;

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
    fn grid_shape_matches_the_overview_table() {
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(2), (2, 1));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(6), (3, 2));
        assert_eq!(grid_shape(9), (3, 3));
        assert_eq!(grid_shape(11), (4, 3));
    }

    #[test]
    fn undefined_doubling_times_are_not_drawn() {
        // Two flat days, then doubling daily.
        let series = series("Testland", vec![1.0, 1.0, 2.0, 4.0, 8.0]);
        let (labels, bars) = defined_doubling_bars(&series, None, None, 1);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], "2020-01-24");
        assert!(bars.iter().all(|value| value.is_finite() && *value != 0.0));
    }

    #[test]
    fn overview_page_embeds_every_country_once() {
        let mut collection = covid_ts::SeriesCollection::default();
        collection.push(series("Germany", vec![1.0, 2.0]));
        collection.push(series("Italy", vec![2.0, 3.0]));
        let page = overview_page(&collection, None, None);
        assert!(page.contains("germany-0"));
        assert!(page.contains("italy-1"));
        assert!(page.contains("grid-template-columns: repeat(1, 1fr)"));
    }
}
