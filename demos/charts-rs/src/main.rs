mod charts;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use covid_ts::{CaseSeries, Config, OutbreakModel, Scenario, Schedule, SeriesCollection, export};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Chart daily COVID-19 case counts and what-if scenarios")]
struct Cli {
    /// Run configuration: a TOML file, or `-` to read JSON from stdin
    #[arg(long, default_value = "covid.toml")]
    config: PathBuf,

    /// Override the configured output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time-series chart for one country
    Series {
        country: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Subplot grid over every configured country
    Overview {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Two countries side by side in one chart
    Compare {
        first: String,
        second: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Doubling-time bars over an interval for one country
    Doubling {
        country: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        window: u32,
    },
    /// Doubling-time ranking across the configured countries
    Ranking {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        window: u32,
    },
    /// Synthetic scenario charted against one country's real curve
    Simulate {
        country: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        window: u32,
    },
    /// Dump per-country series and the ranking as CSV files
    Export {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        window: u32,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let config = if cli.config.as_os_str() == "-" {
        Config::from_json_stdin()?
    } else {
        Config::from_toml_file(&cli.config)
            .with_context(|| format!("reading {}", cli.config.display()))?
    };
    let out_dir = cli
        .out_dir
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("charts"));
    std::fs::create_dir_all(&out_dir)?;

    let files = config.source_files();
    let collection = SeriesCollection::from_countries(&files, &config.countries)?;

    match cli.command {
        Command::Series { country, from, to } => {
            let series = lookup(&collection, &country)?;
            write_chart(&charts::series_chart(series, from, to), &out_dir, &country)?;
        }
        Command::Overview { from, to } => {
            let path = out_dir.join("overview.html");
            std::fs::write(&path, charts::overview_page(&collection, from, to))?;
            info!(path = %path.display(), "wrote chart");
        }
        Command::Compare {
            first,
            second,
            from,
            to,
        } => {
            let first_series = lookup(&collection, &first)?;
            let second_series = lookup(&collection, &second)?;
            write_chart(
                &charts::comparison_chart(first_series, second_series, from, to),
                &out_dir,
                &format!("{first}_vs_{second}"),
            )?;
        }
        Command::Doubling {
            country,
            from,
            to,
            window,
        } => {
            let series = lookup(&collection, &country)?;
            write_chart(
                &charts::doubling_chart(series, from, to, window),
                &out_dir,
                &format!("{country}_doubling"),
            )?;
        }
        Command::Ranking { date, window } => {
            let ranking = collection.doubling_time_ranking(date, window);
            let heading = match date {
                Some(date) => format!("Doubling times on {date}"),
                None => "Latest doubling times".to_owned(),
            };
            write_chart(&charts::ranking_chart(&ranking, &heading), &out_dir, "ranking")?;
        }
        Command::Simulate {
            country,
            from,
            to,
            window,
        } => {
            let series = lookup(&collection, &country)?;
            let scenario = match &config.scenario {
                Some(scenario_config) => {
                    let origin = first_day(series)?;
                    scenario_config.to_scenario(origin)?
                }
                // No configured scenario: replay the real curve's own
                // doubling times.
                None => derived_scenario(series, from, to, window)?,
            };
            let simulated = OutbreakModel::simulate(series.days().to_vec(), &scenario)?;
            write_chart(
                &charts::comparison_chart(series, &simulated, from, to),
                &out_dir,
                &format!("{country}_simulated"),
            )?;
        }
        Command::Export { date, window } => {
            for series in collection.records() {
                let path = export::write_series_csv(&out_dir, series)?;
                info!(path = %path.display(), "wrote series");
            }
            let ranking = collection.doubling_time_ranking(date, window);
            let path = export::write_ranking_csv(&out_dir, &ranking)?;
            info!(path = %path.display(), "wrote ranking");
        }
    }
    Ok(())
}

fn lookup<'a>(collection: &'a SeriesCollection, country: &str) -> anyhow::Result<&'a CaseSeries> {
    collection
        .get(country)
        .with_context(|| format!("{country} is not in the configured country list"))
}

fn first_day(series: &CaseSeries) -> anyhow::Result<NaiveDate> {
    series
        .days()
        .first()
        .copied()
        .with_context(|| format!("{} has no data to anchor a scenario on", series.country()))
}

fn derived_scenario(
    series: &CaseSeries,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    window: u32,
) -> anyhow::Result<Scenario> {
    let origin = first_day(series)?;
    let entries = series.doubling_time_schedule(from, to, window);
    if entries.is_empty() {
        bail!("no usable doubling times to derive a scenario from");
    }
    let schedule = Schedule::from_doubling_times(origin, &entries)?;
    Ok(Scenario {
        name: format!("{} (simulated)", series.country()),
        schedule,
        mortality: 0.045,
        days_to_recovery: 12.65,
        extrapolate_to: None,
    })
}

fn write_chart(plot: &plotly::Plot, out_dir: &Path, stem: &str) -> anyhow::Result<()> {
    let path = out_dir.join(format!("{}.html", export::slug(stem)));
    plot.to_html(&path);
    info!(path = %path.display(), "wrote chart");
    Ok(())
}
