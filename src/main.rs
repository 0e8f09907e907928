use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vacation_time::calendar::WorkWeek;
use vacation_time::config::{Config, ConfigOverrides};
use vacation_time::holidays::{Country, Holiday, HolidayCache, HolidayProvider, NagerClient};
use vacation_time::optimizer::{optimize_vacation, OptimizeRequest, VacationOption};
use vacation_time::output::csv::{countries_to_csv, holidays_to_csv, options_to_csv};
use vacation_time::output::ics::generate_multi_ics;
use vacation_time::output::json::render_json;
use vacation_time::output::table::{
    render_countries_table, render_holidays_table, render_options_table,
};
use vacation_time::server::run_server;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "vacation-time",
    about = "Plan PTO around weekends and public holidays"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long = "api-url")]
    api_url: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank the best ways to spend a PTO budget.
    Optimize {
        #[arg(long)]
        country: Option<String>,
        #[arg(long = "pto-days")]
        pto_days: i32,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        subdivision: Option<String>,
        /// Comma-separated weekday numbers, 0 = Monday.
        #[arg(long = "work-days")]
        work_days: Option<WorkWeek>,
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Also write every returned option to this .ics file.
        #[arg(long)]
        ics: Option<PathBuf>,
    },
    /// List holidays for one country and year.
    Holidays {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        subdivision: Option<String>,
    },
    Countries,
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (country, subdivision, work_days) = match &cli.command {
        Commands::Optimize {
            country,
            subdivision,
            work_days,
            ..
        } => (country.clone(), subdivision.clone(), *work_days),
        Commands::Holidays {
            country,
            subdivision,
            ..
        } => (country.clone(), subdivision.clone(), None),
        _ => (None, None, None),
    };
    config.apply_overrides(ConfigOverrides {
        base_url: cli.api_url.clone(),
        country,
        subdivision,
        work_days,
    });

    match &cli.command {
        Commands::Config { init, show } => {
            handle_config_command(*init, *show, &config, &config_path)?;
        }
        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let bind = format!("{host}:{port}");
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await?;
        }
        Commands::Countries => {
            let provider = build_provider(&config);
            let countries = provider.countries().await?;
            print_countries(&countries, cli.output)?;
        }
        Commands::Holidays { year, .. } => {
            let provider = build_provider(&config);
            let country = require_country(&config)?;
            let year = year.unwrap_or_else(|| Utc::now().year());
            let holidays = provider
                .holidays(&country, year, config.schedule.subdivision.as_deref())
                .await?;
            print_holidays(&holidays, cli.output)?;
        }
        Commands::Optimize {
            pto_days,
            start,
            end,
            top,
            ics,
            ..
        } => {
            let provider = build_provider(&config);
            let request = OptimizeRequest {
                country: require_country(&config)?,
                subdivision: config.schedule.subdivision.clone(),
                pto_days: *pto_days,
                work_days: config
                    .schedule
                    .work_days
                    .days()
                    .into_iter()
                    .map(i64::from)
                    .collect(),
                start_date: *start,
                end_date: *end,
                max_results: Some((*top).min(config.optimizer.max_results)),
            };
            let response = optimize_vacation(&provider, &request, &config.optimizer).await?;
            if let Some(path) = ics {
                write_ics(path, &response.options)?;
            }
            print_options(&response.options, cli.output)?;
        }
    }

    Ok(())
}

fn build_provider(config: &Config) -> HolidayProvider {
    let source = Arc::new(NagerClient::new(config.holidays.base_url.clone()));
    let cache = Arc::new(HolidayCache::with_ttl_secs(config.holidays.cache_ttl_secs));
    HolidayProvider::new(source, cache)
}

fn require_country(config: &Config) -> Result<String> {
    config
        .schedule
        .country
        .clone()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| anyhow!("no country given; pass --country or set schedule.country"))
}

fn handle_config_command(init: bool, show: bool, config: &Config, config_path: &Path) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn write_ics(path: &Path, options: &[VacationOption]) -> Result<()> {
    let ics = generate_multi_ics(options, Utc::now());
    std::fs::write(path, ics)
        .with_context(|| format!("failed writing calendar file: {}", path.display()))?;
    info!(path = %path.display(), events = options.len(), "wrote calendar");
    Ok(())
}

fn print_options(options: &[VacationOption], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if options.is_empty() {
                println!("No vacation options found for this budget and range.");
            } else {
                println!("{}", render_options_table(options));
            }
        }
        OutputFormat::Json => println!("{}", render_json(options)?),
        OutputFormat::Csv => print!("{}", options_to_csv(options)?),
    }
    Ok(())
}

fn print_holidays(holidays: &[Holiday], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_holidays_table(holidays)),
        OutputFormat::Json => println!("{}", render_json(holidays)?),
        OutputFormat::Csv => print!("{}", holidays_to_csv(holidays)?),
    }
    Ok(())
}

fn print_countries(countries: &[Country], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_countries_table(countries)),
        OutputFormat::Json => println!("{}", render_json(countries)?),
        OutputFormat::Csv => print!("{}", countries_to_csv(countries)?),
    }
    Ok(())
}
