//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::dashboard::Dashboard;
use crate::domain::config_validation::{
    validate_market_data_config, validate_projection_config, PROVIDER_CSV, PROVIDER_TWELVE_DATA,
};
use crate::domain::error::CompounderError;
use crate::domain::frequency::Frequency;
use crate::domain::identity::PasswordStrength;
use crate::domain::price_series::PriceObservation;
use crate::domain::projection::{current_year, project, ProjectionParameters, ProjectionResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use crate::ports::market_data_port::MarketDataPort;

const DEFAULT_TIMEOUT_SECS: i64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "compounder",
    about = "Compound interest projections and stock price comparison"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project investment growth year by year
    Project {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        initial_deposit: Option<f64>,
        #[arg(long)]
        years: Option<u32>,
        /// Estimated annual rate of return, in percent
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<f64>,
        #[arg(long)]
        compound_frequency: Option<String>,
        #[arg(long)]
        contribution: Option<f64>,
        #[arg(long)]
        contribution_frequency: Option<String>,
        /// Year the first projected year is counted from (defaults to this year)
        #[arg(long)]
        base_year: Option<i32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare historical daily closing prices
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long = "with")]
        compare_with: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rate a password read from stdin
    PasswordStrength,
}

/// Command-line values that take precedence over `[projection]`.
#[derive(Debug, Default, Clone)]
pub struct ProjectionOverrides {
    pub initial_deposit: Option<f64>,
    pub years: Option<u32>,
    pub rate: Option<f64>,
    pub compound_frequency: Option<String>,
    pub contribution: Option<f64>,
    pub contribution_frequency: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Project {
            config,
            initial_deposit,
            years,
            rate,
            compound_frequency,
            contribution,
            contribution_frequency,
            base_year,
            output,
        } => {
            let overrides = ProjectionOverrides {
                initial_deposit,
                years,
                rate,
                compound_frequency,
                contribution,
                contribution_frequency,
            };
            run_project(config.as_deref(), &overrides, base_year, output.as_deref())
        }
        Command::Compare {
            config,
            symbol,
            compare_with,
            output,
        } => run_compare(&config, &symbol, compare_with.as_deref(), output.as_deref()),
        Command::PasswordStrength => run_password_strength(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CompounderError> {
    log::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn parse_frequency(value: &str, key: &str) -> Result<Frequency, CompounderError> {
    value.parse().map_err(|_| {
        CompounderError::invalid_input(key, format!("'{value}' is not Monthly or Annually"))
    })
}

/// Merge `[projection]` with command-line overrides. Missing values take the
/// calculator defaults.
pub fn build_projection_parameters(
    config: &dyn ConfigPort,
    overrides: &ProjectionOverrides,
) -> Result<ProjectionParameters, CompounderError> {
    let defaults = ProjectionParameters::default();

    let years = match overrides.years {
        Some(y) => y,
        None => {
            let raw = config.get_int("projection", "years", defaults.years as i64);
            u32::try_from(raw).map_err(|_| CompounderError::ConfigInvalid {
                section: "projection".into(),
                key: "years".into(),
                reason: "years must be a non-negative whole number".into(),
            })?
        }
    };

    let compound_text = overrides.compound_frequency.clone().unwrap_or_else(|| {
        config.get_string_or(
            "projection",
            "compound_frequency",
            &defaults.compound_frequency.to_string(),
        )
    });
    let contribution_text = overrides.contribution_frequency.clone().unwrap_or_else(|| {
        config.get_string_or(
            "projection",
            "contribution_frequency",
            &defaults.contribution_frequency.to_string(),
        )
    });

    let params = ProjectionParameters {
        initial_deposit: overrides.initial_deposit.unwrap_or_else(|| {
            config.get_double("projection", "initial_deposit", defaults.initial_deposit)
        }),
        years,
        annual_rate_percent: overrides.rate.unwrap_or_else(|| {
            config.get_double("projection", "rate_of_return", defaults.annual_rate_percent)
        }),
        compound_frequency: parse_frequency(&compound_text, "compound_frequency")?,
        contribution_amount: overrides.contribution.unwrap_or_else(|| {
            config.get_double(
                "projection",
                "contribution_amount",
                defaults.contribution_amount,
            )
        }),
        contribution_frequency: parse_frequency(&contribution_text, "contribution_frequency")?,
    };
    params.validate()?;
    Ok(params)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, CompounderError> {
    match path {
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

pub fn print_projection_summary(result: &ProjectionResult) {
    eprintln!("\n=== Projection ===");
    eprintln!("Total Balance:    ${:.2}", result.final_balance);
    eprintln!("Principal:        ${:.2}", result.final_principal());
    eprintln!("Interest Earned:  ${:.2}", result.interest_earned());
}

fn run_project(
    config_path: Option<&Path>,
    overrides: &ProjectionOverrides,
    base_year: Option<i32>,
    output_path: Option<&Path>,
) -> Result<(), CompounderError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::empty(),
    };
    validate_projection_config(&config)?;

    let params = build_projection_parameters(&config, overrides)?;
    let base_year = base_year.unwrap_or_else(current_year);
    log::info!(
        "projecting {} years from {} at {}% ({} compounding, {} contributions)",
        params.years,
        base_year,
        params.annual_rate_percent,
        params.compound_frequency,
        params.contribution_frequency
    );

    let result = project(&params, base_year);
    print_projection_summary(&result);

    let mut out = open_output(output_path)?;
    CsvExportAdapter.write_projection(&result, &mut out)?;
    if let Some(path) = output_path {
        eprintln!("\nProjection written to: {}", path.display());
    }
    Ok(())
}

/// Fetch and align `symbols` through `port`, then export the chart.
pub async fn run_comparison<P: MarketDataPort>(
    port: P,
    timeout: Duration,
    symbols: &[&str],
    out: &mut dyn Write,
) -> Result<(), CompounderError> {
    let mut dashboard = Dashboard::new(port, timeout);
    let chart = dashboard.load_all(symbols).await?;

    eprintln!("\n=== Comparison ===");
    eprintln!("Dates:            {}", chart.labels.len());
    for series in &chart.series {
        eprintln!(
            "  {}:  {} closes, {} gaps",
            series.symbol,
            series.values.len() - series.missing_count(),
            series.missing_count()
        );
    }

    CsvExportAdapter.write_chart(chart, out)
}

/// The provider selected by `[market_data] provider`.
pub enum MarketDataSource {
    Csv(CsvPriceAdapter),
    #[cfg(feature = "http")]
    TwelveData(crate::adapters::twelve_data_adapter::TwelveDataAdapter),
}

impl MarketDataPort for MarketDataSource {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
    ) -> Result<Vec<PriceObservation>, CompounderError> {
        match self {
            MarketDataSource::Csv(port) => port.fetch_daily_closes(symbol).await,
            #[cfg(feature = "http")]
            MarketDataSource::TwelveData(port) => port.fetch_daily_closes(symbol).await,
        }
    }
}

/// Build the configured market data provider.
pub fn build_market_data(config: &dyn ConfigPort) -> Result<MarketDataSource, CompounderError> {
    let provider = config.get_string_or("market_data", "provider", PROVIDER_TWELVE_DATA);
    if provider == PROVIDER_CSV {
        let data_dir = config.get_string_or("market_data", "data_dir", ".");
        return Ok(MarketDataSource::Csv(CsvPriceAdapter::new(PathBuf::from(data_dir))));
    }

    #[cfg(feature = "http")]
    return Ok(MarketDataSource::TwelveData(
        crate::adapters::twelve_data_adapter::TwelveDataAdapter::from_config(config)?,
    ));

    #[cfg(not(feature = "http"))]
    return Err(CompounderError::ConfigInvalid {
        section: "market_data".into(),
        key: "provider".into(),
        reason: "http feature is required for twelve_data".into(),
    });
}

fn run_compare(
    config_path: &Path,
    symbol: &str,
    compare_with: Option<&str>,
    output_path: Option<&Path>,
) -> Result<(), CompounderError> {
    let config = load_config(config_path)?;
    validate_market_data_config(&config)?;

    let mut symbols = vec![symbol];
    if let Some(other) = compare_with {
        symbols.push(other);
    }

    let timeout_secs = config.get_int("market_data", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::from_secs(u64::try_from(timeout_secs).unwrap_or(10));

    // The output file is only created once the provider is usable.
    let port = build_market_data(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let mut out = open_output(output_path)?;
    runtime.block_on(run_comparison(port, timeout, &symbols, &mut out))?;

    if let Some(path) = output_path {
        eprintln!("\nChart data written to: {}", path.display());
    }
    Ok(())
}

fn run_password_strength() -> Result<(), CompounderError> {
    eprintln!("Enter password to rate:");
    let password = io::stdin().lock().lines().next().transpose()?.unwrap_or_default();
    let strength = PasswordStrength::of(&password);
    if strength == PasswordStrength::Empty {
        println!("(empty)");
    } else {
        println!("{}", strength.label());
    }
    Ok(())
}
