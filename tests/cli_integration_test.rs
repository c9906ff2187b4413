//! CLI-level tests: config merging, file-backed comparison and CSV output.

use compounder::adapters::csv_adapter::CsvPriceAdapter;
use compounder::adapters::file_config_adapter::FileConfigAdapter;
use compounder::cli::{
    build_market_data, build_projection_parameters, load_config, run, run_comparison, Cli,
    Command, MarketDataSource, ProjectionOverrides,
};
use compounder::domain::error::CompounderError;
use compounder::domain::frequency::Frequency;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;
use tempfile::TempDir;

const PROJECTION_INI: &str = r#"
[projection]
initial_deposit = 10000
years = 20
rate_of_return = 7.5
compound_frequency = annually
contribution_amount = 250
contribution_frequency = Monthly
"#;

fn write_prices(dir: &TempDir, symbol: &str, rows: &[(&str, f64)]) {
    let mut content = String::from("datetime,close\n");
    for (date, close) in rows {
        content.push_str(&format!("{date},{close}\n"));
    }
    fs::write(dir.path().join(format!("{symbol}.csv")), content).unwrap();
}

#[test]
fn projection_parameters_from_config() {
    let config = FileConfigAdapter::from_string(PROJECTION_INI).unwrap();
    let params = build_projection_parameters(&config, &ProjectionOverrides::default()).unwrap();

    assert_eq!(params.initial_deposit, 10000.0);
    assert_eq!(params.years, 20);
    assert_eq!(params.annual_rate_percent, 7.5);
    assert_eq!(params.compound_frequency, Frequency::Annually);
    assert_eq!(params.contribution_amount, 250.0);
    assert_eq!(params.contribution_frequency, Frequency::Monthly);
}

#[test]
fn overrides_take_precedence_over_config() {
    let config = FileConfigAdapter::from_string(PROJECTION_INI).unwrap();
    let overrides = ProjectionOverrides {
        years: Some(5),
        rate: Some(-2.0),
        compound_frequency: Some("monthly".into()),
        ..Default::default()
    };
    let params = build_projection_parameters(&config, &overrides).unwrap();

    assert_eq!(params.years, 5);
    assert_eq!(params.annual_rate_percent, -2.0);
    assert_eq!(params.compound_frequency, Frequency::Monthly);
    assert_eq!(params.initial_deposit, 10000.0);
}

#[test]
fn empty_config_uses_calculator_defaults() {
    let params =
        build_projection_parameters(&FileConfigAdapter::empty(), &ProjectionOverrides::default())
            .unwrap();

    assert_eq!(params.initial_deposit, 5000.0);
    assert_eq!(params.years, 10);
    assert_eq!(params.annual_rate_percent, 10.0);
    assert_eq!(params.compound_frequency, Frequency::Monthly);
    assert_eq!(params.contribution_amount, 100.0);
    assert_eq!(params.contribution_frequency, Frequency::Monthly);
}

#[test]
fn unknown_frequency_is_rejected() {
    let config = FileConfigAdapter::from_string(
        "[projection]\ncompound_frequency = weekly\n",
    )
    .unwrap();
    let err = build_projection_parameters(&config, &ProjectionOverrides::default()).unwrap_err();

    assert!(matches!(
        &err,
        CompounderError::InvalidInput { field, .. } if field == "compound_frequency"
    ));
    assert_eq!(ExitCode::from(&err), ExitCode::from(3));
}

#[test]
fn negative_years_in_config_is_rejected() {
    let config = FileConfigAdapter::from_string("[projection]\nyears = -1\n").unwrap();
    let err = build_projection_parameters(&config, &ProjectionOverrides::default()).unwrap_err();
    assert!(matches!(err, CompounderError::ConfigInvalid { .. }));
}

#[test]
fn load_config_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compounder.ini");
    fs::write(&path, PROJECTION_INI).unwrap();

    let config = load_config(&path).unwrap();
    let params = build_projection_parameters(&config, &ProjectionOverrides::default()).unwrap();
    assert_eq!(params.years, 20);
}

#[test]
fn load_config_missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("absent.ini")).err().unwrap();
    assert!(matches!(err, CompounderError::ConfigParse { .. }));
    assert_eq!(ExitCode::from(&err), ExitCode::from(2));
}

#[tokio::test]
async fn comparison_writes_aligned_csv() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "TSLA", &[("2024-01-03", 12.0), ("2024-01-01", 10.0)]);
    write_prices(&dir, "NVDA", &[("2024-01-02", 20.0)]);

    let port = CsvPriceAdapter::new(dir.path().to_path_buf());
    let mut out = Vec::new();
    run_comparison(port, Duration::from_secs(5), &["tsla", "nvda"], &mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "date,TSLA Closing Price,NVDA Closing Price\n\
         2024-01-01,10,\n\
         2024-01-02,,20\n\
         2024-01-03,12,\n"
    );
}

#[tokio::test]
async fn comparison_with_missing_symbol_fails_upstream() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "TSLA", &[("2024-01-01", 10.0)]);

    let port = CsvPriceAdapter::new(dir.path().to_path_buf());
    let mut out = Vec::new();
    let err = run_comparison(port, Duration::from_secs(5), &["TSLA", "XXXX"], &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, CompounderError::Upstream { symbol, .. } if symbol == "XXXX"));
    assert!(out.is_empty());
}

#[test]
fn csv_provider_builds_file_source() {
    let config =
        FileConfigAdapter::from_string("[market_data]\nprovider = csv\ndata_dir = /tmp/prices\n")
            .unwrap();
    assert!(matches!(
        build_market_data(&config).unwrap(),
        MarketDataSource::Csv(_)
    ));
}

#[cfg(feature = "http")]
#[test]
fn missing_api_key_leaves_output_untouched() {
    use compounder::adapters::twelve_data_adapter::API_KEY_ENV;

    // A key in the environment would satisfy the provider.
    if std::env::var(API_KEY_ENV).is_ok() {
        return;
    }

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("compounder.ini");
    fs::write(&config_path, "[market_data]\nprovider = twelve_data\n").unwrap();
    let output = dir.path().join("chart.csv");

    let code = run(Cli {
        command: Command::Compare {
            config: config_path,
            symbol: "TSLA".into(),
            compare_with: None,
            output: Some(output.clone()),
        },
    });

    assert_eq!(code, ExitCode::from(2));
    assert!(!output.exists());
}
