//! CLI integration tests for config-driven wiring.
//!
//! Tests cover:
//! - Config loading from INI files on disk
//! - Currency policy, pivot and timeout resolution
//! - Dashboard and proxy settings with defaults
//! - Rate provider selection (CSV file vs live API)

use finsight::adapters::file_config_adapter::FileConfigAdapter;
use finsight::cli::{self, Cli, Command};
use finsight::domain::currency::UnknownCurrencyPolicy;
use finsight::domain::error::FinsightError;
use finsight::ports::rate_port::RateSource;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[currency]
pivot = eur
unknown_code = reject

[news]
api_key = test-key
category = forex
limit = 3

[dashboard]
stocks = nvda, amd
indices = ^GSPC
chart_symbol = ^ixic
chart_days = 14
headlines = 4

[http]
timeout_secs = 3

[web]
listen = 0.0.0.0:8080
"#;

fn same_exit_code(actual: ExitCode, expected: ExitCode) -> bool {
    // ExitCode has no PartialEq; compare the Debug form.
    format!("{actual:?}") == format!("{expected:?}")
}

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

#[test]
fn load_config_reads_file() {
    let file = write_temp_file(VALID_INI);
    let adapter = cli::load_config(&file.path().to_path_buf()).unwrap();
    assert_eq!(cli::pivot_currency(&adapter), "EUR");
}

#[test]
fn load_config_missing_file_is_config_exit_code() {
    let result = cli::load_config(&PathBuf::from("/nonexistent/finsight.ini"));
    assert!(result.is_err());
}

#[test]
fn load_optional_config_without_path_uses_defaults() {
    let adapter = cli::load_optional_config(None).unwrap();
    assert_eq!(cli::pivot_currency(&adapter), "USD");
    assert_eq!(cli::timeout_secs(&adapter), 10);
    assert_eq!(cli::news_category(&adapter), "general");
}

#[test]
fn load_optional_config_rejects_invalid_file() {
    let file = write_temp_file("[dashboard]\nchart_days = 1000\n");
    assert!(cli::load_optional_config(Some(&file.path().to_path_buf())).is_err());
}

#[test]
fn currency_policy_from_config() {
    assert_eq!(
        cli::build_currency_policy(&config(VALID_INI)).unwrap(),
        UnknownCurrencyPolicy::Reject
    );
    assert_eq!(
        cli::build_currency_policy(&config("")).unwrap(),
        UnknownCurrencyPolicy::Fallback
    );
    let err = cli::build_currency_policy(&config("[currency]\nunknown_code = maybe\n")).unwrap_err();
    assert!(matches!(err, FinsightError::ConfigInvalid { ref key, .. } if key == "unknown_code"));
}

#[test]
fn timeout_and_limits_from_config() {
    let adapter = config(VALID_INI);
    assert_eq!(cli::timeout_secs(&adapter), 3);
    assert_eq!(cli::news_limit(&adapter), 3);
    assert_eq!(cli::news_category(&adapter), "forex");
}

#[test]
fn dashboard_config_from_ini() {
    let dashboard = cli::build_dashboard_config(&config(VALID_INI));
    assert_eq!(dashboard.stocks, vec!["NVDA".to_string(), "AMD".to_string()]);
    assert_eq!(dashboard.indices, vec!["^GSPC".to_string()]);
    assert_eq!(dashboard.chart_symbol, "^IXIC");
    assert_eq!(dashboard.chart_days, 14);
    assert_eq!(dashboard.headlines, 4);
    assert_eq!(dashboard.news_category, "forex");
}

#[test]
fn dashboard_config_defaults() {
    let dashboard = cli::build_dashboard_config(&config(""));
    assert_eq!(dashboard.stocks, vec!["AAPL", "GOOGL", "MSFT", "TSLA"]);
    assert_eq!(dashboard.indices, vec!["^GSPC", "^DJI", "^IXIC"]);
    assert_eq!(dashboard.chart_symbol, "^GSPC");
    assert_eq!(dashboard.chart_days, 30);
    assert_eq!(dashboard.headlines, 8);
}

#[test]
fn listen_addr_default_and_configured() {
    assert_eq!(
        cli::listen_addr(&config("")).unwrap().to_string(),
        "127.0.0.1:5000"
    );
    assert_eq!(
        cli::listen_addr(&config(VALID_INI)).unwrap().to_string(),
        "0.0.0.0:8080"
    );
    assert!(cli::listen_addr(&config("[web]\nlisten = nowhere\n")).is_err());
}

#[test]
fn finnhub_adapter_requires_api_key() {
    assert!(cli::build_finnhub_adapter(&config(VALID_INI)).is_ok());
    let err = cli::build_finnhub_adapter(&config("[news]\ncategory = general\n")).err().unwrap();
    assert!(matches!(err, FinsightError::ConfigMissing { ref key, .. } if key == "api_key"));
}

#[tokio::test]
async fn rates_file_selects_csv_provider() {
    let rates = write_temp_file("code,rate\nUSD,1.0\nEUR,0.5\nINR,80.0\n");
    let ini = format!(
        "[currency]\npivot = USD\nrates_file = {}\n",
        rates.path().display()
    );
    let port = cli::build_rate_port(&config(&ini));
    let table = port.latest_rates("EUR").await.unwrap();
    assert_eq!(table.pivot(), "EUR");
    assert_eq!(table.get("EUR"), Some(1.0));
    approx::assert_relative_eq!(table.get("INR").unwrap(), 160.0);
    assert_eq!(port.last_source(), Some(RateSource::File));
}

#[tokio::test]
async fn unreachable_api_falls_back_to_builtin_rates() {
    let port = cli::build_rate_port(&config(
        "[currency]\napi_url = http://127.0.0.1:9/latest/\n[http]\ntimeout_secs = 1\n",
    ));
    let table = port.latest_rates("USD").await.unwrap();
    assert_eq!(table.get("INR"), Some(83.2));
    assert_eq!(table.len(), 15);
    assert_eq!(port.last_source(), Some(RateSource::Fallback));
    assert_eq!(RateSource::Fallback.label(), "built-in fallback rates");

    let table = port.latest_rates("NZD").await.unwrap();
    assert_eq!(table.pivot(), "USD");
}

#[test]
fn cli_parses_subcommands() {
    let cli = Cli::try_parse_from(["finsight", "sip", "-m", "10000", "-y", "5"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Sip { monthly: Some(ref m), years: Some(ref y), rate: None, .. } if m == "10000" && y == "5"
    ));

    let cli = Cli::try_parse_from(["finsight", "convert", "100", "usd", "inr"]).unwrap();
    assert!(matches!(cli.command, Command::Convert { ref from, .. } if from == "usd"));

    let cli = Cli::try_parse_from(["finsight", "quote", "AAPL", "MSFT"]).unwrap();
    assert!(matches!(cli.command, Command::Quote { ref symbols, .. } if symbols.len() == 2));

    assert!(Cli::try_parse_from(["finsight", "serve"]).is_err());
}

#[test]
fn sip_command_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let chart = dir.path().join("growth.svg");
    let csv = dir.path().join("series.csv");
    let cli = Cli {
        command: Command::Sip {
            monthly: Some("5000".to_string()),
            years: Some("3".to_string()),
            rate: Some("12".to_string()),
            chart: Some(chart.clone()),
            csv: Some(csv.clone()),
        },
    };
    assert!(same_exit_code(cli::run(cli), ExitCode::SUCCESS));
    assert!(std::fs::read_to_string(&chart).unwrap().starts_with("<svg"));
    let rows = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(rows.lines().count(), 4);
}

#[test]
fn sip_command_rejects_bad_input() {
    let cli = Cli {
        command: Command::Sip {
            monthly: Some("-5".to_string()),
            years: None,
            rate: None,
            chart: None,
            csv: None,
        },
    };
    assert!(same_exit_code(cli::run(cli), ExitCode::from(4)));
}

#[test]
fn validate_command_accepts_valid_file() {
    let file = write_temp_file(VALID_INI);
    let cli = Cli {
        command: Command::Validate {
            config: file.path().to_path_buf(),
        },
    };
    assert!(same_exit_code(cli::run(cli), ExitCode::SUCCESS));
}

#[test]
fn validate_command_rejects_invalid_file() {
    let file = write_temp_file("[currency]\npivot = DOLLARS\n");
    let cli = Cli {
        command: Command::Validate {
            config: file.path().to_path_buf(),
        },
    };
    assert!(same_exit_code(cli::run(cli), ExitCode::from(2)));
}
