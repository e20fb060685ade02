//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::chart_svg::{format_inr, price_line_svg, sip_growth_svg};
use crate::adapters::csv_export::write_yearly_series_file;
use crate::adapters::csv_rate_adapter::CsvRateAdapter;
use crate::adapters::exchange_rate_api::{self, ExchangeRateApiAdapter, FallbackRatePort};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::finnhub_news::{self, FinnhubNewsAdapter};
use crate::adapters::http::DEFAULT_TIMEOUT_SECS;
use crate::adapters::rss_news::{self, Rss2JsonNewsAdapter};
use crate::adapters::yahoo_quote::{self, YahooQuoteAdapter};
use crate::dashboard::{Dashboard, DashboardConfig, Panel};
use crate::domain::config_validation::{parse_symbols, validate_config};
use crate::domain::currency::{
    self, ConversionRequest, DEFAULT_PIVOT, UnknownCurrencyPolicy, currency_name, format_rate,
    parse_amount, popular_rates,
};
use crate::domain::error::FinsightError;
use crate::domain::greeting::greeting;
use crate::domain::news::{PROXY_ARTICLE_LIMIT, format_published, take_top};
use crate::domain::quote::{QuoteStatus, index_display_name};
use crate::domain::sip::{parse_projection_input, project};
use crate::ports::config_port::ConfigPort;
use crate::ports::news_port::NewsPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::rate_port::RatePort;

const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
const DEFAULT_NEWS_CATEGORY: &str = "general";

#[derive(Parser, Debug)]
#[command(name = "finsight", about = "Personal finance dashboard and SIP calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project the future value of a monthly SIP
    Sip {
        /// Monthly contribution (default 5000)
        #[arg(short, long)]
        monthly: Option<String>,
        /// Duration in years (default 10)
        #[arg(short, long)]
        years: Option<String>,
        /// Expected annual return in percent (default 12)
        #[arg(short, long)]
        rate: Option<String>,
        /// Write the growth chart as SVG
        #[arg(long)]
        chart: Option<PathBuf>,
        /// Write the yearly series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Convert an amount between currencies
    Convert {
        amount: String,
        from: String,
        to: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show popular exchange rates
    Rates {
        #[arg(long)]
        base: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Latest quotes for symbols (defaults to the dashboard stocks)
    Quote {
        symbols: Vec<String>,
        /// Write a price history chart of the first symbol as SVG
        #[arg(long)]
        chart: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Latest market headlines
    News {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Fetch every dashboard panel once and print it
    Dashboard {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the time-of-day greeting
    Greet,
    /// Start the news proxy server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Sip {
            monthly,
            years,
            rate,
            chart,
            csv,
        } => run_sip(
            monthly.as_deref(),
            years.as_deref(),
            rate.as_deref(),
            chart.as_ref(),
            csv.as_ref(),
        ),
        Command::Convert {
            amount,
            from,
            to,
            config,
        } => run_convert(&amount, &from, &to, config.as_ref()),
        Command::Rates { base, config } => run_rates(base.as_deref(), config.as_ref()),
        Command::Quote {
            symbols,
            chart,
            config,
        } => run_quote(&symbols, chart.as_ref(), config.as_ref()),
        Command::News {
            category,
            limit,
            config,
        } => run_news(category.as_deref(), limit, config.as_ref()),
        Command::Dashboard { config } => run_dashboard(config.as_ref()),
        Command::Greet => run_greet(),
        Command::Serve { config } => run_serve(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &FinsightError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FinsightError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

/// Config file when given, otherwise an empty config so every key takes its default.
pub fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = match path {
        Some(p) => load_config(p)?,
        None => FileConfigAdapter::from_string("").map_err(|reason| {
            fail(&FinsightError::ConfigParse {
                file: "<defaults>".to_string(),
                reason,
            })
        })?,
    };
    validate_config(&adapter).map_err(|e| fail(&e))?;
    Ok(adapter)
}

fn block_on<F: Future>(future: F) -> Result<F::Output, FinsightError> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn config_string(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn timeout_secs(config: &dyn ConfigPort) -> u64 {
    u64::try_from(config.get_int("http", "timeout_secs", DEFAULT_TIMEOUT_SECS as i64))
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

pub fn pivot_currency(config: &dyn ConfigPort) -> String {
    config_string(config, "currency", "pivot")
        .map(|p| p.to_ascii_uppercase())
        .unwrap_or_else(|| DEFAULT_PIVOT.to_string())
}

pub fn build_currency_policy(
    config: &dyn ConfigPort,
) -> Result<UnknownCurrencyPolicy, FinsightError> {
    match config_string(config, "currency", "unknown_code") {
        None => Ok(UnknownCurrencyPolicy::default()),
        Some(value) => value.parse().map_err(|reason| FinsightError::ConfigInvalid {
            section: "currency".to_string(),
            key: "unknown_code".to_string(),
            reason,
        }),
    }
}

/// CSV table when `rates_file` is set, otherwise the live API with the built-in fallback.
pub fn build_rate_port(config: &dyn ConfigPort) -> Box<dyn RatePort> {
    let pivot = pivot_currency(config);
    match config_string(config, "currency", "rates_file") {
        Some(path) => Box::new(CsvRateAdapter::new(PathBuf::from(path), &pivot)),
        None => {
            let url = config_string(config, "currency", "api_url")
                .unwrap_or_else(|| exchange_rate_api::DEFAULT_API_URL.to_string());
            Box::new(FallbackRatePort::new(ExchangeRateApiAdapter::new(
                &url,
                timeout_secs(config),
            )))
        }
    }
}

pub fn build_quote_port(config: &dyn ConfigPort) -> YahooQuoteAdapter {
    let url = config_string(config, "quotes", "base_url")
        .unwrap_or_else(|| yahoo_quote::DEFAULT_BASE_URL.to_string());
    YahooQuoteAdapter::new(&url, timeout_secs(config))
}

pub fn build_finnhub_adapter(config: &dyn ConfigPort) -> Result<FinnhubNewsAdapter, FinsightError> {
    let api_key =
        config_string(config, "news", "api_key").ok_or_else(|| FinsightError::ConfigMissing {
            section: "news".to_string(),
            key: "api_key".to_string(),
        })?;
    let url = config_string(config, "news", "base_url")
        .unwrap_or_else(|| finnhub_news::DEFAULT_BASE_URL.to_string());
    Ok(FinnhubNewsAdapter::new(&url, api_key, timeout_secs(config)))
}

pub fn build_feed_adapter(config: &dyn ConfigPort) -> Rss2JsonNewsAdapter {
    let url = config_string(config, "news", "feed_url")
        .unwrap_or_else(|| rss_news::DEFAULT_FEED_URL.to_string());
    Rss2JsonNewsAdapter::new(&url, timeout_secs(config))
}

/// Finnhub when an API key is configured, the RSS feed otherwise.
pub fn build_news_port(config: &dyn ConfigPort) -> Arc<dyn NewsPort> {
    match build_finnhub_adapter(config) {
        Ok(adapter) => Arc::new(adapter),
        Err(_) => Arc::new(build_feed_adapter(config)),
    }
}

pub fn news_category(config: &dyn ConfigPort) -> String {
    config_string(config, "news", "category").unwrap_or_else(|| DEFAULT_NEWS_CATEGORY.to_string())
}

pub fn news_limit(config: &dyn ConfigPort) -> usize {
    usize::try_from(config.get_int("news", "limit", PROXY_ARTICLE_LIMIT as i64))
        .unwrap_or(PROXY_ARTICLE_LIMIT)
}

pub fn build_dashboard_config(config: &dyn ConfigPort) -> DashboardConfig {
    let defaults = DashboardConfig::default();
    let symbols = |key: &str, fallback: Vec<String>| {
        config
            .get_string("dashboard", key)
            .map(|list| parse_symbols(&list))
            .filter(|list| !list.is_empty())
            .unwrap_or(fallback)
    };
    DashboardConfig {
        indices: symbols("indices", defaults.indices),
        stocks: symbols("stocks", defaults.stocks),
        chart_symbol: config_string(config, "dashboard", "chart_symbol")
            .map(|s| s.to_ascii_uppercase())
            .unwrap_or(defaults.chart_symbol),
        chart_days: u32::try_from(config.get_int("dashboard", "chart_days", 30))
            .unwrap_or(defaults.chart_days),
        headlines: usize::try_from(config.get_int("dashboard", "headlines", 8))
            .unwrap_or(defaults.headlines),
        news_category: news_category(config),
    }
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, FinsightError> {
    let listen = config_string(config, "web", "listen").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    listen.parse().map_err(|_| FinsightError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: format!("'{listen}' is not a socket address"),
    })
}

fn run_sip(
    monthly: Option<&str>,
    years: Option<&str>,
    rate: Option<&str>,
    chart_path: Option<&PathBuf>,
    csv_path: Option<&PathBuf>,
) -> ExitCode {
    let input = match parse_projection_input(
        monthly.unwrap_or(""),
        years.unwrap_or(""),
        rate.unwrap_or(""),
    ) {
        Ok(i) => i,
        Err(e) => return fail(&e),
    };
    let result = project(&input);

    println!(
        "Monthly {} for {} years at {}% p.a.",
        format_inr(input.monthly_contribution()),
        input.duration_years(),
        input.annual_rate_percent()
    );
    println!("  Total invested: {}", format_inr(result.total_invested));
    println!("  Total returns:  {}", format_inr(result.total_gain));
    println!("  Future value:   {}", format_inr(result.future_value));
    println!("  Gain on principal: {:.1}%", result.gain_ratio() * 100.0);

    if !result.yearly_series.is_empty() {
        println!("\n  {:>4}  {:>16}  {:>16}", "Year", "Invested", "Projected");
        for point in &result.yearly_series {
            println!(
                "  {:>4}  {:>16}  {:>16}",
                point.year,
                format_inr(point.invested),
                format_inr(point.projected_value)
            );
        }
    }

    if let Some(path) = chart_path {
        if let Err(e) = fs::write(path, sip_growth_svg(&result.yearly_series)) {
            return fail(&FinsightError::from(e));
        }
        eprintln!("Chart written to {}", path.display());
    }
    if let Some(path) = csv_path {
        if let Err(e) = write_yearly_series_file(path, &result.yearly_series) {
            return fail(&e);
        }
        eprintln!("Series written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_convert(amount: &str, from: &str, to: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let amount = match parse_amount(amount) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let policy = match build_currency_policy(&config) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let port = build_rate_port(&config);
    let pivot = pivot_currency(&config);

    let rates = match block_on(port.latest_rates(&pivot)).and_then(|r| r) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let request = ConversionRequest::new(amount, from, to);
    match currency::convert(&request, &rates, policy) {
        Ok(result) => {
            println!(
                "{:.2} {} = {:.2} {}",
                request.amount, request.from_currency, result.converted_amount, request.to_currency
            );
            println!(
                "1 {} = {} {}",
                request.from_currency,
                format_rate(result.effective_rate),
                request.to_currency
            );
            if let Some(source) = port.last_source() {
                println!("Using {}", source.label());
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_rates(base: Option<&str>, config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = build_rate_port(&config);
    let pivot = pivot_currency(&config);
    let base = base
        .map(|b| b.trim().to_ascii_uppercase())
        .unwrap_or_else(|| pivot.clone());

    let rates = match block_on(port.latest_rates(&pivot))
        .and_then(|r| r)
        .and_then(|table| table.rebased(&base))
    {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    match port.last_source() {
        Some(source) => println!("Popular rates (1 {base}, {}):", source.label()),
        None => println!("Popular rates (1 {base}):"),
    }
    for (code, rate) in popular_rates(&rates) {
        println!("  {code}  {:>14}  {}", format_rate(rate), currency_name(code));
    }
    ExitCode::SUCCESS
}

fn run_quote(
    symbols: &[String],
    chart_path: Option<&PathBuf>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let dashboard = build_dashboard_config(&config);
    let symbols: Vec<String> = if symbols.is_empty() {
        dashboard.stocks.clone()
    } else {
        symbols.iter().map(|s| s.trim().to_ascii_uppercase()).collect()
    };
    let port = build_quote_port(&config);

    let outcome = block_on(async {
        let mut statuses = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            statuses.push(QuoteStatus::from((symbol.clone(), port.quote(symbol).await)));
        }
        let history = match (chart_path, symbols.first()) {
            (Some(_), Some(first)) => Some(port.daily_closes(first, dashboard.chart_days).await),
            _ => None,
        };
        (statuses, history)
    });
    let (statuses, history) = match outcome {
        Ok(o) => o,
        Err(e) => return fail(&e),
    };

    print_quotes(&statuses);

    if let (Some(path), Some(history), Some(first)) = (chart_path, history, symbols.first()) {
        let points = match history {
            Ok(p) => p,
            Err(e) => return fail(&e),
        };
        if let Err(e) = fs::write(path, price_line_svg(index_display_name(first), &points)) {
            return fail(&FinsightError::from(e));
        }
        eprintln!("Chart written to {}", path.display());
    }

    if statuses.iter().all(|s| matches!(s, QuoteStatus::Unavailable { .. })) {
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn print_quotes(statuses: &[QuoteStatus]) {
    for status in statuses {
        match status {
            QuoteStatus::Available(q) => println!(
                "  {:<10} {:>12.2}  {}",
                index_display_name(&q.symbol),
                q.last_close,
                q.format_change()
            ),
            QuoteStatus::Unavailable { symbol, .. } => {
                println!("  {:<10} {:>12}  --", index_display_name(symbol), "N/A")
            }
        }
    }
}

fn run_news(
    category: Option<&str>,
    limit: Option<usize>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let category = category
        .map(str::to_string)
        .unwrap_or_else(|| news_category(&config));
    let limit = limit.unwrap_or_else(|| news_limit(&config));
    let port = build_news_port(&config);

    let articles = match block_on(port.fetch_news(&category)).and_then(|r| r) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    for article in take_top(articles, limit).iter().map(|a| a.for_display()) {
        println!("{}", article.headline);
        println!("  {}", article.summary);
        match article.published() {
            Some(at) => println!("  {} | {}", article.source, format_published(&at)),
            None => println!("  {}", article.source),
        }
        if !article.url.is_empty() {
            println!("  {}", article.url);
        }
        println!();
    }
    ExitCode::SUCCESS
}

fn run_dashboard(config_path: Option<&PathBuf>) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let quotes: Arc<dyn QuotePort> = Arc::new(build_quote_port(&config));
    let news: Arc<dyn NewsPort> = Arc::new(build_feed_adapter(&config));
    let mut dashboard = Dashboard::new(quotes, news, build_dashboard_config(&config));

    let settled = block_on(async {
        dashboard.refresh();
        dashboard.settle().await;
    });
    if let Err(e) = settled {
        return fail(&e);
    }

    let now = Local::now();
    println!("{}  {}\n", greeting(now.time()), now.format("%A, %B %d, %Y"));

    println!("Market indices");
    print_quote_panel(&dashboard.indices);
    println!("\nStocks");
    print_quote_panel(&dashboard.stocks);

    let chart_config = dashboard.config();
    println!(
        "\n{} ({} days)",
        index_display_name(&chart_config.chart_symbol),
        chart_config.chart_days
    );
    match &dashboard.chart {
        Panel::Ready(points) => match (points.first(), points.last()) {
            (Some(first), Some(last)) => println!(
                "  {} {:.2} -> {} {:.2}",
                first.date, first.close, last.date, last.close
            ),
            _ => println!("  No data available"),
        },
        Panel::Failed(message) => println!("  Chart unavailable: {message}"),
        Panel::Loading => println!("  Loading..."),
    }

    println!("\nFinancial news");
    match &dashboard.headlines {
        Panel::Ready(articles) if articles.is_empty() => println!("  No news available"),
        Panel::Ready(articles) => {
            for article in articles {
                println!("  - {} ({})", article.headline, article.source);
            }
        }
        Panel::Failed(message) => println!("  Unable to load news: {message}"),
        Panel::Loading => println!("  Loading..."),
    }
    ExitCode::SUCCESS
}

fn print_quote_panel(panel: &Panel<Vec<QuoteStatus>>) {
    match panel {
        Panel::Ready(statuses) => print_quotes(statuses),
        Panel::Failed(message) => println!("  Unavailable: {message}"),
        Panel::Loading => println!("  Loading..."),
    }
}

fn run_greet() -> ExitCode {
    let now = Local::now();
    println!("{}", greeting(now.time()));
    println!("{}", now.format("%A, %B %d, %Y"));
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&config) {
        return fail(&e);
    }

    let dashboard = build_dashboard_config(&config);
    eprintln!("  Pivot currency: {}", pivot_currency(&config));
    eprintln!("  Stocks:         {}", dashboard.stocks.join(", "));
    eprintln!("  Indices:        {}", dashboard.indices.join(", "));
    eprintln!(
        "  News API key:   {}",
        if config_string(&config, "news", "api_key").is_some() {
            "set"
        } else {
            "not set (RSS feed only)"
        }
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        if let Err(e) = validate_config(&config) {
            return fail(&e);
        }

        let news = match build_finnhub_adapter(&config) {
            Ok(a) => Arc::new(a) as Arc<dyn NewsPort>,
            Err(e) => return fail(&e),
        };
        let addr = match listen_addr(&config) {
            Ok(a) => a,
            Err(e) => return fail(&e),
        };

        let mut state = AppState::new(news);
        state.default_category = news_category(&config);
        state.news_limit = news_limit(&config);
        let router = build_router(state);

        eprintln!("Starting news proxy on {addr}");
        let served = block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });
        match served {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(e)) => fail(&FinsightError::from(e)),
            Err(e) => fail(&e),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
