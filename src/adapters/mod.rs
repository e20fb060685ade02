pub mod chart_svg;
pub mod csv_export;
pub mod csv_rate_adapter;
pub mod exchange_rate_api;
pub mod file_config_adapter;
pub mod finnhub_news;
pub mod http;
pub mod rss_news;
pub mod yahoo_quote;

#[cfg(feature = "web")]
pub mod web;
