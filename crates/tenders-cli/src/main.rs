use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures::future;
use log::LevelFilter;
use tenders::eskom::{self, DEFAULT_ROW_LIMIT, DEFAULT_SNAPSHOT_PATH, EskomTender};
use tenders::etenders::{self, OcdsTender, ReleaseQuery};
use tenders::utils::RecordStats;
use tenders::{ClientOptions, ScraperError, Source, TenderRecord};

#[derive(Parser)]
#[command(name = "tenders")]
#[command(
    about = "Fetch public tender listings from the Eskom bulletin and the eTenders OCDS API",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        global = true,
        help = "Request timeout in seconds, 0 waits forever"
    )]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Args)]
struct SnapshotArgs {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_SNAPSHOT_PATH,
        help = "Where to save a copy of the fetched Eskom page"
    )]
    snapshot: PathBuf,

    #[arg(long, conflicts_with = "snapshot", help = "Do not save the fetched Eskom page")]
    no_snapshot: bool,
}

impl SnapshotArgs {
    fn path(&self) -> Option<&Path> {
        (!self.no_snapshot).then_some(self.snapshot.as_path())
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the first rows of the Eskom tender bulletin table
    Eskom {
        #[arg(
            long,
            default_value_t = DEFAULT_ROW_LIMIT as u32,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Maximum number of table rows to read after the header"
        )]
        limit: u32,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Query one page of releases from the eTenders OCDS API
    Etenders {
        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Page number to request"
        )]
        page: u32,

        #[arg(
            long,
            default_value_t = 50,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Number of releases per page"
        )]
        page_size: u32,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            default_value = "2024-01-01",
            help = "Only releases from this date onwards",
            value_parser = parse_date,
        )]
        date_from: NaiveDate,

        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            default_value = "2024-03-31",
            help = "Only releases up to this date",
            value_parser = parse_date,
        )]
        date_to: NaiveDate,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Run both sources with their defaults and report the combined records
    All {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_blocks<T: std::fmt::Display>(items: &[T]) {
    if items.is_empty() {
        println!("No tenders to display.");
    }
    for item in items {
        print!("{}", item);
    }
}

fn to_records<T: Into<TenderRecord>>(items: Vec<T>) -> Vec<TenderRecord> {
    items.into_iter().map(Into::into).collect()
}

/// Writes a fetch failure to `diagnostics` regardless of the log level, and
/// to the log.
fn report_failure(diagnostics: &mut impl Write, message: &str) {
    log::error!("{}", message);
    if let Err(e) = writeln!(diagnostics, "{}", message) {
        log::warn!("Failed to write diagnostic: {}", e);
    }
}

/// Failures end the run with no records; they are reported, not propagated.
async fn run_eskom(
    scraper: &eskom::WebScraper,
    limit: usize,
    snapshot: Option<&Path>,
    diagnostics: &mut impl Write,
) -> Vec<EskomTender> {
    match scraper.fetch_tenders(limit, snapshot).await {
        Ok(tenders) => tenders,
        Err(e) => {
            let message = match &e {
                ScraperError::UnexpectedStatus { status, .. } => {
                    format!("Failed to load page: {}", status.as_u16())
                }
                _ => format!("Error fetching Eskom tenders: {}", e),
            };
            report_failure(diagnostics, &message);
            Vec::new()
        }
    }
}

async fn run_etenders(
    client: &etenders::ApiClient,
    query: &ReleaseQuery,
    diagnostics: &mut impl Write,
) -> Vec<OcdsTender> {
    match client.fetch_releases(query).await {
        Ok(tenders) => tenders,
        Err(e) => {
            let message = match &e {
                ScraperError::UnexpectedStatus { status, .. } => {
                    format!("Error: {}", status.as_u16())
                }
                _ => format!("Error fetching OCDS releases: {}", e),
            };
            report_failure(diagnostics, &message);
            Vec::new()
        }
    }
}

fn eskom_scraper(options: &ClientOptions) -> eskom::WebScraper {
    eskom::WebScraper::with_options(options).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    })
}

fn etenders_client(options: &ClientOptions) -> etenders::ApiClient {
    etenders::ApiClient::with_options(options).unwrap_or_else(|e| {
        log::error!("Error creating API client: {}", e);
        process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let options = ClientOptions {
        timeout: (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout)),
    };

    match cli.command {
        Commands::Eskom {
            limit,
            snapshot,
            format,
        } => {
            let scraper = eskom_scraper(&options);

            let tenders =
                run_eskom(&scraper, limit as usize, snapshot.path(), &mut io::stderr()).await;

            match format {
                OutputFormat::Json => serialize_json(&to_records(tenders)),
                OutputFormat::Text => print_blocks(&tenders),
            }
        }

        Commands::Etenders {
            page,
            page_size,
            date_from,
            date_to,
            format,
        } => {
            let query = ReleaseQuery {
                page,
                page_size,
                date_from,
                date_to,
            };

            let query = query.validate().unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let client = etenders_client(&options);
            let tenders = run_etenders(&client, &query, &mut io::stderr()).await;

            match format {
                OutputFormat::Json => serialize_json(&to_records(tenders)),
                OutputFormat::Text => print_blocks(&tenders),
            }
        }

        Commands::All { snapshot, format } => {
            let scraper = eskom_scraper(&options);
            let client = etenders_client(&options);
            let query = ReleaseQuery::default();

            log::info!("Fetching from both sources...");

            let (eskom_tenders, ocds_tenders) = future::join(
                run_eskom(
                    &scraper,
                    DEFAULT_ROW_LIMIT,
                    snapshot.path(),
                    &mut io::stderr(),
                ),
                run_etenders(&client, &query, &mut io::stderr()),
            )
            .await;

            match format {
                OutputFormat::Json => {
                    let mut records = to_records(eskom_tenders);
                    records.extend(to_records(ocds_tenders));
                    serialize_json(&records);
                }
                OutputFormat::Text => {
                    println!("== {} ==", Source::Eskom);
                    print_blocks(&eskom_tenders);
                    println!("\n== {} ==", Source::Etenders);
                    print_blocks(&ocds_tenders);

                    let mut records = to_records(eskom_tenders);
                    records.extend(to_records(ocds_tenders));
                    print!("{}", RecordStats::from_records(&records));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use httpmock::prelude::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_eskom_defaults() {
        let cli = Cli::try_parse_from(["tenders", "eskom"]).expect("Failed to parse");

        assert_eq!(cli.timeout, 30);
        match cli.command {
            Commands::Eskom { limit, snapshot, .. } => {
                assert_eq!(limit, 5);
                assert_eq!(snapshot.path(), Some(Path::new("eskom_page.html")));
            }
            _ => panic!("Expected eskom command"),
        }
    }

    #[test]
    fn test_eskom_rejects_zero_limit() {
        assert!(Cli::try_parse_from(["tenders", "eskom", "--limit", "0"]).is_err());
    }

    #[test]
    fn test_snapshot_flags_conflict() {
        let result = Cli::try_parse_from([
            "tenders",
            "eskom",
            "--snapshot",
            "page.html",
            "--no-snapshot",
        ]);
        assert!(result.is_err());

        assert!(Cli::try_parse_from(["tenders", "eskom", "--no-snapshot"]).is_ok());
    }

    #[test]
    fn test_etenders_defaults_match_release_query() {
        let cli = Cli::try_parse_from(["tenders", "etenders"]).expect("Failed to parse");

        match cli.command {
            Commands::Etenders {
                page,
                page_size,
                date_from,
                date_to,
                ..
            } => {
                let query = ReleaseQuery {
                    page,
                    page_size,
                    date_from,
                    date_to,
                };
                assert_eq!(query, ReleaseQuery::default());
            }
            _ => panic!("Expected etenders command"),
        }
    }

    #[test]
    fn test_etenders_rejects_bad_dates() {
        for args in [
            ["tenders", "etenders", "--date-from", "2024-13-01"],
            ["tenders", "etenders", "--date-to", "31/03/2024"],
            ["tenders", "etenders", "--page-size", "0"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?} should fail");
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tenders",
            "all",
            "--timeout",
            "0",
            "-l",
            "off",
            "-o",
            "json",
        ])
        .expect("Failed to parse");

        assert_eq!(cli.timeout, 0);
        assert!(matches!(cli.log_level, LogLevel::Off));
        match cli.command {
            Commands::All { snapshot, format } => {
                assert!(matches!(format, OutputFormat::Json));
                assert_eq!(snapshot.path(), Some(Path::new("eskom_page.html")));
            }
            _ => panic!("Expected all command"),
        }
    }

    #[test]
    fn test_all_snapshot_flags() {
        let cli =
            Cli::try_parse_from(["tenders", "all", "--no-snapshot"]).expect("Failed to parse");
        match cli.command {
            Commands::All { snapshot, .. } => assert_eq!(snapshot.path(), None),
            _ => panic!("Expected all command"),
        }

        let cli = Cli::try_parse_from(["tenders", "all", "--snapshot", "bulletin.html"])
            .expect("Failed to parse");
        match cli.command {
            Commands::All { snapshot, .. } => {
                assert_eq!(snapshot.path(), Some(Path::new("bulletin.html")))
            }
            _ => panic!("Expected all command"),
        }

        let result = Cli::try_parse_from([
            "tenders",
            "all",
            "--snapshot",
            "bulletin.html",
            "--no-snapshot",
        ]);
        assert!(result.is_err());
    }

    async fn failing_server(path: &str, code: u16) -> MockServer {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(path);
                then.status(code).body("unavailable");
            })
            .await;
        server
    }

    #[tokio::test]
    async fn test_eskom_status_is_reported_without_logging() {
        for code in [404, 500] {
            let server = failing_server("/Tenders/", code).await;
            let scraper = eskom::WebScraper::new()
                .expect("Failed to build scraper")
                .with_base_url(server.base_url());

            let mut diagnostics = Vec::new();
            let tenders = run_eskom(&scraper, DEFAULT_ROW_LIMIT, None, &mut diagnostics).await;

            assert!(tenders.is_empty());
            assert_eq!(
                String::from_utf8(diagnostics).unwrap(),
                format!("Failed to load page: {code}\n")
            );
        }
    }

    #[tokio::test]
    async fn test_etenders_status_is_reported_without_logging() {
        for code in [404, 500] {
            let server = failing_server("/api/OCDSReleases", code).await;
            let client = etenders::ApiClient::new()
                .expect("Failed to build client")
                .with_base_url(server.base_url());

            let mut diagnostics = Vec::new();
            let tenders =
                run_etenders(&client, &ReleaseQuery::default(), &mut diagnostics).await;

            assert!(tenders.is_empty());
            assert_eq!(
                String::from_utf8(diagnostics).unwrap(),
                format!("Error: {code}\n")
            );
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/Tenders/");
                then.status(200).body("<html><body><p>Down for maintenance</p></body></html>");
            })
            .await;
        let scraper = eskom::WebScraper::new()
            .expect("Failed to build scraper")
            .with_base_url(server.base_url());

        let mut diagnostics = Vec::new();
        let tenders = run_eskom(&scraper, DEFAULT_ROW_LIMIT, None, &mut diagnostics).await;

        assert!(tenders.is_empty());
        assert!(
            String::from_utf8(diagnostics)
                .unwrap()
                .contains("Table not found. Page may have changed.")
        );
    }
}
