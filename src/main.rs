use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};

use ondc_dashboard::commands::{orders, tickets, ReportOutcome, ReportRequest};
use ondc_dashboard::{load_config, AppConfig, AppError};

#[derive(Parser)]
#[command(name = "ondc-dashboard", version)]
#[command(about = "ONDC order and support-ticket dashboards from CSV exports")]
#[command(after_help = "Environment:\n  RUST_LOG   Log filter override (e.g. ondc_dashboard=debug)")]
struct Cli {
    /// TOML file overriding SLA thresholds and status names
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// -v for info, -vv for debug
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ONDC order dashboard: metrics, distributions, SLA analysis
    Orders(ReportArgs),
    /// Support ticket dashboard: status, email domains, subject patterns
    Tickets(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Input CSV export
    csv: PathBuf,
    /// Write the dashboard as a self-contained HTML page
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,
    /// Write the dashboard as an XLSX workbook
    #[arg(long, value_name = "PATH")]
    xlsx: Option<PathBuf>,
    /// Print the dashboard as JSON instead of the text summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl From<ReportArgs> for ReportRequest {
    fn from(args: ReportArgs) -> Self {
        ReportRequest {
            csv: args.csv,
            html: args.html,
            xlsx: args.xlsx,
            json: args.json,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Orders(args) => run(
            args.into(),
            &config,
            orders::load_orders,
            orders::run_orders_report,
        ),
        Commands::Tickets(args) => run(
            args.into(),
            &config,
            tickets::load_tickets,
            tickets::run_tickets_report,
        ),
    };

    match result {
        Ok(outcome) => {
            for export in &outcome.exports {
                eprintln!("Wrote {} ({} bytes)", export.path, export.size_bytes);
            }
            if let Some(text) = outcome.stdout {
                println!("{text}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.message());
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
enum RunError {
    Read(AppError),
    Report(AppError),
}

impl RunError {
    /// Line printed to stderr before exiting with status 1.
    fn message(&self) -> String {
        match self {
            RunError::Read(e) => format!("Error reading the file: {e}"),
            RunError::Report(e) => format!("Error: {e}"),
        }
    }
}

fn run<T>(
    request: ReportRequest,
    config: &AppConfig,
    load: fn(&ReportRequest, &AppConfig) -> Result<T, AppError>,
    report: fn(&ReportRequest, &T, &AppConfig) -> Result<ReportOutcome, AppError>,
) -> Result<ReportOutcome, RunError> {
    let output = load(&request, config).map_err(RunError::Read)?;
    report(&request, &output, config).map_err(RunError::Report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn run_orders(request: ReportRequest) -> Result<ReportOutcome, RunError> {
        run(
            request,
            &AppConfig::default(),
            orders::load_orders,
            orders::run_orders_report,
        )
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_orders(ReportRequest::new(dir.path().join("absent.csv"))).unwrap_err();
        assert!(matches!(err, RunError::Read(AppError::Io(_))));
        assert!(err.message().starts_with("Error reading the file: "));
    }

    #[test]
    fn test_missing_columns_is_read_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Order Category\nF&B\n").unwrap();
        let err = match run(
            ReportRequest::new(file.path()),
            &AppConfig::default(),
            tickets::load_tickets,
            tickets::run_tickets_report,
        ) {
            Err(e) => e,
            Ok(_) => panic!("expected a read error"),
        };
        assert_eq!(
            err.message(),
            "Error reading the file: Missing required columns: Contact ID, Subject, Status"
        );
    }

    #[test]
    fn test_unwritable_output_is_report_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            b"Order Category,Order Status,Order Create Date & Time\nF&B,Completed,05-01-2026 08:00\n",
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut request = ReportRequest::new(file.path());
        request.html = Some(dir.path().join("no-such-dir").join("out.html"));

        let err = run_orders(request).unwrap_err();
        assert!(matches!(err, RunError::Report(AppError::Io(_))));
        assert!(err.message().starts_with("Error: I/O error"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["ondc-dashboard", "-vv", "orders", "o.csv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Orders(args) => {
                let request = ReportRequest::from(args);
                assert!(request.json);
                assert!(request.html.is_none());
            }
            Commands::Tickets(_) => panic!("expected the orders subcommand"),
        }
    }
}
