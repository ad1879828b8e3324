use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harlens_cli::OutputFormat;
use harlens_cli::commands;
use harlens_cli::commands::analyze::AnalyzeOptions;
use harlens_core::analysis::{ERROR_STATUS_THRESHOLD, SLOW_REQUEST_THRESHOLD_MS, Thresholds};
use harlens_server::ServerConfig;
use harlens_server::config::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harlens")]
#[command(author, version)]
#[command(
    about = "Summarize failed, slow and successful requests in HTTP Archive (HAR) files",
    long_about = "harlens reads a HAR capture, counts failed (status >= 400) and slow \
                  (> 1s) requests, totals load time and transfer size, and lists the \
                  offending requests with their trace IDs. It can also run as an HTTP \
                  service that analyzes uploaded HAR files."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a HAR file
    Analyze {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only list requests whose method, URL, status or trace IDs contain this text
        #[arg(short, long)]
        search: Option<String>,

        /// Print request and response bodies of listed requests (extra columns in table output)
        #[arg(long)]
        show_bodies: bool,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Run the HAR upload service
    Serve {
        /// Address to bind
        #[arg(long, env = "HARLENS_BIND", default_value = "127.0.0.1")]
        bind: IpAddr,

        /// Port to listen on
        #[arg(short, long, env = "HARLENS_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Origin allowed to upload from a browser
        #[arg(long, env = "HARLENS_ALLOWED_ORIGIN", default_value = DEFAULT_ALLOWED_ORIGIN)]
        allowed_origin: String,

        /// Do not send CORS headers
        #[arg(long)]
        no_cors: bool,

        /// Largest accepted upload in bytes
        #[arg(long, env = "HARLENS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
        max_upload_bytes: usize,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for harlens.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  Bash:  harlens completion --shell bash >> ~/.bashrc
  Zsh:   harlens completion --shell zsh > ~/.zfunc/_harlens
         (add 'fpath=(~/.zfunc $fpath)' to ~/.zshrc before compinit)
  Fish:  harlens completion --shell fish > ~/.config/fish/completions/harlens.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

/// Classification limits shared by `analyze` and `serve`
#[derive(clap::Args)]
struct ThresholdArgs {
    /// Requests slower than this many milliseconds are reported as slow
    #[arg(long, value_name = "MS", default_value_t = SLOW_REQUEST_THRESHOLD_MS)]
    slow_threshold: f64,

    /// Responses with this status or higher are reported as failed
    #[arg(long, value_name = "CODE", default_value_t = ERROR_STATUS_THRESHOLD)]
    error_status: i64,
}

impl From<ThresholdArgs> for Thresholds {
    fn from(args: ThresholdArgs) -> Self {
        Thresholds {
            slow_ms: args.slow_threshold,
            error_status: args.error_status,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Analyze {
            file,
            search,
            show_bodies,
            thresholds,
        } => {
            let options = AnalyzeOptions {
                search,
                show_bodies,
                thresholds: thresholds.into(),
            };
            commands::analyze::execute(&file, &options, cli.format)
        }
        Commands::Serve {
            bind,
            port,
            allowed_origin,
            no_cors,
            max_upload_bytes,
            thresholds,
        } => commands::serve::execute(ServerConfig {
            bind,
            port,
            allowed_origin: (!no_cors).then_some(allowed_origin),
            max_upload_bytes,
            thresholds: thresholds.into(),
        }),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harlens=debug,harlens_cli=debug,harlens_core=debug,harlens_server=debug")
    } else {
        EnvFilter::new("harlens=info,harlens_server=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
