use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hpreview_cli::logging::init_tracing;
use hpreview_cli::server::{DEFAULT_ENDPOINT, ServeOpts, run_server};
use hpreview_cli::url_command::{UrlOpts, parse_culture_name, run_url};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "hpreview",
    version,
    about = "Headless preview URLs and a demo frontend that receives them."
)]
struct Cli {
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Run the demo frontend with preview entry and exit endpoints.")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3000)]
        port: u16,
        #[arg(long, env = "PREVIEW_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
        #[arg(long, value_name = "FILE")]
        content: Option<PathBuf>,
        #[arg(long)]
        no_open: bool,
    },
    #[command(about = "Compute the preview URL the CMS would offer for a content item.")]
    Url {
        #[arg(long, value_name = "FILE", default_value = "headless-preview.yaml")]
        config: PathBuf,
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        culture: Option<String>,
        #[arg(long = "culture-name", value_name = "CULTURE=NAME", value_parser = parse_culture_name)]
        culture_names: Vec<(String, String)>,
        #[arg(long)]
        route: Option<String>,
        #[arg(long, value_name = "FILE")]
        dictionary: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.command {
        Command::Serve {
            host,
            port,
            secret,
            endpoint,
            content,
            no_open,
        } => run_server(ServeOpts {
            host,
            port,
            secret,
            endpoint,
            content,
            no_open,
        }),
        Command::Url {
            config,
            id,
            name,
            culture,
            culture_names,
            route,
            dictionary,
        } => run_url(&UrlOpts {
            config,
            id,
            name,
            culture,
            culture_names,
            route,
            dictionary,
        }),
    }
}
