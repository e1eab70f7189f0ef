use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wavetracker::{
    analyze_single_tower,
    insight::{prompt, CannedInsights, InsightGenerator},
    AnalysisResult, BoundingBox, RawTowerRecord,
};

mod config;
mod opencellid;
mod selection;
mod server;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the analysis API over HTTP
    Serve {
        /// Overrides `http_port` from the config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Analyse one raw tower record (JSON) read from stdin
    Tower,
    /// Analyse the cells of an OpenCellID CSV export (stdin) inside a bounding box
    Area {
        #[arg(long, allow_negative_numbers = true)]
        lat_min: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_min: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat_max: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_max: f64,
        /// Only keep cells of this radio technology
        #[arg(long)]
        radio: Option<String>,
    },
    /// Render the insight prompt and template answer for an analysis (JSON) read from stdin
    Insights {
        #[arg(short, long)]
        question: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin() -> Result<String> {
    let mut data = String::new();
    io::stdin()
        .read_to_string(&mut data)
        .context("Failed to read stdin")?;
    Ok(data)
}

fn print_json(result: &AnalysisResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = match cli.config.as_deref() {
        Some(x) => x,
        None => Path::new("config.toml"),
    };

    match cli.command {
        Command::Serve { port } => {
            let config = config::load(path)?;
            let addr = (config.bind_address.clone(), port.unwrap_or(config.http_port));
            let json_limit = config.json_limit_bytes;
            let config = web::Data::new(config);

            info!("listening on {}:{}", addr.0, addr.1);
            HttpServer::new(move || {
                App::new()
                    .app_data(config.clone())
                    .app_data(web::JsonConfig::default().limit(json_limit))
                    .configure(server::configure)
            })
            .bind(addr)?
            .run()
            .await?;
        }

        Command::Tower => {
            let raw: RawTowerRecord =
                serde_json::from_str(&read_stdin()?).context("Failed to parse tower record")?;
            let result = analyze_single_tower(&raw)?;
            print_json(&result)?;
        }

        Command::Area {
            lat_min,
            lon_min,
            lat_max,
            lon_max,
            radio,
        } => {
            let config = config::load_or_default(path)?;
            let bbox = BoundingBox::new(lat_min, lon_min, lat_max, lon_max);
            bbox.validate()?;

            let cells = opencellid::read_records(io::stdin().lock())?;
            let report = selection::analyze(cells, &bbox, radio.as_deref(), config.max_area_records)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Insights { question } => {
            let data: AnalysisResult =
                serde_json::from_str(&read_stdin()?).context("Failed to parse analysis")?;
            println!("{}\n\n---\n\n{}", prompt(&question, &data), CannedInsights.generate(&question, &data));
        }
    };

    Ok(())
}
