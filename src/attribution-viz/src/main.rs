//! Attribution Viz CLI — inspect campaign records, derive metrics
//! snapshots, run exports, and build shareable dashboard links.

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use ctv_catalog::CampaignCatalog;
use ctv_core::config::AppConfig;
use ctv_core::types::AttributionMode;
use ctv_derivation::snapshot::snapshot;
use ctv_export::format::{format_large_number, format_percentage};
use ctv_export::jobs::{ExportKind, ExportManager, ExportStatus};
use ctv_export::share_link::{DashboardTab, ShareState};
use tracing::{info, warn};
use url::Url;

#[derive(Parser)]
#[command(name = "attribution-viz")]
#[command(about = "CTV attribution analytics derivation and export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the campaigns in the catalog
    List,

    /// Print the derived metrics snapshot for a campaign as JSON
    Show {
        /// Campaign id (see `list`)
        #[arg(short, long)]
        campaign: String,

        /// Attribution mode: household or individual
        #[arg(short, long, default_value = "household")]
        mode: String,

        /// Confidence threshold percent (0-100)
        #[arg(short, long, default_value_t = 70)]
        threshold: u8,
    },

    /// Run an export job and print the artifact path
    Export {
        /// Campaign id
        #[arg(short, long)]
        campaign: String,

        /// Export kind: full-csv, metrics-csv, report
        #[arg(short, long, default_value = "metrics-csv")]
        kind: String,

        /// Attribution mode: household or individual
        #[arg(short, long, default_value = "household")]
        mode: String,

        /// Confidence threshold percent (0-100)
        #[arg(short, long, default_value_t = 70)]
        threshold: u8,
    },

    /// Build a shareable dashboard link
    Link {
        /// Campaign index into the catalog
        #[arg(long, default_value_t = 0)]
        campaign_index: usize,

        /// Attribution mode: household or individual
        #[arg(short, long, default_value = "household")]
        mode: String,

        /// Dashboard tab: flow, timing, comparison
        #[arg(long, default_value = "flow")]
        tab: String,
    },
}

fn parse_mode(s: &str) -> anyhow::Result<AttributionMode> {
    AttributionMode::from_param(s)
        .ok_or_else(|| anyhow!("unknown attribution mode '{s}' (expected household or individual)"))
}

fn parse_kind(s: &str) -> anyhow::Result<ExportKind> {
    match s {
        "full-csv" => Ok(ExportKind::FullCsv),
        "metrics-csv" => Ok(ExportKind::MetricsCsv),
        "report" => Ok(ExportKind::Report),
        _ => bail!("unknown export kind '{s}' (expected full-csv, metrics-csv, or report)"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attribution_viz=info,ctv_catalog=info,ctv_export=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let catalog = CampaignCatalog::load()?;
    info!(campaigns = catalog.len(), "Catalog loaded");

    match cli.command {
        Commands::List => {
            println!("{:<22} {:<28} {:>12} {:>12}", "ID", "Name", "Impressions", "Conversions");
            for summary in catalog.list() {
                println!(
                    "{:<22} {:<28} {:>12} {:>12}",
                    summary.id,
                    summary.name,
                    format_large_number(summary.impressions as i64),
                    format_large_number(summary.conversions as i64),
                );
            }
        }

        Commands::Show {
            campaign,
            mode,
            threshold,
        } => {
            let mode = parse_mode(&mode)?;
            let record = catalog.get(&campaign)?;
            let snap = snapshot(record, mode, threshold, &config.derivation);
            println!("{}", serde_json::to_string_pretty(&snap)?);
        }

        Commands::Export {
            campaign,
            kind,
            mode,
            threshold,
        } => {
            let mode = parse_mode(&mode)?;
            let kind = parse_kind(&kind)?;
            let record = catalog.get(&campaign)?.clone();

            let manager = ExportManager::new(&config.export, config.derivation.clone());
            let id = manager.submit(kind, record, mode, threshold);
            match manager.wait(id).await {
                Some(ExportStatus::Completed { path }) => {
                    println!("Export written to: {}", path.display());
                }
                Some(ExportStatus::Failed { error }) => bail!("export failed: {error}"),
                _ => bail!("export job {id} disappeared"),
            }
        }

        Commands::Link {
            campaign_index,
            mode,
            tab,
        } => {
            if campaign_index >= catalog.len() {
                bail!(
                    "campaign index {campaign_index} out of range ({} campaigns)",
                    catalog.len()
                );
            }
            let state = ShareState {
                campaign_index,
                mode: parse_mode(&mode)?,
                tab: DashboardTab::from_param(&tab)
                    .ok_or_else(|| anyhow!("unknown tab '{tab}' (expected flow, timing, or comparison)"))?,
            };
            let base = Url::parse(&config.export.link_base_url)?;
            println!("{}", state.encode(&base));

            let record = catalog
                .by_index(campaign_index)
                .ok_or_else(|| anyhow!("campaign index {campaign_index} out of range"))?;
            info!(
                campaign = %record.id,
                conversion_rate = %format_percentage(record.exposed_group.conversion_rate, 3),
                "Share link built"
            );
        }
    }

    Ok(())
}
