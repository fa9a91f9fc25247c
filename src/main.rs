mod config;
mod contrib_card;
mod error;
mod fetcher;
mod format;
mod github;
mod i18n;
mod icons;
mod rank;
mod stats;
mod stats_card;
mod svg;
mod theme;

use anyhow::{Context, Result};
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use config::{CardConfig, ContribCardConfig, DEFAULT_CARD_WIDTH};
use fetcher::{ContribRequest, DEFAULT_CONTRIB_LIMIT, StatsRequest};
use format::NumberFormat;
use github::GithubClient;
use std::fs;
use std::path::{Path, PathBuf};
use theme::ColorOverrides;
use tracing_subscriber::EnvFilter;

/// Render GitHub profile cards as SVG.
#[derive(Debug, Parser)]
#[command(name = "statcard", version)]
struct Cli {
    /// GitHub token used for every API call.
    #[arg(long, env = "ACCESS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// General stats card with rank ring.
    Stats(StatsArgs),
    /// Top repositories the user contributed to.
    Contrib(ContribArgs),
}

/// Look options shared by both cards.
#[derive(Debug, Args)]
struct StyleArgs {
    #[arg(long, default_value = "default")]
    theme: String,

    #[arg(long, default_value = "en")]
    locale: String,

    #[arg(long)]
    custom_title: Option<String>,

    #[arg(long)]
    card_width: Option<u32>,

    #[arg(long)]
    hide_title: bool,

    #[arg(long)]
    hide_border: bool,

    #[arg(long)]
    disable_animations: bool,

    #[arg(long, default_value_t = 4.5)]
    border_radius: f32,

    /// Hex colors, with or without `#`. Invalid values are ignored.
    #[arg(long)]
    title_color: Option<String>,
    #[arg(long)]
    text_color: Option<String>,
    #[arg(long)]
    icon_color: Option<String>,
    #[arg(long)]
    ring_color: Option<String>,
    #[arg(long)]
    border_color: Option<String>,
    /// Solid hex or `angle,hex,hex...` gradient.
    #[arg(long)]
    bg_color: Option<String>,
}

impl StyleArgs {
    fn color_overrides(&self) -> ColorOverrides {
        ColorOverrides {
            title: self.title_color.clone(),
            text: self.text_color.clone(),
            icon: self.icon_color.clone(),
            ring: self.ring_color.clone(),
            border: self.border_color.clone(),
            bg: self.bg_color.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct StatsArgs {
    #[arg(long)]
    user: String,

    #[arg(long, short, default_value = "stats.svg")]
    output: PathBuf,

    /// Stat keys to remove, comma separated.
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,

    /// Extra stat keys to add, comma separated.
    #[arg(long, value_delimiter = ',')]
    show: Vec<String>,

    #[arg(long, value_enum, default_value_t = NumberFormat::Short)]
    number_format: NumberFormat,

    #[arg(long)]
    number_precision: Option<u8>,

    /// Count all-time commits instead of the current year's.
    #[arg(long)]
    include_all_commits: bool,

    /// Count contributions for one calendar year.
    #[arg(long)]
    commits_year: Option<i32>,

    #[arg(long)]
    show_icons: bool,

    #[arg(long)]
    hide_rank: bool,

    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=200))]
    line_height: u32,

    /// Render labels and values in regular weight.
    #[arg(long)]
    no_bold: bool,

    #[command(flatten)]
    style: StyleArgs,
}

impl StatsArgs {
    fn request(&self) -> StatsRequest {
        StatsRequest {
            username: self.user.clone(),
            include_all_commits: self.include_all_commits,
            commits_year: self.commits_year,
            extra: stats::parse_stat_keys(&self.show),
        }
    }

    fn card_config(&self) -> CardConfig {
        CardConfig {
            theme: self.style.theme.clone(),
            colors: self.style.color_overrides(),
            locale: self.style.locale.clone(),
            hide: self.hide.clone(),
            show: self.show.clone(),
            hide_title: self.style.hide_title,
            hide_border: self.style.hide_border,
            hide_rank: self.hide_rank,
            show_icons: self.show_icons,
            custom_title: self.style.custom_title.clone(),
            card_width: self.style.card_width,
            line_height: self.line_height,
            border_radius: self.style.border_radius,
            number_format: self.number_format,
            number_precision: self.number_precision,
            disable_animations: self.style.disable_animations,
            text_bold: !self.no_bold,
            include_all_commits: self.include_all_commits,
        }
    }
}

#[derive(Debug, Args)]
struct ContribArgs {
    #[arg(long)]
    user: String,

    #[arg(long, short, default_value = "contrib.svg")]
    output: PathBuf,

    /// `owner/name` repositories to leave out, comma separated.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    #[arg(
        long,
        default_value_t = DEFAULT_CONTRIB_LIMIT,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    limit: usize,

    /// Skip downloading owner avatars.
    #[arg(long)]
    no_avatars: bool,

    #[command(flatten)]
    style: StyleArgs,
}

impl ContribArgs {
    fn request(&self) -> ContribRequest {
        ContribRequest {
            username: self.user.clone(),
            exclude: self.exclude.clone(),
            limit: self.limit,
            embed_avatars: !self.no_avatars,
        }
    }

    fn card_config(&self) -> ContribCardConfig {
        ContribCardConfig {
            theme: self.style.theme.clone(),
            colors: self.style.color_overrides(),
            locale: self.style.locale.clone(),
            custom_title: self.style.custom_title.clone(),
            card_width: self.style.card_width.unwrap_or(DEFAULT_CARD_WIDTH),
            hide_title: self.style.hide_title,
            hide_border: self.style.hide_border,
            border_radius: self.style.border_radius,
            disable_animations: self.style.disable_animations,
        }
    }
}

fn write_card(path: &Path, svg: &str) -> Result<()> {
    fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let token = cli
        .token
        .context("no GitHub token: pass --token or set ACCESS_TOKEN")?;
    let client = GithubClient::new(token).context("failed to build HTTP client")?;

    match cli.command {
        Command::Stats(args) => {
            let stats = fetcher::fetch_stats(&client, &args.request())
                .await
                .with_context(|| format!("failed to fetch stats for {}", args.user))?;
            let svg = stats_card::render_stats_card(&stats, &args.card_config());
            write_card(&args.output, &svg)?;
        }
        Command::Contrib(args) => {
            let record = fetcher::fetch_contributor_stats(&client, &args.request())
                .await
                .with_context(|| format!("failed to fetch contributions for {}", args.user))?;
            let svg = contrib_card::render_contrib_card(&record, &args.card_config());
            write_card(&args.output, &svg)?;
        }
    }

    Ok(())
}
