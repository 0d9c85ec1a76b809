//! # Tubescout
//!
//! Command-line video discovery. A search returns lightweight items, a
//! batched detail lookup fills in category, topic and statistics, and the
//! merged records are filtered by topic and audience restriction.

mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubescout_config::{Config, ConfigLoad, ConfigLoader};
use tubescout_core::{DiscoveryPipeline, PartialResultPolicy, YouTubeClient};
use tubescout_model::{
    ContentType, FilterSpec, RestrictedPolicy, SafeSearch, SearchOrder,
    VideoDefinition, VideoDuration,
};

use render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tubescout")]
#[command(about = "Search videos and filter them by category, topic and audience")]
struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(long, global = true, env = "TUBESCOUT_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Read environment overrides from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a discovery search
    Search(SearchArgs),
    /// List the known video category ids
    Categories(FormatArgs),
    /// List the known topic ids
    Topics(FormatArgs),
    /// List accepted values for order, safe-search, duration and definition
    Options,
}

#[derive(ClapArgs, Debug, Clone)]
struct FormatArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ClapArgs, Debug, Clone)]
struct SearchArgs {
    /// Free-text query
    query: String,

    /// Number of results (clamped to the configured limit)
    #[arg(short = 'n', long)]
    max_results: Option<u32>,

    /// Result ordering (see `tubescout options`)
    #[arg(long)]
    order: Option<SearchOrder>,

    #[arg(long)]
    safe_search: Option<SafeSearch>,

    #[arg(long)]
    duration: Option<VideoDuration>,

    #[arg(long)]
    definition: Option<VideoDefinition>,

    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long, value_parser = parse_timestamp)]
    published_after: Option<DateTime<Utc>>,

    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long, value_parser = parse_timestamp)]
    published_before: Option<DateTime<Utc>>,

    /// ISO 3166-1 alpha-2 region code
    #[arg(long)]
    region: Option<String>,

    /// Relevance language (ISO 639-1)
    #[arg(long)]
    language: Option<String>,

    /// Category id(s); more than one runs a search per category
    #[arg(long = "category", value_delimiter = ',')]
    categories: Vec<String>,

    /// Keep only videos tagged with this topic id
    #[arg(long)]
    topic: Option<String>,

    /// Audience restriction: any, require or exclude
    #[arg(long, default_value_t = RestrictedPolicy::Any)]
    restricted: RestrictedPolicy,

    /// Result kind: video, channel or playlist. Category, topic, restricted,
    /// duration and definition apply to videos only
    #[arg(long = "type", default_value_t = ContentType::Video)]
    content_type: ContentType,

    /// What to do when some detail batches fail: continue or abort
    #[arg(long)]
    partial: Option<PartialResultPolicy>,

    /// Overrides the configured API key
    #[arg(long)]
    api_key: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Override via RUST_LOG.
                "warn,tubescout=info,tubescout_core=info,tubescout_config=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Categories(args) => render::categories(&mut stdout, args.format)?,
        Command::Topics(args) => render::topics(&mut stdout, args.format)?,
        Command::Options => render::options(&mut stdout)?,
        Command::Search(args) => {
            let config = load_config(cli.config, cli.env_file)?;
            run_search(&mut stdout, config, args).await?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn load_config(
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;
    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(hint = %hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    Ok(config)
}

async fn run_search<W: Write>(
    out: &mut W,
    mut config: Config,
    args: SearchArgs,
) -> anyhow::Result<()> {
    if let Some(key) = args.api_key.as_ref().filter(|key| !key.trim().is_empty()) {
        config.api.api_key = Some(key.trim().to_string());
    }
    if let Some(policy) = args.partial {
        config.partial_results = policy;
    }

    let spec = build_spec(&config, &args);
    let client = YouTubeClient::new(config.client_settings())
        .context("failed to create platform client")?;
    let pipeline = DiscoveryPipeline::new(Arc::new(client), config.pipeline_settings());

    let outcome = pipeline
        .run(&spec)
        .await
        .with_context(|| format!("discovery for '{}' failed", spec.query))?;

    render::outcome(out, &outcome, args.format)?;
    if let Some(note) = render::incomplete_note(&outcome) {
        eprintln!("{note}");
    }
    Ok(())
}

fn build_spec(config: &Config, args: &SearchArgs) -> FilterSpec {
    let mut spec = config.filter_spec(args.query.clone());
    if let Some(max_results) = args.max_results {
        spec.max_results = config.clamp_max_results(max_results);
    }
    if let Some(order) = args.order {
        spec.order = order;
    }
    if let Some(safe_search) = args.safe_search {
        spec.safe_search = safe_search;
    }
    spec.duration = args.duration;
    spec.definition = args.definition;
    spec.published_after = args.published_after;
    spec.published_before = args.published_before;
    if args.region.is_some() {
        spec.region = args.region.clone();
    }
    if args.language.is_some() {
        spec.language = args.language.clone();
    }
    spec.category_ids = args.categories.clone();
    spec.topic_id = args.topic.clone();
    spec.restricted = args.restricted;
    spec.content_type = args.content_type;
    spec
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{raw}' is neither RFC 3339 nor YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tubescout_config::EnvConfig;

    #[test]
    fn timestamps_accept_dates_and_rfc3339() {
        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let full = parse_timestamp("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(full, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());

        assert!(parse_timestamp("March 1st").is_err());
    }

    #[test]
    fn flags_override_configured_defaults() {
        let cli = Cli::try_parse_from([
            "tubescout",
            "search",
            "rust",
            "-n",
            "500",
            "--order",
            "viewCount",
            "--category",
            "10,20",
            "--topic",
            "/m/04rlf",
            "--restricted",
            "exclude",
        ])
        .unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };

        let config = ConfigLoader::new()
            .with_env(EnvConfig::default())
            .load()
            .unwrap()
            .config;

        let spec = build_spec(&config, &args);
        assert_eq!(spec.max_results, config.search.max_results_limit);
        assert_eq!(spec.order, SearchOrder::ViewCount);
        assert_eq!(spec.category_ids, vec!["10".to_string(), "20".to_string()]);
        assert_eq!(spec.target_topic(), Some("/m/04rlf"));
        assert_eq!(spec.restricted, RestrictedPolicy::Exclude);
        assert_eq!(spec.content_type, ContentType::Video);
    }

    #[test]
    fn playlist_type_is_parsed() {
        let cli =
            Cli::try_parse_from(["tubescout", "search", "lofi", "--type", "playlist"]).unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.content_type, ContentType::Playlist);
        assert!(Cli::try_parse_from(["tubescout", "search", "x", "--type", "short"]).is_err());
    }
}
