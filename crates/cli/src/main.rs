use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use turnpoint_core::domain::contract::{ProjectionRequest, RawNumber};
use turnpoint_core::error::InputError;
use turnpoint_core::report::{SortMode, StrengthFilter, ViewState};

mod render;

#[derive(Debug, Parser)]
#[command(name = "turnpoint", about = "Project converging turning-point dates for an asset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one projection and print the timeline.
    Project(ProjectArgs),
    /// List the asset profiles in effect.
    Profiles,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Anchor price.
    #[arg(long)]
    base_price: Option<String>,

    /// Anchor date (YYYY-MM-DD).
    #[arg(long)]
    base_date: Option<String>,

    /// Days forward to project. Defaults to TURNPOINT_DEFAULT_HORIZON_DAYS or 180.
    #[arg(long)]
    horizon_days: Option<String>,

    /// stocks, forex, crypto, commodities, etf or indices.
    #[arg(long, default_value = "stocks")]
    asset: String,

    /// Comma-separated subset of gann,fibonacci,lunar,astro,gematria,natural. Defaults to all.
    #[arg(long, value_delimiter = ',')]
    methods: Option<Vec<String>>,

    /// standard or high. High adds a +/-2 day window to strong dates.
    #[arg(long, default_value = "standard")]
    accuracy: String,

    /// Display order: strength or date.
    #[arg(long, default_value = "strength", value_parser = parse_sort)]
    sort: SortMode,

    /// Display filter: all, strong or critical.
    #[arg(long, default_value = "all", value_parser = parse_filter)]
    filter: StrengthFilter,

    /// Write the full result set as CSV to this path.
    #[arg(long)]
    csv: Option<std::path::PathBuf>,

    /// Print the result set as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Use the built-in sample anchor (1850.50 on 2021-05-25, 180 days, forex).
    #[arg(long)]
    sample: bool,
}

fn parse_sort(s: &str) -> Result<SortMode, String> {
    SortMode::from_key(s).ok_or_else(|| format!("unknown sort mode: {s}"))
}

fn parse_filter(s: &str) -> Result<StrengthFilter, String> {
    StrengthFilter::from_key(s).ok_or_else(|| format!("unknown filter: {s}"))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = turnpoint_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let cli = Cli::parse();
    let registry = settings.load_registry()?;

    let res = match cli.command {
        Command::Profiles => {
            print!("{}", render::profiles(&registry));
            Ok(())
        }
        Command::Project(args) => run_project(args, &settings, &registry),
    };

    if let Err(err) = &res {
        if err.downcast_ref::<InputError>().is_none() {
            sentry_anyhow::capture_anyhow(err);
        }
    }
    res
}

fn run_project(
    args: ProjectArgs,
    settings: &turnpoint_core::config::Settings,
    registry: &turnpoint_core::domain::asset::AssetRegistry,
) -> anyhow::Result<()> {
    let view = ViewState {
        sort: args.sort,
        filter: args.filter,
    };
    let request = build_request(&args, settings.default_horizon_days);

    let set = turnpoint_core::engine::calculate(request, registry)
        .context("projection input rejected")?;

    if let Some(path) = &args.csv {
        let csv = turnpoint_core::report::csv::export_csv(&set, view.sort)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = set.results.len(), "exported CSV");
    }

    if args.json {
        let out = serde_json::json!({
            "input": set.input,
            "profile": set.profile,
            "summary": turnpoint_core::report::Summary::of(&set),
            "results": view.apply(&set),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render::report(&set, view));
    }
    Ok(())
}

fn build_request(args: &ProjectArgs, default_horizon_days: u32) -> ProjectionRequest {
    if args.sample {
        return ProjectionRequest {
            base_price: Some(RawNumber::Text("1850.50".to_string())),
            base_date: Some("2021-05-25".to_string()),
            horizon_days: Some(RawNumber::Number(180.0)),
            asset_class: Some("forex".to_string()),
            methods: args.methods.clone(),
            accuracy: Some(args.accuracy.clone()),
        };
    }

    ProjectionRequest {
        base_price: args.base_price.clone().map(RawNumber::Text),
        base_date: args.base_date.clone(),
        horizon_days: Some(
            args.horizon_days
                .clone()
                .map(RawNumber::Text)
                .unwrap_or(RawNumber::Number(f64::from(default_horizon_days))),
        ),
        asset_class: Some(args.asset.clone()),
        methods: args.methods.clone(),
        accuracy: Some(args.accuracy.clone()),
    }
}

fn init_sentry(settings: &turnpoint_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
