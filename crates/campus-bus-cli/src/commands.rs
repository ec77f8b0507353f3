//! Command handlers

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{Cli, Commands};
use crate::output::{
    output_ack, output_bus, output_fleet, output_routes, output_stats, print_broadcast_stats,
    print_diff, print_poll_stats,
};
use campus_bus_app::api::{serve, shutdown_signal, AppState};
use campus_bus_app::client::{BroadcastSession, Broadcaster, FleetClient, LogOnlySink, Poller, SampleFeed};
use campus_bus_app::config::{Config, SyncMode};
use campus_bus_app::repository::open_fleet_seed;
use campus_bus_domain::model::{GeoSample, PositionReport};
use campus_bus_types::{Error, OutputFormat, Result, TransportError};
use tracing::info;

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?.with_env_overrides();

    // Override from CLI args
    if let Some(ref server) = cli.server {
        config.server_url = server.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Serve { bind, seed } => cmd_serve(config, bind.clone(), seed.clone()).await,

        Commands::Report {
            bus_id,
            route,
            lat,
            lng,
            occupancy,
            status,
        } => {
            let report = PositionReport::new(bus_id.as_str(), route.as_str(), *lat, *lng, *occupancy, *status);
            cmd_report(&config, report, output_format).await
        }

        Commands::Broadcast {
            bus_id,
            route,
            lat,
            lng,
            samples,
            occupancy,
            status,
            interval,
            count,
            log_only,
        } => {
            let session = BroadcastSession {
                bus_id: bus_id.clone(),
                route: route.clone(),
                occupancy: *occupancy,
                status: *status,
            };
            let feed = sample_feed(samples.as_ref(), *lat, *lng)?;
            let interval = interval
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.broadcast_interval());
            // Log-only if: --log-only OR config.sync_mode=log-only
            let log_only = *log_only || config.sync_mode == SyncMode::LogOnly;
            cmd_broadcast(&config, session, feed, interval, *count, log_only).await
        }

        Commands::Fleet { route } => cmd_fleet(&config, route.as_deref(), output_format).await,

        Commands::Watch {
            route,
            interval,
            count,
        } => {
            let interval = interval
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.poll_interval());
            cmd_watch(&config, route.clone(), interval, *count, output_format).await
        }

        Commands::Bus { bus_id } => cmd_bus(&config, bus_id, output_format).await,

        Commands::Routes => cmd_routes(&config, output_format).await,

        Commands::Stats => cmd_stats(&config, output_format).await,

        Commands::Ask { message } => cmd_ask(&config, message).await,

        Commands::Config {
            show,
            set_bind,
            set_server,
            set_poll_interval,
            set_broadcast_interval,
            set_stale_after,
            set_default_capacity,
            set_log_only,
            set_seed,
            set_model,
            set_output,
            reset,
        } => cmd_config(ConfigUpdate {
            show: *show,
            set_bind: set_bind.clone(),
            set_server: set_server.clone(),
            set_poll_interval: *set_poll_interval,
            set_broadcast_interval: *set_broadcast_interval,
            set_stale_after: *set_stale_after,
            set_default_capacity: *set_default_capacity,
            set_log_only: *set_log_only,
            set_seed: set_seed.clone(),
            set_model: set_model.clone(),
            set_output: *set_output,
            reset: *reset,
        }),
    }
}

fn client(config: &Config) -> Result<FleetClient> {
    Ok(FleetClient::new(&config.server_url)?)
}

fn sample_feed(samples: Option<&PathBuf>, lat: Option<f64>, lng: Option<f64>) -> Result<SampleFeed> {
    match (samples, lat, lng) {
        (Some(path), _, _) => SampleFeed::load_jsonl(path),
        (None, Some(lat), Some(lng)) => Ok(SampleFeed::fixed(GeoSample::at(lat, lng))),
        _ => Err(Error::Samples(
            "either --samples or both --lat and --lng are required".to_string(),
        )),
    }
}

async fn cmd_serve(mut config: Config, bind: Option<String>, seed: Option<PathBuf>) -> Result<()> {
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    if seed.is_some() {
        config.seed_file = seed;
    }

    let seed = open_fleet_seed(&config)?;
    info!(
        routes = seed.routes.len(),
        roster = seed.roster.len(),
        stale_after_secs = config.stale_after_secs,
        "Starting fleet service"
    );

    let address = config.bind_address.clone();
    let state = AppState::new(config, seed, Config::assistant_api_key())?;
    serve(&address, state).await
}

async fn cmd_report(config: &Config, report: PositionReport, output_format: OutputFormat) -> Result<()> {
    let ack = client(config)?.report(&report).await?;
    output_ack(output_format, &ack)
}

async fn cmd_broadcast(
    config: &Config,
    session: BroadcastSession,
    feed: SampleFeed,
    interval: Duration,
    count: Option<u64>,
    log_only: bool,
) -> Result<()> {
    println!(
        "Broadcasting {} on {} every {}s{} (Ctrl+C to stop)",
        session.bus_id,
        session.route,
        interval.as_secs(),
        if log_only { ", log only" } else { "" }
    );

    let stats = if log_only {
        let mut broadcaster = Broadcaster::new(LogOnlySink, session, feed, interval);
        broadcaster.run(count, shutdown_signal()).await
    } else {
        let mut broadcaster = Broadcaster::new(client(config)?, session, feed, interval);
        broadcaster.run(count, shutdown_signal()).await
    };

    print_broadcast_stats(&stats);
    Ok(())
}

async fn cmd_fleet(config: &Config, route: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let entries = client(config)?.locations(route).await?;
    output_fleet(output_format, &entries)
}

async fn cmd_watch(
    config: &Config,
    route: Option<String>,
    interval: Duration,
    count: Option<u64>,
    output_format: OutputFormat,
) -> Result<()> {
    if output_format == OutputFormat::Table {
        println!(
            "Watching {} every {}s (Ctrl+C to stop)",
            route.as_deref().unwrap_or("all routes"),
            interval.as_secs()
        );
    }

    let mut poller = Poller::new(client(config)?, route, interval);
    let stats = poller
        .run(count, shutdown_signal(), |diff, current| {
            print_diff(output_format, diff, current)
        })
        .await;

    if output_format == OutputFormat::Table {
        print_poll_stats(&stats);
    }
    Ok(())
}

async fn cmd_bus(config: &Config, bus_id: &str, output_format: OutputFormat) -> Result<()> {
    match client(config)?.bus(bus_id).await {
        Ok(entry) => output_bus(output_format, &entry),
        Err(TransportError::Status { status: 404, .. }) => {
            Err(Error::BusNotFound(bus_id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_routes(config: &Config, output_format: OutputFormat) -> Result<()> {
    let routes = client(config)?.routes().await?;
    output_routes(output_format, &routes)
}

async fn cmd_stats(config: &Config, output_format: OutputFormat) -> Result<()> {
    let summary = client(config)?.stats().await?;
    output_stats(output_format, &summary)
}

async fn cmd_ask(config: &Config, message: &str) -> Result<()> {
    let reply = client(config)?.ask(message).await?;
    println!("{}", reply);
    Ok(())
}

struct ConfigUpdate {
    show: bool,
    set_bind: Option<String>,
    set_server: Option<String>,
    set_poll_interval: Option<u64>,
    set_broadcast_interval: Option<u64>,
    set_stale_after: Option<u64>,
    set_default_capacity: Option<u32>,
    set_log_only: Option<bool>,
    set_seed: Option<PathBuf>,
    set_model: Option<String>,
    set_output: Option<OutputFormat>,
    reset: bool,
}

fn cmd_config(update: ConfigUpdate) -> Result<()> {
    if update.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let modified = apply_config_update(&mut config, &update);

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if update.show || !modified {
        println!("{}", config);
    }

    Ok(())
}

/// Apply the `--set-*` flags, returning whether anything changed
fn apply_config_update(config: &mut Config, update: &ConfigUpdate) -> bool {
    let mut modified = false;

    if let Some(ref bind) = update.set_bind {
        config.bind_address = bind.clone();
        modified = true;
    }

    if let Some(ref server) = update.set_server {
        config.server_url = server.clone();
        modified = true;
    }

    if let Some(secs) = update.set_poll_interval {
        config.poll_interval_secs = secs;
        modified = true;
    }

    if let Some(secs) = update.set_broadcast_interval {
        config.broadcast_interval_secs = secs;
        modified = true;
    }

    if let Some(secs) = update.set_stale_after {
        config.stale_after_secs = secs;
        modified = true;
    }

    if let Some(capacity) = update.set_default_capacity {
        config.default_capacity = capacity;
        modified = true;
    }

    if let Some(log_only) = update.set_log_only {
        config.sync_mode = if log_only { SyncMode::LogOnly } else { SyncMode::Sync };
        modified = true;
    }

    if let Some(ref seed) = update.set_seed {
        config.seed_file = Some(seed.clone());
        modified = true;
    }

    if let Some(ref model) = update.set_model {
        config.assistant_model = model.clone();
        modified = true;
    }

    if let Some(output_format) = update.set_output {
        config.output_format = output_format;
        modified = true;
    }

    modified
}
