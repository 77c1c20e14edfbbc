//! Marjana - uncleaned-region watchdog for a robot vacuum controller
//!
//! Polls the controller once per interval:
//!
//! 1. Fetch the cleaning grid, robot pose and feature map
//! 2. Decode the grid, group uncleaned regions, compute centroids
//! 3. Check the pose against the boundary thresholds and request a spot
//!    clean when it is violated
//! 4. Write an SVG snapshot of the cycle
//!
//! # Usage
//!
//! ```bash
//! # Defaults (or ./marjana.toml if present)
//! marjana
//!
//! # Custom config file
//! marjana marjana.toml
//!
//! # Override the controller address
//! marjana --robot http://192.168.1.40:10009
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use marjana::io::{CycleRenderer, HttpActionGateway, RobotClient, SvgConfig};
use marjana::{ActionOutcome, CleaningOrchestrator, MarjanaConfig, MarjanaError, Result};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marjana=info".parse().expect("static directive")),
        )
        .init();

    let config = load_config()?;

    info!("Marjana v{}", env!("CARGO_PKG_VERSION"));
    info!("Controller: {}", config.connection.base_url);
    info!(
        "Boundary thresholds: x < {:.1} or y < {:.1} -> spot clean at ({:.1}, {:.1})",
        config.boundary.threshold_x,
        config.boundary.threshold_y,
        config.action.target_x,
        config.action.target_y
    );

    let client = RobotClient::new(&config.connection.base_url, config.request_timeout())?;
    let gateway = HttpActionGateway::new(client.clone(), config.action.cleaning_parameter_set);

    let mut orchestrator =
        CleaningOrchestrator::new(gateway, config.thresholds(), config.action_target())
            .with_grouper(config.cycle.grouping.build());
    info!("Region grouping: {:?}", config.cycle.grouping);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| MarjanaError::Config(format!("Failed to install Ctrl-C handler: {}", e)))?;

    let interval = config.cycle_interval();

    while running.load(Ordering::SeqCst) {
        let started = Instant::now();

        if let Err(e) = run_once(&config, &client, &mut orchestrator) {
            error!("Cycle aborted: {}", e);
        }

        sleep_while_running(&running, interval.saturating_sub(started.elapsed()));
    }

    info!("Marjana stopped after {} cycles", orchestrator.cycles());
    Ok(())
}

/// Resolve configuration from the command line.
///
/// Supports `marjana <path>` and `marjana --robot <base_url>`; falls back
/// to `./marjana.toml`, then to built-in defaults.
fn load_config() -> Result<MarjanaConfig> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        let path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", path);
        MarjanaConfig::load(path)?
    } else if Path::new("marjana.toml").exists() {
        info!("Loading configuration from marjana.toml");
        MarjanaConfig::load(Path::new("marjana.toml"))?
    } else {
        info!("Using default configuration");
        MarjanaConfig::default()
    };

    let robot = args
        .iter()
        .position(|a| a == "--robot")
        .and_then(|i| args.get(i + 1))
        .cloned();
    if let Some(base_url) = robot {
        info!("Using controller: {}", base_url);
        config.connection.base_url = base_url;
    }

    Ok(config)
}

/// One fetch-evaluate-render pass.
///
/// A failed grid fetch aborts the cycle. A failed pose fetch runs the
/// cycle without pose data. Feature map, polygons and SVG export are
/// best effort.
fn run_once(
    config: &MarjanaConfig,
    client: &RobotClient,
    orchestrator: &mut CleaningOrchestrator<HttpActionGateway>,
) -> Result<()> {
    let grid = client.grid_map()?;

    let pose = match client.robot_pose() {
        Ok(pose) => Some(pose),
        Err(e) => {
            warn!("Pose fetch failed: {}", e);
            None
        }
    };

    let feature_map = match client.feature_map() {
        Ok(payload) => Some(payload.map),
        Err(e) => {
            warn!("Feature map fetch failed: {}", e);
            None
        }
    };
    orchestrator.set_map_id(feature_map.as_ref().and_then(|m| m.map_id()));

    let result = orchestrator.run_cycle(&grid, pose.as_ref())?;

    info!(
        "Cycle {}: {} regions, {} uncleaned cells, verdict {:?}",
        result.cycle,
        result.regions.len(),
        result.uncleaned_cells(),
        result.verdict
    );
    if let Some(largest) = result.largest_region() {
        debug!(
            "Largest region: {} cells around ({:.1}, {:.1})",
            largest.size(),
            largest.centroid.x,
            largest.centroid.y
        );
    }
    if let ActionOutcome::Requested(target) = result.action {
        info!("Spot clean requested at ({:.1}, {:.1})", target.x, target.y);
    }

    if config.output.render {
        let polygons = match client.polygons() {
            Ok(payload) => payload.map.polygons,
            Err(e) => {
                debug!("Polygon fetch failed: {}", e);
                Vec::new()
            }
        };

        let mut renderer = CycleRenderer::new(SvgConfig::default())
            .with_polygons(polygons)
            .with_thresholds(config.thresholds());
        if let Some(map) = feature_map {
            renderer = renderer.with_feature_map(map);
        }
        if let Err(e) = renderer.save(&result, Path::new(&config.output.svg_path)) {
            warn!("SVG export failed: {}", e);
        }
    }

    Ok(())
}

/// Sleep in short slices so Ctrl-C stops the loop promptly
fn sleep_while_running(running: &AtomicBool, total: Duration) {
    let slice = Duration::from_millis(100);
    let deadline = Instant::now() + total;

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(slice.min(deadline - now));
    }
}
