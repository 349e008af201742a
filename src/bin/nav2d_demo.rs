//! Replays a synthetic map and trajectory through an overlay and logs the
//! resulting viewport and marker state.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use nav2d_viz::common::Pose;
use nav2d_viz::config::OverlayConfig;
use nav2d_viz::display::{DisplayRoot, Stage};
use nav2d_viz::navigation::occupancy_grid::{GridInfo, OccupancyGrid};
use nav2d_viz::navigation::OccupancyGridMarker;
use nav2d_viz::tf::client::TF_TOPIC;
use nav2d_viz::tf::{TfClient, Transform, TransformStamped};
use nav2d_viz::transport::{LocalBus, Message};
use nav2d_viz::visualization::source::{Connections, PoseEventEmitter};
use nav2d_viz::Nav2dViz;
use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    Topic,
    Tf,
    Client,
}

/// Drive a map overlay with synthetic data
#[derive(Parser, Debug)]
#[command(name = "nav2d_demo", version, about)]
struct Cli {
    /// YAML overlay configuration
    #[arg(long)]
    config: Option<String>,

    /// Display width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Display height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Number of trajectory samples to replay
    #[arg(long, default_value_t = 40)]
    ticks: u32,

    /// How the robot pose is delivered
    #[arg(long, value_enum, default_value_t = SourceKind::Topic)]
    source: SourceKind,
}

enum Feed {
    Topic(String),
    Tf(String, String),
    Client(Arc<PoseEventEmitter>),
}

impl Feed {
    fn send(&self, bus: &LocalBus, pose: Pose) -> Result<()> {
        match self {
            Feed::Topic(topic) => {
                bus.publish(topic, Message::Pose(pose))?;
            }
            Feed::Tf(parent, child) => {
                bus.publish(
                    TF_TOPIC,
                    Message::Tf(vec![TransformStamped {
                        parent_frame_id: parent.clone(),
                        child_frame_id: child.clone(),
                        transform: Transform {
                            translation: pose.position,
                            rotation: pose.orientation,
                        },
                    }]),
                )?;
            }
            Feed::Client(emitter) => emitter.emit(&pose)?,
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => OverlayConfig::from_file(path).with_context(|| format!("loading {}", path))?,
        None => OverlayConfig::default(),
    };
    // every sample of the replay should reach the marker
    config.throttle_rate_ms = 0;

    let bus = Arc::new(LocalBus::new());
    let stage = Arc::new(std::sync::RwLock::new(Stage::new(cli.width, cli.height)));
    let mut connections = Connections::with_transport(bus.clone());

    let feed = match cli.source {
        SourceKind::Topic => Feed::Topic(config.robot_pose.clone()),
        SourceKind::Tf => {
            connections.tf_client = Some(TfClient::connect(bus.clone(), &config.fixed_frame)?);
            Feed::Tf(config.fixed_frame.clone(), config.robot_pose.clone())
        }
        SourceKind::Client => {
            let emitter = Arc::new(PoseEventEmitter::new());
            connections.robot_client = Some(emitter.clone());
            Feed::Client(emitter)
        }
    };

    let overlay = OccupancyGridMarker::new(&config, stage.clone(), &connections)?;
    info!(source = overlay.visualizator().source_name(), "overlay built");

    let mut core = Nav2dViz::new();
    core.register(overlay);
    core.init()?;

    // 10m x 6m room, 5cm cells, centred on the world origin
    let grid = GridInfo::new(200, 120, 0.05).with_origin(-5.0, -3.0);
    bus.publish(&config.map_topic, Message::OccupancyGrid(OccupancyGrid::unknown(grid)))?;

    let mut interval = tokio::time::interval(Duration::from_millis(50));
    for tick in 0..cli.ticks {
        interval.tick().await;
        let angle = TAU * tick as f64 / cli.ticks.max(1) as f64;
        let pose = Pose::from_xy_yaw(2.0 * angle.cos(), 2.0 * angle.sin(), angle + TAU / 4.0);
        feed.send(&bus, pose)?;

        let overlay = core
            .grid_marker_mut()
            .context("overlay is not registered")?;
        let state = overlay.visualizator().marker_state()?;
        let (screen_x, screen_y) = stage
            .read()
            .map_err(|_| anyhow::anyhow!("display root poisoned"))?
            .to_screen(state.x, state.y);
        info!(
            tick,
            x = state.x,
            y = state.y,
            rotation = state.rotation,
            screen_x,
            screen_y,
            "marker"
        );
    }

    let (scale, (offset_x, offset_y)) = {
        let root = stage
            .read()
            .map_err(|_| anyhow::anyhow!("display root poisoned"))?;
        (root.scale().0, root.offset())
    };
    let fitted = core
        .grid_marker_mut()
        .and_then(|o| o.viewport().ok().flatten())
        .is_some();
    info!(fitted, scale, offset_x, offset_y, "final viewport");

    core.shutdown()?;
    Ok(())
}
