//! Walks one agent across an open yard and logs every transition.
//!
//! ```text
//! tiller --dest 12 -4 --wall --verbose
//! ```
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec3;
use log::{debug, info};
use tiller::{
    apply_move_command, init_logging, Agent, AgentPose, AgentTunables, CollisionMask, LogSink,
    MoveState, ObjectHandle, ObjectTable, OccluderSet, WorldView, TRIGGER_COUNT,
};

const BODY: ObjectHandle = ObjectHandle(1);
const BEACON: ObjectHandle = ObjectHandle(2);
const WALL: ObjectHandle = ObjectHandle(3);

/// Steer an agent to a destination while watching a beacon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Destination on the ground plane
    #[arg(
        long,
        num_args = 2,
        value_names = ["X", "Y"],
        allow_negative_numbers = true,
        required = true
    )]
    dest: Vec<f32>,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// JSON file overriding the default tunables
    #[arg(long)]
    tunables: Option<PathBuf>,

    /// Put a wall between the start and the beacon
    #[arg(long)]
    wall: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_tunables(file: Option<&PathBuf>) -> Result<AgentTunables> {
    file.map_or_else(
        || Ok(AgentTunables::default()),
        |path| {
            AgentTunables::from_path(path)
                .with_context(|| format!("loading tunables from {}", path.display()))
        },
    )
}

fn build_yard(destination: Vec3, wall: bool) -> OccluderSet {
    let mut yard = OccluderSet::new();
    if wall {
        let middle = destination * 0.5;
        yard.add(
            WALL,
            middle - Vec3::new(1.0, 1.0, 1.0),
            middle + Vec3::new(1.0, 1.0, 3.0),
            CollisionMask::INTERIOR,
        );
    }
    yard
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let [x, y] = args.dest.as_slice() else {
        bail!("--dest takes exactly two values");
    };
    let destination = Vec3::new(*x, *y, 0.0);
    let tunables = load_tunables(args.tunables.as_ref())?;

    let mut objects = ObjectTable::new();
    objects.insert(BEACON, destination);
    let yard = build_yard(destination, args.wall);
    let world = WorldView {
        objects: &objects,
        rays: &yard,
    };

    let mut agent = Agent::new("walker", &tunables);
    agent.intent_mut().set_destination(destination, true);
    agent
        .intent_mut()
        .set_aim_object(BEACON, Vec3::new(0.0, 0.0, 1.5));
    let mut pose = AgentPose::new(Vec3::ZERO, 0.0).with_body(BODY);
    let mut sink = LogSink::new(agent.name());

    let mut ticks_run = 0;
    for tick in 0..args.ticks {
        ticks_run = tick + 1;
        let command = agent.tick(&pose, world, [false; TRIGGER_COUNT], &mut sink);
        pose = apply_move_command(pose, &command, tunables.walk_distance_per_tick);
        let camera = agent.update_camera(&pose, &yard);
        debug!(
            "tick {tick}: eye {:?} yaw {:.3} camera {:?}",
            pose.eye, pose.yaw, camera.position
        );
        if agent.intent().move_state() == MoveState::Stopped {
            break;
        }
    }

    info!(
        "{} {} at {:?} after {ticks_run} ticks (beacon visible: {})",
        agent.name(),
        match agent.intent().move_state() {
            MoveState::Stopped => "stopped",
            MoveState::Moving => "still moving",
        },
        pose.eye,
        agent.intent().target_in_los()
    );
    Ok(())
}
