//! Scripted-episode harness for exercising the decision loop.
//!
//! Drives independent agents through a toy kinematic episode (ring-placed
//! cars, a bouncing ball, constant-velocity integration) and records one
//! JSONL line per decision tick. This is a development harness for watching
//! the loop behave end to end, not a physics simulation and not the host.

use std::f32::consts::TAU;
use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::action::{ControllerCommand, DecoderVariant};
use crate::agent::{Agent, AgentConfig};
use crate::obs::EncoderVariant;
use crate::policy::RandomPolicy;
use crate::state::{BallState, CarState, GameStateSnapshot, Vec3};

/// Half-extent of the toy field the scripted ball bounces within.
const FIELD_EXTENT: f32 = 4000.0;

/// Scale from analog command values to toy car velocity.
const DRIVE_SPEED: f32 = 500.0;

/// Seconds per simulation tick.
const TICK_DT: f32 = 1.0 / 120.0;

/// Configuration for harness runs.
#[derive(Clone)]
pub struct EpisodeConfig {
    /// Number of episodes to run.
    pub episodes: usize,
    /// Simulation ticks per episode.
    pub ticks: u64,
    /// Independent agents (and cars) per episode.
    pub agents: usize,
    /// Tick-skip interval for every agent.
    pub tick_skip: u32,
    /// Observation layout.
    pub encoder: EncoderVariant,
    /// Action mapping.
    pub decoder: DecoderVariant,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Number of parallel threads for concurrent episodes.
    pub threads: usize,
    /// Suppress per-episode progress output.
    pub quiet: bool,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        EpisodeConfig {
            episodes: 1,
            ticks: 1200,
            agents: 2,
            tick_skip: 8,
            encoder: EncoderVariant::Default,
            decoder: DecoderVariant::Continuous,
            seed: 0,
            threads: 4,
            quiet: false,
        }
    }
}

/// One decision tick's worth of output, serialized as a JSONL line.
#[derive(Debug, Serialize)]
pub struct DecisionRecord {
    pub episode: usize,
    pub tick: u64,
    pub agent: usize,
    #[serde(flatten)]
    pub command: ControllerCommand,
}

/// Totals across a harness run.
#[derive(Debug, Default)]
pub struct EpisodeSummary {
    pub episodes: usize,
    pub decisions: usize,
}

/// Runs the configured episodes, writing JSONL records to `out`.
///
/// When `config.threads > 1` episodes run concurrently using rayon; agents
/// within an episode always step sequentially, matching the synchronous
/// host model.
pub fn run(config: &EpisodeConfig, out: &mut dyn Write) -> io::Result<EpisodeSummary> {
    let records = if config.threads > 1 && config.episodes > 1 {
        run_parallel(config)
    } else {
        (0..config.episodes)
            .flat_map(|e| run_episode(config, e))
            .collect()
    };

    for record in &records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(EpisodeSummary {
        episodes: config.episodes,
        decisions: records.len(),
    })
}

/// Plays episodes concurrently on a dedicated rayon pool.
fn run_parallel(config: &EpisodeConfig) -> Vec<DecisionRecord> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .expect("failed to build rayon thread pool");

    pool.install(|| {
        (0..config.episodes)
            .into_par_iter()
            .flat_map_iter(|e| run_episode(config, e))
            .collect()
    })
}

/// Plays one scripted episode and collects its decision records.
fn run_episode(config: &EpisodeConfig, episode: usize) -> Vec<DecisionRecord> {
    let seed = if config.seed == 0 {
        0
    } else {
        config.seed.wrapping_add(episode as u64)
    };
    let mut rng = if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    };

    let agent_config = AgentConfig {
        tick_skip: config.tick_skip,
        encoder: config.encoder,
        decoder: config.decoder,
        ..AgentConfig::default()
    };

    let obs_dim = crate::obs::build_encoder(config.encoder, agent_config.max_agent_slots).obs_dim();
    let input_dim = obs_dim * agent_config.history_len;

    let mut agents: Vec<Agent> = (0..config.agents)
        .map(|_| {
            let policy = harness_policy(config.decoder, input_dim, rng.gen());
            Agent::new(&agent_config, policy)
                .expect("harness agent dims are derived from the config")
        })
        .collect();

    let mut world = World::scripted(config.agents, &mut rng);
    let mut records = Vec::new();

    for tick in 0..config.ticks {
        for (i, agent) in agents.iter_mut().enumerate() {
            let snapshot = world.snapshot_for(tick, i);
            let decided = agent.decision_due(tick);
            let command = agent
                .step(&snapshot)
                .expect("scripted snapshots are always well-formed");
            if decided {
                records.push(DecisionRecord {
                    episode,
                    tick,
                    agent: i,
                    command,
                });
            }
            world.apply(i, command);
        }
        world.integrate();
    }

    if !config.quiet {
        eprintln!(
            "info string episode {} finished: {} ticks, {} decisions",
            episode,
            config.ticks,
            records.len()
        );
    }
    records
}

/// Builds a random policy whose output matches the decoder variant's
/// contract: analog values for the continuous mapping, valid bucket
/// indexes for the lookup mapping.
fn harness_policy(decoder: DecoderVariant, input_dim: usize, seed: u64) -> Box<RandomPolicy> {
    match decoder {
        DecoderVariant::Continuous => Box::new(RandomPolicy::new(
            input_dim,
            crate::action::continuous::ACTION_DIM,
            seed,
        )),
        DecoderVariant::Lookup => Box::new(RandomPolicy::bounded(
            input_dim,
            1,
            0.0,
            (crate::action::lookup::TABLE_LEN - 1) as f32,
            seed,
        )),
    }
}

/// The toy world: one ball, one car per agent, constant-velocity motion.
struct World {
    ball_pos: Vec3,
    ball_vel: Vec3,
    cars: Vec<CarState>,
    car_velocities: Vec<Vec3>,
}

impl World {
    /// Ring-places `agents` cars around the origin and launches the ball in
    /// a random direction.
    fn scripted(agents: usize, rng: &mut SmallRng) -> World {
        let cars = (0..agents)
            .map(|i| {
                let angle = TAU * i as f32 / agents.max(1) as f32;
                let mut car = CarState::resting((i % 2) as u8);
                car.physics.position = Vec3::new(1000.0 * angle.cos(), 1000.0 * angle.sin(), 17.0);
                car.physics.rotation.yaw = angle + TAU / 2.0;
                car
            })
            .collect();

        let launch = rng.gen_range(0.0..TAU);
        World {
            ball_pos: Vec3::new(0.0, 0.0, 93.0),
            ball_vel: Vec3::new(1200.0 * launch.cos(), 1200.0 * launch.sin(), 0.0),
            cars,
            car_velocities: vec![Vec3::ZERO; agents],
        }
    }

    /// Builds the snapshot agent `i` sees at `tick`.
    fn snapshot_for(&self, tick: u64, i: usize) -> GameStateSnapshot {
        let mut ball = BallState::default();
        ball.physics.position = self.ball_pos;
        ball.physics.velocity = self.ball_vel;
        GameStateSnapshot {
            tick,
            ball: Some(ball),
            cars: self.cars.clone(),
            controlled_index: i,
        }
    }

    /// Converts agent `i`'s command into a toy velocity.
    fn apply(&mut self, i: usize, command: ControllerCommand) {
        let yaw = self.cars[i].physics.rotation.yaw;
        let speed = DRIVE_SPEED * command.throttle * if command.boost { 2.0 } else { 1.0 };
        self.car_velocities[i] = Vec3::new(speed * yaw.cos(), speed * yaw.sin(), 0.0);
        self.cars[i].physics.rotation.yaw = yaw + 0.02 * command.steer;
    }

    /// Advances ball and cars one tick, bouncing the ball off the field
    /// walls.
    fn integrate(&mut self) {
        self.ball_pos = self.ball_pos + self.ball_vel * TICK_DT;
        if self.ball_pos.x.abs() > FIELD_EXTENT {
            self.ball_vel.x = -self.ball_vel.x;
        }
        if self.ball_pos.y.abs() > FIELD_EXTENT {
            self.ball_vel.y = -self.ball_vel.y;
        }
        for (car, vel) in self.cars.iter_mut().zip(&self.car_velocities) {
            car.physics.position = car.physics.position + *vel * TICK_DT;
            car.physics.velocity = *vel;
        }
    }
}
