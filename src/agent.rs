//! The tick-synchronized control loop.
//!
//! The host calls `Agent::step` once per simulation tick with the current
//! snapshot. Most ticks replay the cached command; every `tick_skip` ticks
//! (and unconditionally on the first call) the agent runs the full
//! encode -> policy -> decode pipeline and refreshes the cache. Decision
//! cost is thereby amortized over `tick_skip` ticks.
//!
//! One `Agent` exclusively owns its policy and tick-skip state and controls
//! exactly one simulated car; hosting several cars means several independent
//! agents with nothing shared and no synchronization.

use thiserror::Error;

use crate::action::{build_decoder, ActionDecoder, ControllerCommand, DecodeError, DecoderVariant};
use crate::obs::{build_encoder, EncoderVariant, ObservationEncoder, ObservationHistory};
use crate::policy::{Policy, PolicyAdapter, PolicyError};
use crate::state::{GameStateSnapshot, SnapshotError};

/// What the loop does when the policy invocation itself fails mid-decision.
///
/// Shape mismatches and malformed snapshots always propagate regardless of
/// this setting; substituting a command for those would mask a broken
/// deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Re-raise to the host; the tick produces no command.
    #[default]
    Propagate,
    /// Substitute the last known-good cached command. Propagates anyway on
    /// the first decision, when no cached command exists.
    HoldLastCommand,
}

/// Fixed per-agent configuration, immutable for the agent's lifetime.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Ticks a decided command is held before deciding again. Must be >= 1.
    pub tick_skip: u32,
    /// Observation layout the policy was trained on.
    pub encoder: EncoderVariant,
    /// Action mapping the policy was trained on.
    pub decoder: DecoderVariant,
    /// Tracked-agent slots in the observation; farther cars are dropped.
    pub max_agent_slots: usize,
    /// Observation frames the policy consumes per decision. Must be >= 1.
    pub history_len: usize,
    /// Mid-decision policy failure handling.
    pub on_policy_failure: FailurePolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            tick_skip: 8,
            encoder: EncoderVariant::Default,
            decoder: DecoderVariant::Continuous,
            max_agent_slots: 5,
            history_len: 1,
            on_policy_failure: FailurePolicy::Propagate,
        }
    }
}

/// Errors rejecting an agent configuration at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("tick_skip must be at least 1")]
    ZeroTickSkip,

    #[error("history_len must be at least 1")]
    ZeroHistoryLen,

    #[error(
        "policy input dim {policy} does not match encoder: obs dim {obs_dim} x history {history} = {expected}"
    )]
    InputDimMismatch {
        policy: usize,
        obs_dim: usize,
        history: usize,
        expected: usize,
    },

    #[error("policy output dim {policy} does not match decoder action dim {decoder}")]
    OutputDimMismatch { policy: usize, decoder: usize },
}

/// Errors a single `step` call can surface to the host.
#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// One controlled car's decision loop: encoder, policy, decoder, and the
/// tick-skip state tying them together.
pub struct Agent {
    encoder: Box<dyn ObservationEncoder>,
    adapter: PolicyAdapter,
    decoder: Box<dyn ActionDecoder>,
    history: ObservationHistory,
    tick_skip: u32,
    on_policy_failure: FailurePolicy,
    last_decision_tick: Option<u64>,
    cached: Option<ControllerCommand>,
    last_tick: Option<u64>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("tick_skip", &self.tick_skip)
            .field("on_policy_failure", &self.on_policy_failure)
            .field("last_decision_tick", &self.last_decision_tick)
            .field("cached", &self.cached)
            .field("last_tick", &self.last_tick)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Builds an agent, verifying the shape contract between the configured
    /// encoder/decoder and the injected policy. Any mismatch is rejected
    /// here rather than surfacing as a per-tick error later.
    pub fn new(config: &AgentConfig, policy: Box<dyn Policy>) -> Result<Agent, BuildError> {
        if config.tick_skip == 0 {
            return Err(BuildError::ZeroTickSkip);
        }
        if config.history_len == 0 {
            return Err(BuildError::ZeroHistoryLen);
        }

        let encoder = build_encoder(config.encoder, config.max_agent_slots);
        let decoder = build_decoder(config.decoder);
        let adapter = PolicyAdapter::new(policy);

        let expected_input = encoder.obs_dim() * config.history_len;
        if adapter.input_dim() != expected_input {
            return Err(BuildError::InputDimMismatch {
                policy: adapter.input_dim(),
                obs_dim: encoder.obs_dim(),
                history: config.history_len,
                expected: expected_input,
            });
        }
        if adapter.output_dim() != decoder.action_dim() {
            return Err(BuildError::OutputDimMismatch {
                policy: adapter.output_dim(),
                decoder: decoder.action_dim(),
            });
        }

        let history = ObservationHistory::new(config.history_len, encoder.obs_dim());
        Ok(Agent {
            encoder,
            adapter,
            decoder,
            history,
            tick_skip: config.tick_skip,
            on_policy_failure: config.on_policy_failure,
            last_decision_tick: None,
            cached: None,
            last_tick: None,
        })
    }

    /// Observation length the configured encoder produces.
    pub fn obs_dim(&self) -> usize {
        self.encoder.obs_dim()
    }

    /// Tick of the most recent decision, if any.
    pub fn last_decision_tick(&self) -> Option<u64> {
        self.last_decision_tick
    }

    /// True if the next `step` will run the decision pipeline.
    pub fn decision_due(&self, tick: u64) -> bool {
        match self.last_decision_tick {
            None => true,
            Some(last) => tick.saturating_sub(last) >= u64::from(self.tick_skip),
        }
    }

    /// Advances one simulation tick: returns the cached command, or runs
    /// the decision pipeline when one is due.
    ///
    /// Tick-skip state is committed only after the whole pipeline succeeds,
    /// so a failed tick leaves the cache, history, and decision clock
    /// exactly as they were.
    pub fn step(&mut self, snapshot: &GameStateSnapshot) -> Result<ControllerCommand, StepError> {
        if let Some(last) = self.last_tick {
            if snapshot.tick < last {
                return Err(SnapshotError::NonMonotonicTick {
                    last,
                    current: snapshot.tick,
                }
                .into());
            }
        }
        self.last_tick = Some(snapshot.tick);

        if !self.decision_due(snapshot.tick) {
            // Cached command exists whenever a decision has been made.
            return Ok(self.cached.expect("cache present after first decision"));
        }

        let obs = self.encoder.encode(snapshot)?;
        let stacked = self.history.stacked_with(&obs);

        let raw = match self.adapter.infer(&stacked) {
            Ok(raw) => raw,
            Err(PolicyError::Inference(msg))
                if self.on_policy_failure == FailurePolicy::HoldLastCommand =>
            {
                match self.cached {
                    // Known-good substitute; the decision clock is left
                    // untouched so the next tick decides against a fresh
                    // snapshot.
                    Some(cmd) => return Ok(cmd),
                    None => return Err(PolicyError::Inference(msg).into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        let command = self.decoder.decode(&raw)?;

        self.history.push(obs);
        self.cached = Some(command);
        self.last_decision_tick = Some(snapshot.tick);
        Ok(command)
    }
}
