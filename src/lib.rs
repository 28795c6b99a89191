//! Slipstream decision-loop adapter library.
//!
//! Connects a tick-synchronized simulation host to an externally trained
//! policy: snapshots are encoded into flat observations, the policy is
//! invoked on a fixed tick-skip cadence, and its raw output is decoded into
//! controller commands held between decisions.

pub mod action;
pub mod agent;
pub mod episode;
pub mod obs;
pub mod policy;
pub mod state;
