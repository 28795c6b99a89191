//! Bounded history of recent observations for policies with temporal context.
//!
//! Fixed-capacity ring: pushing when full evicts the oldest frame. Stacking
//! concatenates frames oldest to newest into one `capacity * obs_dim`
//! vector; frames not yet observed read as zeros, so the stacked shape is
//! stable from the very first tick.

use std::collections::VecDeque;

/// Ring of the most recent observation vectors.
pub struct ObservationHistory {
    frames: VecDeque<Vec<f32>>,
    capacity: usize,
    obs_dim: usize,
}

impl ObservationHistory {
    /// Creates an empty history holding up to `capacity` frames of
    /// `obs_dim` floats each.
    pub fn new(capacity: usize, obs_dim: usize) -> ObservationHistory {
        ObservationHistory {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            obs_dim,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn obs_dim(&self) -> usize {
        self.obs_dim
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Length of the stacked vector.
    pub fn stacked_dim(&self) -> usize {
        self.capacity * self.obs_dim
    }

    /// Appends a frame, evicting the oldest when full.
    ///
    /// Panics if the frame length does not match `obs_dim`; callers encode
    /// with a fixed-dim encoder, so a mismatch is a programming error.
    pub fn push(&mut self, frame: Vec<f32>) {
        assert_eq!(frame.len(), self.obs_dim, "frame length != obs_dim");
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Stacks held frames oldest to newest, zero-filling unobserved slots
    /// at the front.
    pub fn stacked(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.stacked_dim()];
        let lead = self.capacity - self.frames.len();
        for (i, frame) in self.frames.iter().enumerate() {
            let base = (lead + i) * self.obs_dim;
            out[base..base + self.obs_dim].copy_from_slice(frame);
        }
        out
    }

    /// Stacks as if `newest` had just been pushed, without mutating the
    /// ring. Used by the control loop to run inference before committing
    /// the frame, so a failed decision leaves the history untouched.
    pub fn stacked_with(&self, newest: &[f32]) -> Vec<f32> {
        assert_eq!(newest.len(), self.obs_dim, "frame length != obs_dim");
        let mut out = vec![0.0; self.stacked_dim()];

        // Frames that would survive the hypothetical push.
        let skip = if self.frames.len() == self.capacity { 1 } else { 0 };
        let kept = self.frames.len() - skip;
        let lead = self.capacity - 1 - kept;
        for (i, frame) in self.frames.iter().skip(skip).enumerate() {
            let base = (lead + i) * self.obs_dim;
            out[base..base + self.obs_dim].copy_from_slice(frame);
        }
        let base = (self.capacity - 1) * self.obs_dim;
        out[base..base + self.obs_dim].copy_from_slice(newest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_dim_is_capacity_times_obs_dim() {
        let hist = ObservationHistory::new(3, 4);
        assert_eq!(hist.stacked_dim(), 12);
        assert_eq!(hist.stacked().len(), 12);
    }

    #[test]
    fn empty_history_stacks_to_zeros() {
        let hist = ObservationHistory::new(2, 3);
        assert_eq!(hist.stacked(), vec![0.0; 6]);
    }

    #[test]
    fn partial_fill_zero_leads() {
        let mut hist = ObservationHistory::new(3, 2);
        hist.push(vec![1.0, 2.0]);
        assert_eq!(hist.stacked(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn oldest_evicted_when_full() {
        let mut hist = ObservationHistory::new(2, 1);
        hist.push(vec![1.0]);
        hist.push(vec![2.0]);
        hist.push(vec![3.0]);
        assert_eq!(hist.stacked(), vec![2.0, 3.0]);
        assert_eq!(hist.len(), 2);
    }

    #[test]
    fn stacked_with_matches_push_then_stack() {
        let mut hist = ObservationHistory::new(3, 1);
        hist.push(vec![1.0]);
        hist.push(vec![2.0]);

        let preview = hist.stacked_with(&[3.0]);
        hist.push(vec![3.0]);
        assert_eq!(preview, hist.stacked());
    }

    #[test]
    fn stacked_with_does_not_mutate() {
        let mut hist = ObservationHistory::new(2, 1);
        hist.push(vec![1.0]);
        let before = hist.stacked();
        let _ = hist.stacked_with(&[9.0]);
        assert_eq!(hist.stacked(), before);
    }

    #[test]
    fn stacked_with_evicts_oldest_when_full() {
        let mut hist = ObservationHistory::new(2, 1);
        hist.push(vec![1.0]);
        hist.push(vec![2.0]);
        assert_eq!(hist.stacked_with(&[3.0]), vec![2.0, 3.0]);
    }

    #[test]
    fn single_frame_history_is_just_the_frame() {
        let hist = ObservationHistory::new(1, 3);
        assert_eq!(hist.stacked_with(&[7.0, 8.0, 9.0]), vec![7.0, 8.0, 9.0]);
    }

    #[test]
    #[should_panic(expected = "frame length != obs_dim")]
    fn wrong_frame_length_panics() {
        let mut hist = ObservationHistory::new(2, 3);
        hist.push(vec![1.0]);
    }
}
