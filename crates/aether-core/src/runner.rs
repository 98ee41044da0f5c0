// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Library-level driver: steps an automaton under a [`RunConfig`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::checkpoint::CheckpointError;
use crate::config::RunConfig;
use crate::engine::{Aether5D, StepObserver};
use crate::policy::CheckpointPolicy;
use crate::quantity::Quantity;
use crate::snapshot::{state_hash_hex, StateHash};

/// File extension of checkpoints written by the runner.
pub const CHECKPOINT_EXTENSION: &str = "aether";

/// Errors raised while running.
#[derive(Debug, Error)]
pub enum RunError {
    /// Writing a checkpoint failed.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    /// Preparing the checkpoint directory failed.
    #[error("run io error: {0}")]
    Io(#[from] io::Error),
}

/// What a completed run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps taken by this run.
    pub steps: u64,
    /// Generation reached.
    pub generation: u64,
    /// Frontier reached.
    pub max_v: u32,
    /// Whether the last step toppled nothing.
    pub stabilized: bool,
    /// Checkpoint files written, in order.
    pub checkpoints: Vec<PathBuf>,
    /// State hash at the end of the run.
    pub state_hash: StateHash,
}

/// Steps an automaton until a step budget runs out or it stabilizes.
#[derive(Debug)]
pub struct Runner<Q: Quantity = i64> {
    automaton: Aether5D<Q>,
    config: RunConfig,
}

/// Path of the checkpoint for `generation` inside `dir`.
pub fn checkpoint_path(dir: &Path, generation: u64) -> PathBuf {
    dir.join(format!("gen-{generation}.{CHECKPOINT_EXTENSION}"))
}

impl<Q: Quantity> Runner<Q> {
    /// Wrap `automaton` with the given configuration.
    pub fn new(automaton: Aether5D<Q>, config: RunConfig) -> Self {
        Self { automaton, config }
    }

    /// The automaton in its current state.
    pub fn automaton(&self) -> &Aether5D<Q> {
        &self.automaton
    }

    /// Active configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Consume the runner, returning the automaton.
    pub fn into_automaton(self) -> Aether5D<Q> {
        self.automaton
    }

    /// Run without observing individual cells.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        self.run_observed(&mut ())
    }

    /// Run, reporting every swept cell of every step to `observer`.
    ///
    /// Without a step budget the run always ends at the first stable step,
    /// whatever `stop_when_stable` says.
    pub fn run_observed<O: StepObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<RunSummary, RunError> {
        let stop_when_stable = self.config.stop_when_stable || self.config.max_steps.is_none();
        if self.config.checkpoint != CheckpointPolicy::Never {
            fs::create_dir_all(&self.config.checkpoint_dir)?;
        }
        info!(
            seed = %self.automaton.seed(),
            generation = self.automaton.generation(),
            max_steps = ?self.config.max_steps,
            checkpoint = ?self.config.checkpoint,
            "run started"
        );

        let mut steps = 0u64;
        let mut stabilized = false;
        let mut stable_checkpoint_written = false;
        let mut checkpoints = Vec::new();
        while self.config.max_steps.is_none_or(|max| steps < max) {
            let changed = self.automaton.step_observed(observer);
            steps += 1;
            let generation = self.automaton.generation();

            let due = self.config.checkpoint.is_due(generation, changed)
                && !(self.config.checkpoint == CheckpointPolicy::OnStabilize
                    && stable_checkpoint_written);
            if due {
                let path = checkpoint_path(&self.config.checkpoint_dir, generation);
                self.automaton.save_state(&path)?;
                info!(path = %path.display(), generation, "checkpoint written");
                stable_checkpoint_written |= !changed;
                checkpoints.push(path);
            }

            stabilized = !changed;
            if stabilized {
                debug!(generation, "stable step");
                if stop_when_stable {
                    info!(generation, "automaton stabilized");
                    break;
                }
            }
        }

        let state_hash = self.automaton.state_hash();
        info!(
            steps,
            generation = self.automaton.generation(),
            max_v = self.automaton.max_v(),
            state_hash = %state_hash_hex(&state_hash),
            "run finished"
        );
        Ok(RunSummary {
            steps,
            generation: self.automaton.generation(),
            max_v: self.automaton.max_v(),
            stabilized,
            checkpoints,
            state_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn config(max_steps: Option<u64>, checkpoint: CheckpointPolicy, dir: &Path) -> RunConfig {
        RunConfig {
            max_steps,
            stop_when_stable: true,
            checkpoint,
            checkpoint_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn stops_at_first_stable_step() {
        let dir = tempfile::tempdir().unwrap();
        let automaton = Aether5D::<i64>::new(25).unwrap();
        let mut runner = Runner::new(automaton, config(Some(50), CheckpointPolicy::Never, dir.path()));
        let summary = runner.run().unwrap();
        assert_eq!(summary.steps, 2);
        assert!(summary.stabilized);
        assert!(summary.checkpoints.is_empty());
    }

    #[test]
    fn honours_step_budget() {
        let dir = tempfile::tempdir().unwrap();
        let automaton = Aether5D::<i64>::new(10_000).unwrap();
        let mut runner = Runner::new(automaton, config(Some(3), CheckpointPolicy::Never, dir.path()));
        let summary = runner.run().unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.generation, 3);
        assert!(!summary.stabilized);
    }

    #[test]
    fn writes_periodic_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let automaton = Aether5D::<i64>::new(10_000).unwrap();
        let policy = CheckpointPolicy::Every { k: 2 };
        let mut runner = Runner::new(automaton, config(Some(5), policy, dir.path()));
        let summary = runner.run().unwrap();
        assert_eq!(
            summary.checkpoints,
            vec![checkpoint_path(dir.path(), 2), checkpoint_path(dir.path(), 4)]
        );
        let restored = Aether5D::<i64>::load_state(&summary.checkpoints[1]).unwrap();
        assert_eq!(restored.generation(), 4);
    }

    #[test]
    fn on_stabilize_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let automaton = Aether5D::<i64>::new(25).unwrap();
        let mut cfg = config(Some(6), CheckpointPolicy::OnStabilize, dir.path());
        cfg.stop_when_stable = false;
        let summary = Runner::new(automaton, cfg).run().unwrap();
        assert_eq!(summary.steps, 6);
        assert_eq!(summary.checkpoints, vec![checkpoint_path(dir.path(), 2)]);
    }
}
