//! # Episode Driver
//!
//! Runs the interaction loop between an [`Environment`] and a [`DqnAgent`]:
//! act, step, observe and train on every step, synchronize the target network
//! when an episode terminates, and decay exploration once per episode.

use log::info;
use serde::{Serialize, Deserialize};

use crate::agent::DqnAgent;
use crate::approximator::ValueApproximator;
use crate::env::Environment;
use crate::error::{DqnError, Result};

/// Per-episode result reported by [`EpisodeDriver::run`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub total_reward: f32,
    pub steps: usize,
    /// Exploration rate after the end-of-episode decay.
    pub epsilon: f32,
}

/// Episode loop settings.
#[derive(Clone, Debug)]
pub struct EpisodeDriver {
    pub episodes: usize,
    pub max_steps: usize,
    /// Synchronize the target network whenever an episode terminates.
    pub sync_on_terminal: bool,
    /// Additionally synchronize every this many environment steps.
    pub sync_every_steps: Option<usize>,
}

impl Default for EpisodeDriver {
    fn default() -> Self {
        EpisodeDriver {
            episodes: 10_000,
            max_steps: 1000,
            sync_on_terminal: true,
            sync_every_steps: None,
        }
    }
}

impl EpisodeDriver {
    pub fn new(episodes: usize, max_steps: usize) -> Self {
        EpisodeDriver {
            episodes,
            max_steps,
            ..Default::default()
        }
    }

    pub fn sync_every_steps(mut self, steps: usize) -> Self {
        self.sync_every_steps = Some(steps);
        self
    }

    pub fn sync_on_terminal(mut self, v: bool) -> Self {
        self.sync_on_terminal = v;
        self
    }

    /// Train `agent` in `env` for `self.episodes` episodes.
    pub fn run<Q, E>(&self, agent: &mut DqnAgent<Q>, env: &mut E) -> Result<Vec<EpisodeSummary>>
    where
        Q: ValueApproximator,
        E: Environment,
    {
        self.run_with(agent, env, |_| {})
    }

    /// Like [`EpisodeDriver::run`], calling `on_episode` after every episode.
    pub fn run_with<Q, E, F>(&self, agent: &mut DqnAgent<Q>, env: &mut E, mut on_episode: F) -> Result<Vec<EpisodeSummary>>
    where
        Q: ValueApproximator,
        E: Environment,
        F: FnMut(&EpisodeSummary),
    {
        if env.state_size() != agent.state_size() || env.action_count() != agent.action_count() {
            return Err(DqnError::dimension_mismatch(
                format!("environment {} -> {}", agent.state_size(), agent.action_count()),
                format!("environment {} -> {}", env.state_size(), env.action_count()),
            ));
        }
        if self.sync_every_steps == Some(0) {
            return Err(DqnError::invalid_parameter("sync_every_steps", "must be positive"));
        }

        let mut summaries = Vec::with_capacity(self.episodes);
        let mut total_steps = 0usize;

        for episode in 0..self.episodes {
            let mut state = env.reset()?;
            let mut total_reward = 0.0;
            let mut steps = 0;

            for _ in 0..self.max_steps {
                let action = agent.select_action(state.view())?;
                let step = env.step(action)?;

                agent.observe_transition(state.view(), action, step.reward, step.next_state.view(), step.done)?;
                agent.train_step()?;

                total_reward += step.reward;
                steps += 1;
                total_steps += 1;
                state = step.next_state;

                if let Some(every) = self.sync_every_steps {
                    if total_steps % every == 0 {
                        agent.sync_target()?;
                    }
                }

                if step.done {
                    if self.sync_on_terminal {
                        agent.sync_target()?;
                    }
                    break;
                }
            }

            agent.decay_exploration();

            let summary = EpisodeSummary {
                episode,
                total_reward,
                steps,
                epsilon: agent.epsilon(),
            };
            info!("Episode: {}, Reward: {}", episode, total_reward);
            on_episode(&summary);
            summaries.push(summary);
        }

        Ok(summaries)
    }

    /// Play `episodes` greedy episodes without recording or training.
    pub fn evaluate<Q, E>(&self, agent: &DqnAgent<Q>, env: &mut E, episodes: usize) -> Result<Vec<f32>>
    where
        Q: ValueApproximator,
        E: Environment,
    {
        let mut rewards = Vec::with_capacity(episodes);
        for _ in 0..episodes {
            let mut state = env.reset()?;
            let mut total_reward = 0.0;
            for _ in 0..self.max_steps {
                let step = env.step(agent.greedy_action(state.view())?)?;
                total_reward += step.reward;
                state = step.next_state;
                if step.done {
                    break;
                }
            }
            rewards.push(total_reward);
        }
        Ok(rewards)
    }
}
