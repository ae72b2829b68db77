use deepq::agent::{DqnAgent, DqnConfig};
use deepq::approximator::ValueApproximator;
use deepq::driver::EpisodeDriver;
use deepq::env::{Environment, Step};
use deepq::optimizer::OptimizerConfig;
use deepq::{DqnError, Result};
use ndarray::{array, Array1};

/// Episodes last exactly `horizon` steps; reward is 1 for action 1 and 0 otherwise.
struct FixedHorizon {
    horizon: usize,
    t: usize,
    resets: usize,
}

impl FixedHorizon {
    fn new(horizon: usize) -> Self {
        FixedHorizon { horizon, t: 0, resets: 0 }
    }

    fn observation(&self) -> Array1<f32> {
        array![self.t as f32 / self.horizon as f32, 1.0]
    }
}

impl Environment for FixedHorizon {
    fn state_size(&self) -> usize {
        2
    }

    fn action_count(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.t = 0;
        self.resets += 1;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= 2 {
            return Err(DqnError::InvalidAction { action, max_actions: 2 });
        }
        self.t += 1;
        Ok(Step {
            next_state: self.observation(),
            reward: action as f32,
            done: self.t >= self.horizon,
        })
    }
}

fn config() -> DqnConfig {
    DqnConfig::new(2, 2)
        .hidden_layers(&[16])
        .learning_rate(1e-2)
        .batch_size(8)
        .buffer_capacity(500)
        .exploration(1.0, 0.05, 0.97)
        .seed(3)
}

#[test]
fn test_driver_runs_every_episode() {
    let mut env = FixedHorizon::new(5);
    let mut agent = DqnAgent::new(&config()).unwrap();

    let summaries = EpisodeDriver::new(20, 100).run(&mut agent, &mut env).unwrap();

    assert_eq!(summaries.len(), 20);
    assert_eq!(env.resets, 20);
    assert!(summaries.iter().all(|s| s.steps == 5));
    assert_eq!(agent.buffer().len(), 100);
    assert!(agent.train_steps() > 0);

    // Epsilon decays once per episode.
    let expected = 0.97f32.powi(20);
    assert!((agent.epsilon() - expected).abs() < 1e-4);
    for pair in summaries.windows(2) {
        assert!(pair[1].epsilon <= pair[0].epsilon);
    }
}

#[test]
fn test_driver_syncs_target_on_terminal() {
    let mut env = FixedHorizon::new(4);
    let mut agent = DqnAgent::new(&config()).unwrap();

    EpisodeDriver::new(10, 100).run(&mut agent, &mut env).unwrap();

    // The last action of every episode is a sync, after the final train step.
    assert_eq!(agent.online().parameters(), agent.target().parameters());
}

#[test]
fn test_driver_without_terminal_sync_leaves_target_behind() {
    let mut env = FixedHorizon::new(4);
    let mut agent = DqnAgent::new(&config()).unwrap();

    EpisodeDriver::new(10, 100)
        .sync_on_terminal(false)
        .run(&mut agent, &mut env)
        .unwrap();

    assert_ne!(agent.online().parameters(), agent.target().parameters());
}

#[test]
fn test_max_steps_truncates_episodes() {
    let mut env = FixedHorizon::new(50);
    let mut agent = DqnAgent::new(&config()).unwrap();

    let summaries = EpisodeDriver::new(3, 10).run(&mut agent, &mut env).unwrap();
    assert!(summaries.iter().all(|s| s.steps == 10));
}

#[test]
fn test_driver_rejects_mismatched_environment() {
    let mut env = FixedHorizon::new(5);
    let mut agent = DqnAgent::new(&DqnConfig::new(3, 2).seed(0)).unwrap();

    let result = EpisodeDriver::new(1, 10).run(&mut agent, &mut env);
    assert!(matches!(result, Err(DqnError::DimensionMismatch { .. })));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut env = FixedHorizon::new(6);
        let mut agent = DqnAgent::new(&config()).unwrap();
        let summaries = EpisodeDriver::new(15, 100).run(&mut agent, &mut env).unwrap();
        (summaries, agent.online().parameters())
    };
    assert_eq!(run(), run());
}

#[test]
fn test_agent_learns_rewarding_action() {
    let mut env = FixedHorizon::new(1);
    let config = DqnConfig::new(2, 2)
        .hidden_layers(&[8])
        .learning_rate(1e-2)
        .optimizer(OptimizerConfig::default())
        .batch_size(8)
        .buffer_capacity(200)
        .exploration(1.0, 0.1, 0.99)
        .seed(11);
    let mut agent = DqnAgent::new(&config).unwrap();

    let driver = EpisodeDriver::new(300, 10);
    driver.run(&mut agent, &mut env).unwrap();

    let state = env.reset().unwrap();
    let q = agent.online().predict(state.view()).unwrap();
    assert!(q[1] > q[0], "q-values {:?}", q);
    assert_eq!(agent.greedy_action(state.view()).unwrap(), 1);
    assert!((q[1] - 1.0).abs() < 0.25, "q-values {:?}", q);

    let rewards = driver.evaluate(&agent, &mut env, 3).unwrap();
    assert_eq!(rewards, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_periodic_sync_option() {
    let mut env = FixedHorizon::new(7);
    let mut agent = DqnAgent::new(&config()).unwrap();

    let result = EpisodeDriver::new(1, 10).sync_every_steps(0).run(&mut agent, &mut env);
    assert!(result.is_err());

    let summaries = EpisodeDriver::new(5, 100)
        .sync_on_terminal(false)
        .sync_every_steps(35)
        .run(&mut agent, &mut env)
        .unwrap();
    assert_eq!(summaries.len(), 5);
    // 35 total steps: the final step triggers a sync.
    assert_eq!(agent.online().parameters(), agent.target().parameters());
}
