use rand::{rngs::StdRng, RngCore, SeedableRng};
use crate::exploration::EpsilonGreedy;

/// A random source that must never be consulted.
struct NoRandomness;

impl RngCore for NoRandomness {
    fn next_u32(&mut self) -> u32 {
        panic!("random source used")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("random source used")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("random source used")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        panic!("random source used")
    }
}

#[test]
fn test_default_matches_training_schedule() {
    let policy = EpsilonGreedy::default();
    assert_eq!(policy.epsilon(), 1.0);
    assert_eq!(policy.epsilon_min(), 0.01);
    assert_eq!(policy.epsilon_decay(), 0.9993);
}

#[test]
fn test_decay_5000_steps() {
    let mut policy = EpsilonGreedy::new(1.0, 0.01, 0.9993).unwrap();
    for _ in 0..5000 {
        policy.decay();
    }
    let expected = 0.9993f64.powi(5000).max(0.01);
    assert!((policy.epsilon() as f64 - expected).abs() < 1e-3, "epsilon = {}", policy.epsilon());
    assert!((policy.epsilon() - 0.0301).abs() < 1e-3);
}

#[test]
fn test_decay_is_monotonic_and_floored() {
    let mut policy = EpsilonGreedy::new(0.9, 0.2, 0.5).unwrap();
    let mut previous = policy.epsilon();
    for _ in 0..20 {
        policy.decay();
        assert!(policy.epsilon() <= previous);
        assert!(policy.epsilon() >= 0.2);
        previous = policy.epsilon();
    }
    assert_eq!(policy.epsilon(), 0.2);
}

#[test]
fn test_zero_epsilon_never_draws() {
    let policy = EpsilonGreedy::new(0.0, 0.0, 0.5).unwrap();
    let mut rng = NoRandomness;
    for greedy in 0..4 {
        assert_eq!(policy.select(4, greedy, &mut rng), greedy);
    }
}

#[test]
fn test_full_epsilon_covers_all_actions() {
    let policy = EpsilonGreedy::new(1.0, 0.01, 0.99).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let mut seen = [0usize; 4];
    for _ in 0..400 {
        let action = policy.select(4, 0, &mut rng);
        assert!(action < 4);
        seen[action] += 1;
    }
    assert!(seen.iter().all(|&n| n > 50), "counts: {:?}", seen);
}

#[test]
fn test_partial_epsilon_mostly_greedy() {
    let policy = EpsilonGreedy::new(0.1, 0.01, 0.99).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let greedy_count = (0..1000).filter(|_| policy.select(4, 2, &mut rng) == 2).count();
    // 0.9 + 0.1 / 4 expected
    assert!(greedy_count > 880 && greedy_count < 970, "greedy count {}", greedy_count);
}

#[test]
fn test_seeded_selection_is_reproducible() {
    let policy = EpsilonGreedy::new(0.5, 0.01, 0.99).unwrap();
    let mut a = StdRng::seed_from_u64(21);
    let mut b = StdRng::seed_from_u64(21);
    let first: Vec<usize> = (0..50).map(|_| policy.select(3, 1, &mut a)).collect();
    let second: Vec<usize> = (0..50).map(|_| policy.select(3, 1, &mut b)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_parameters() {
    assert!(EpsilonGreedy::new(1.5, 0.01, 0.9).is_err());
    assert!(EpsilonGreedy::new(0.005, 0.01, 0.9).is_err());
    assert!(EpsilonGreedy::new(1.0, 0.01, 1.0).is_err());
    assert!(EpsilonGreedy::new(1.0, 0.01, 0.0).is_err());
    assert!(EpsilonGreedy::new(1.0, -0.1, 0.9).is_err());
}
