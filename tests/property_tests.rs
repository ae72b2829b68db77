#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use deepq::exploration::EpsilonGreedy;
    use deepq::replay_buffer::{ReplayBuffer, Transition};
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    fn transition(i: usize) -> Transition {
        Transition {
            state: array![i as f32],
            action: 0,
            reward: i as f32,
            next_state: array![i as f32 + 1.0],
            done: i % 3 == 0,
        }
    }

    proptest! {
        #[test]
        fn test_fifo_eviction(capacity in 1usize..40, appended in 0usize..120) {
            let mut buffer = ReplayBuffer::new(capacity);
            for i in 0..appended {
                buffer.add(transition(i));
            }

            prop_assert_eq!(buffer.len(), appended.min(capacity));
            let stored: Vec<usize> = buffer.iter().map(|t| t.state[0] as usize).collect();
            let expected: Vec<usize> = (appended.saturating_sub(capacity)..appended).collect();
            prop_assert_eq!(stored, expected);
        }

        #[test]
        fn test_sample_is_distinct_subset(stored in 1usize..60, k in 0usize..80, seed in any::<u64>()) {
            let mut buffer = ReplayBuffer::new(64);
            for i in 0..stored {
                buffer.add(transition(i));
            }
            let mut rng = StdRng::seed_from_u64(seed);

            match buffer.sample(k, &mut rng) {
                Ok(sample) => {
                    prop_assert!(k <= stored);
                    prop_assert_eq!(sample.len(), k);
                    let mut ids: Vec<usize> = sample.iter().map(|t| t.state[0] as usize).collect();
                    prop_assert!(ids.iter().all(|&id| id < stored));
                    ids.sort_unstable();
                    ids.dedup();
                    prop_assert_eq!(ids.len(), k);
                }
                Err(_) => {
                    prop_assert!(k > stored);
                }
            }
        }

        #[test]
        fn test_epsilon_non_increasing(
            epsilon in 0.0f32..=1.0,
            floor in 0.0f32..=1.0,
            decay in 0.01f32..0.999,
            calls in 0usize..500,
        ) {
            let floor = floor.min(epsilon);
            let mut policy = EpsilonGreedy::new(epsilon, floor, decay).unwrap();
            let mut previous = policy.epsilon();
            for _ in 0..calls {
                policy.decay();
                prop_assert!(policy.epsilon() <= previous);
                prop_assert!(policy.epsilon() >= floor);
                previous = policy.epsilon();
            }
        }

        #[test]
        fn test_selected_action_in_range(epsilon in 0.0f32..=1.0, actions in 1usize..10, seed in any::<u64>()) {
            let policy = EpsilonGreedy::new(epsilon, 0.0, 0.5).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let greedy = actions - 1;
            for _ in 0..20 {
                prop_assert!(policy.select(actions, greedy, &mut rng) < actions);
            }
        }
    }
}
