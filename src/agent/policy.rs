//! Exploration policies for action selection

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{Action, State},
};

/// Strategy converting a value vector into a chosen action.
///
/// Dispatch is by pattern match; each variant carries its own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExplorationPolicy {
    /// Uniform draw over the legal actions, ignoring values
    Random,
    /// Greedy with probability `1 - epsilon`, uniform otherwise.
    ///
    /// Falls back to a uniform draw whenever all legal actions carry an
    /// identical value, so the argmax cannot bias toward iteration order
    /// before learning begins.
    EpsilonGreedy { epsilon: f64 },
    /// Sample proportionally to `exp(v_i) / sum_j exp(v_j)`
    Softmax,
}

impl ExplorationPolicy {
    /// Choose one legal action given the actions' Q-values.
    ///
    /// `actions` and `values` are parallel slices in the environment's
    /// iteration order.
    pub fn choose(
        &self,
        rng: &mut StdRng,
        state: State,
        actions: &[Action],
        values: &[f64],
    ) -> Result<Action> {
        if actions.is_empty() {
            return Err(Error::EmptyActionSpace { state });
        }
        debug_assert_eq!(actions.len(), values.len());

        match *self {
            ExplorationPolicy::Random => uniform(rng, state, actions),
            ExplorationPolicy::EpsilonGreedy { epsilon } => {
                let all_equal = values.windows(2).all(|w| w[0] == w[1]);
                if rng.random::<f64>() < epsilon || all_equal {
                    uniform(rng, state, actions)
                } else {
                    Ok(argmax_first_seen(actions, values))
                }
            }
            ExplorationPolicy::Softmax => {
                let probabilities = softmax_probabilities(values);
                let draw = rng.random::<f64>();
                let mut cumulative = 0.0;
                for (&action, &p) in actions.iter().zip(&probabilities) {
                    cumulative += p;
                    if draw < cumulative {
                        return Ok(action);
                    }
                }
                // Rounding can leave the cumulative sum a hair below 1.
                Ok(actions[actions.len() - 1])
            }
        }
    }
}

fn uniform(rng: &mut StdRng, state: State, actions: &[Action]) -> Result<Action> {
    actions
        .choose(rng)
        .copied()
        .ok_or(Error::EmptyActionSpace { state })
}

/// Argmax with first-seen tie-break over parallel action/value slices.
fn argmax_first_seen(actions: &[Action], values: &[f64]) -> Action {
    let mut best = (actions[0], values[0]);
    for (&action, &value) in actions.iter().zip(values).skip(1) {
        if value > best.1 {
            best = (action, value);
        }
    }
    best.0
}

/// Convert a value vector into softmax probabilities.
///
/// Shifts by the maximum value before exponentiating so large magnitudes
/// cannot overflow.
pub fn softmax_probabilities(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|&v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_softmax_probabilities_sum_to_one() {
        for values in [
            vec![0.0, 0.0],
            vec![1.0, 2.0, 3.0],
            vec![-500.0, 0.0, 500.0],
            vec![1e8, 1e8 + 1.0],
        ] {
            let probs = softmax_probabilities(&values);
            let total: f64 = probs.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
            assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_softmax_extreme_values_do_not_overflow() {
        let probs = softmax_probabilities(&[1000.0, 0.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[0] > 0.999);
    }

    #[test]
    fn test_egreedy_zero_epsilon_is_greedy() {
        let policy = ExplorationPolicy::EpsilonGreedy { epsilon: 0.0 };
        let mut rng = StdRng::seed_from_u64(1);
        let actions = [Action(0), Action(1), Action(2)];
        let values = [0.1, 0.9, 0.5];
        for _ in 0..20 {
            let chosen = policy
                .choose(&mut rng, State(0), &actions, &values)
                .unwrap();
            assert_eq!(chosen, Action(1));
        }
    }

    #[test]
    fn test_egreedy_identical_values_fall_back_to_uniform() {
        let policy = ExplorationPolicy::EpsilonGreedy { epsilon: 0.0 };
        let mut rng = StdRng::seed_from_u64(3);
        let actions = [Action(0), Action(1)];
        let values = [0.0, 0.0];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(
                policy
                    .choose(&mut rng, State(0), &actions, &values)
                    .unwrap(),
            );
        }
        // A pure argmax would always pick the first action.
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_empty_action_space_is_error() {
        let policy = ExplorationPolicy::Random;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            policy.choose(&mut rng, State(4), &[], &[]),
            Err(Error::EmptyActionSpace { .. })
        ));
    }
}
