//! Integration tests for the sort engine, recorder and replay.
//!
//! These tests drive the public library API end to end:
//! - Recorded histories for both algorithms
//! - Ordering and stability properties of the final state
//! - Pitch mapping across a value range
//! - Replay pacing and cancellation

use std::sync::Arc;
use std::time::Duration;

use sortviz::sort::record;
use sortviz::{
    AlgorithmKind, FrequencyMap, MockTonePlayer, ReplayOutcome, ReplayScheduler, SortEngine,
    Step, StepHistory, StepRecorder, StopHandle,
};

// ============================================================================
// Test Helpers
// ============================================================================

const ALGORITHMS: [AlgorithmKind; 2] = [AlgorithmKind::QuickSort, AlgorithmKind::MergeSort];

/// Inputs covering duplicates, negatives, sorted and reversed runs.
fn sample_inputs() -> Vec<Vec<i32>> {
    vec![
        vec![2, 1],
        vec![1, 2],
        vec![5, 3, 8, 1],
        vec![50, 87, 56, 12, 75, 100, 20, 34, 9],
        vec![4, 4, 4, 4],
        vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
        vec![-3, 7, 0, -3, i32::MAX, i32::MIN, 7],
        vec![3, 1, 3, 1, 2, 3, 1, 2],
    ]
}

fn is_sorted(values: &[i32]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

fn history_for(algorithm: AlgorithmKind, values: &[i32]) -> StepHistory {
    record(algorithm, values).unwrap()
}

// ============================================================================
// Recorded History
// ============================================================================

#[test]
fn test_mergesort_nine_values() {
    let input = [50, 87, 56, 12, 75, 100, 20, 34, 9];
    let history = history_for(AlgorithmKind::MergeSort, &input);

    let first = history.first().unwrap();
    assert_eq!(first.array(), &input);
    assert!(first.highlighted().is_empty());
    assert!(!first.is_complete());

    let last = history.last().unwrap();
    assert_eq!(last.array(), &[9, 12, 20, 34, 50, 56, 75, 87, 100]);
    assert!(last.highlighted().is_empty());
    assert!(last.is_complete());
}

#[test]
fn test_quicksort_four_values() {
    let history = history_for(AlgorithmKind::QuickSort, &[5, 3, 8, 1]);
    let last = history.last().unwrap();
    assert_eq!(last.array(), &[1, 3, 5, 8]);
    assert!(last.is_complete());
}

#[test]
fn test_two_values_have_single_comparison() {
    for algorithm in ALGORITHMS {
        let history = history_for(algorithm, &[2, 1]);
        let steps = history.steps();

        let comparisons = steps
            .iter()
            .filter(|step| step.highlighted().len() == 2)
            .count();
        assert_eq!(comparisons, 1, "{algorithm}");

        assert_eq!(steps[steps.len() - 1].array(), &[1, 2]);
        assert_eq!(steps[steps.len() - 2].array(), &[1, 2], "{algorithm}");
    }
}

#[test]
fn test_single_value_history() {
    for algorithm in ALGORITHMS {
        let history = history_for(algorithm, &[42]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().array(), &[42]);
        assert_eq!(history.last().unwrap().array(), &[42]);
        assert!(history.is_finished());
    }
}

#[test]
fn test_only_last_step_is_complete() {
    for algorithm in ALGORITHMS {
        for input in sample_inputs() {
            let history = history_for(algorithm, &input);
            let complete: Vec<usize> = history
                .iter()
                .enumerate()
                .filter(|(_, step)| step.is_complete())
                .map(|(i, _)| i)
                .collect();
            assert_eq!(complete, vec![history.len() - 1]);
        }
    }
}

#[test]
fn test_highlights_stay_in_bounds() {
    for algorithm in ALGORITHMS {
        for input in sample_inputs() {
            let history = history_for(algorithm, &input);
            for step in &history {
                assert!(step.highlighted().len() <= 2);
                assert!(step.highlighted().iter().all(|&i| i < input.len()));
            }
        }
    }
}

#[test]
fn test_quicksort_steps_are_permutations_of_input() {
    let input = vec![3, 1, 3, 1, 2, 3, 1, 2];
    let mut expected = input.clone();
    expected.sort_unstable();

    // quicksort only swaps, so every intermediate state holds the same values
    for step in &history_for(AlgorithmKind::QuickSort, &input) {
        let mut values = step.array().to_vec();
        values.sort_unstable();
        assert_eq!(values, expected);
    }
}

#[test]
fn test_mergesort_endpoints_are_permutations_of_input() {
    let input = vec![3, 1, 3, 1, 2, 3, 1, 2];
    let mut expected = input.clone();
    expected.sort_unstable();

    // merge writes back one slot at a time, so mid-merge states may repeat values
    let history = history_for(AlgorithmKind::MergeSort, &input);
    assert_eq!(history.first().unwrap().array(), input.as_slice());
    assert_eq!(history.last().unwrap().array(), expected.as_slice());

    let mid_merge_duplicate = history.iter().any(|step| {
        let mut values = step.array().to_vec();
        values.sort_unstable();
        values != expected
    });
    assert!(mid_merge_duplicate);
}

#[test]
fn test_empty_input_is_rejected() {
    for algorithm in ALGORITHMS {
        assert!(record(algorithm, &[]).is_err());
    }
}

// ============================================================================
// Final State Properties
// ============================================================================

#[test]
fn test_final_state_is_sorted() {
    for algorithm in ALGORITHMS {
        for input in sample_inputs() {
            let history = history_for(algorithm, &input);
            assert!(history.len() >= 2);

            let last = history.last().unwrap();
            assert!(is_sorted(last.array()), "{algorithm}: {input:?}");
            assert!(last.is_complete());
        }
    }
}

#[test]
fn test_mergesort_keeps_equal_values_in_input_order() {
    for input in sample_inputs() {
        let mut recorder = StepRecorder::new();
        let status = SortEngine::new(AlgorithmKind::MergeSort)
            .run(&input, &mut recorder)
            .unwrap();
        let permutation = status.permutation().unwrap();

        for pair in permutation.windows(2) {
            if input[pair[0]] == input[pair[1]] {
                assert!(pair[0] < pair[1], "{input:?} -> {permutation:?}");
            }
        }
    }
}

#[test]
fn test_input_is_not_modified() {
    let input = vec![5, 3, 8, 1];
    let mut recorder = StepRecorder::new();
    SortEngine::new(AlgorithmKind::QuickSort)
        .run(&input, &mut recorder)
        .unwrap();
    assert_eq!(input, vec![5, 3, 8, 1]);
}

// ============================================================================
// Pitch Mapping
// ============================================================================

#[test]
fn test_frequency_is_monotonic() {
    let map = FrequencyMap::from_values(&[-50, 120]);
    let mut previous = f64::MIN;
    for value in -50..=120 {
        let frequency = map.frequency(value, 180.0, 1100.0);
        assert!(frequency >= previous);
        previous = frequency;
    }
}

#[test]
fn test_degenerate_range_is_widened() {
    let map = FrequencyMap::new(10, 10);
    assert_eq!(map.max(), 11);
    let frequency = map.frequency(10, 180.0, 1100.0);
    assert!(frequency.is_finite());
    assert!((frequency - 180.0).abs() < 1e-9);
}

// ============================================================================
// Replay
// ============================================================================

#[tokio::test]
async fn test_replay_shows_every_step_with_tones() {
    let tones = Arc::new(MockTonePlayer::new());
    let scheduler = ReplayScheduler::new(tones.clone());
    let history = history_for(AlgorithmKind::MergeSort, &[3, 1, 2]);

    let mut shown: Vec<Step> = Vec::new();
    let mut completed = false;
    let outcome = scheduler
        .play(
            &history,
            Duration::from_millis(1),
            |step| shown.push(step.clone()),
            || completed = true,
            || true,
        )
        .await;

    assert_eq!(outcome, ReplayOutcome::Completed { steps: history.len() });
    assert!(completed);
    assert_eq!(shown.as_slice(), history.steps());

    let expected_tones: usize = history.iter().map(|s| s.highlighted().len()).sum();
    assert_eq!(tones.play_count(), expected_tones);
}

#[tokio::test]
async fn test_replay_cancelled_by_stop_handle() {
    let tones = Arc::new(MockTonePlayer::new());
    let scheduler = ReplayScheduler::new(tones);
    let history = history_for(AlgorithmKind::QuickSort, &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    let stop = StopHandle::new();

    let mut shown = 0;
    let mut completed = false;
    let outcome = scheduler
        .play(
            &history,
            Duration::from_millis(1),
            |_| {
                shown += 1;
                if shown == 4 {
                    stop.stop();
                }
            },
            || completed = true,
            || stop.should_continue(),
        )
        .await;

    assert_eq!(outcome, ReplayOutcome::Cancelled { steps_shown: 4 });
    assert_eq!(shown, 4);
    assert!(!completed);
}

#[tokio::test]
async fn test_replay_paces_steps() {
    let tones = Arc::new(MockTonePlayer::new());
    let scheduler = ReplayScheduler::new(tones);
    let history = history_for(AlgorithmKind::QuickSort, &[2, 1]);

    let started = std::time::Instant::now();
    scheduler
        .play(&history, Duration::from_millis(10), |_| {}, || {}, || true)
        .await;

    assert!(started.elapsed() >= Duration::from_millis(10 * history.len() as u64));
}
