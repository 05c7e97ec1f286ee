//! Quicksort with Lomuto partitioning.
//!
//! The pivot is the last element of the active range. Every candidate
//! comparison, every swap into the low region and the final pivot placement
//! each produce one notification.

use super::engine::{Interrupted, Run};

/// Sorts the inclusive range `[low, high]` in place.
pub(crate) fn sort(run: &mut Run<'_>, low: usize, high: usize) -> Result<(), Interrupted> {
    if low >= high {
        return Ok(());
    }

    let pivot_index = partition(run, low, high)?;
    if pivot_index > low {
        sort(run, low, pivot_index - 1)?;
    }
    sort(run, pivot_index + 1, high)
}

/// Partitions `[low, high]` around `array[high]` and returns the pivot's
/// rest position.
fn partition(run: &mut Run<'_>, low: usize, high: usize) -> Result<usize, Interrupted> {
    let pivot = run.array()[high];
    // Next open slot in the <= pivot region
    let mut slot = low;

    for candidate in low..high {
        run.notify(&[candidate, high])?;

        if run.array()[candidate] <= pivot {
            run.swap(slot, candidate);
            run.notify(&[slot, candidate])?;
            slot += 1;
        }
    }

    run.swap(slot, high);
    run.notify(&[slot])?;

    Ok(slot)
}
