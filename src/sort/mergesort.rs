//! Top-down mergesort.
//!
//! Splits at `mid = (low + high) / 2`, so the left half takes the extra
//! element of an odd-length range. Ties take the left element, which keeps
//! the sort stable.

use super::engine::{Interrupted, Run};

/// Sorts the inclusive range `[low, high]`.
pub(crate) fn sort(run: &mut Run<'_>, low: usize, high: usize) -> Result<(), Interrupted> {
    if low >= high {
        return Ok(());
    }

    let mid = low + (high - low) / 2;
    sort(run, low, mid)?;
    sort(run, mid + 1, high)?;
    merge(run, low, mid, high)
}

/// Merges the sorted halves `[low, mid]` and `[mid + 1, high]`.
fn merge(run: &mut Run<'_>, low: usize, mid: usize, high: usize) -> Result<(), Interrupted> {
    let left: Vec<_> = (low..=mid).map(|i| run.slot(i)).collect();
    let right: Vec<_> = (mid + 1..=high).map(|i| run.slot(i)).collect();

    let (mut i, mut j, mut dest) = (0, 0, low);

    while i < left.len() && j < right.len() {
        run.notify(&[low + i, mid + 1 + j])?;

        let slot = if left[i].0 <= right[j].0 {
            i += 1;
            left[i - 1]
        } else {
            j += 1;
            right[j - 1]
        };
        run.write(dest, slot);
        run.notify(&[dest])?;
        dest += 1;
    }

    for &slot in left[i..].iter().chain(&right[j..]) {
        run.write(dest, slot);
        run.notify(&[dest])?;
        dest += 1;
    }

    Ok(())
}
