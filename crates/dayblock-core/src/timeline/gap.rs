//! Free-slot detection within the day window.
//!
//! Finds the stretches of the grid not covered by any block. Overlapping
//! blocks are merged first, so a nested block never splits a gap.

use serde::{Deserialize, Serialize};

use super::axis::TimeAxis;
use crate::schedule::ScheduledBlock;

/// An uncovered stretch of the day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start_minute: i64,
    pub end_minute: i64,
}

impl FreeSlot {
    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.end_minute - self.start_minute
    }

    /// Check if this slot can fit a block of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Gaps between `blocks` inside the axis window, sorted by start.
///
/// Blocks are expected to belong to a single date; callers pass the result of
/// a date query.
pub fn free_slots<'a>(
    axis: &TimeAxis,
    blocks: impl IntoIterator<Item = &'a ScheduledBlock>,
) -> Vec<FreeSlot> {
    let day_start = axis.day_start_minute();
    let day_end = axis.day_end_minute();

    let mut spans: Vec<(i64, i64)> = blocks
        .into_iter()
        .map(|b| (b.start_minute, b.end_minute()))
        .collect();
    spans.sort_unstable();

    let mut gaps = Vec::new();
    let mut last_end = day_start;

    for (start, end) in spans {
        if end <= last_end {
            continue;
        }
        if start >= day_end {
            break;
        }
        if start > last_end {
            gaps.push(FreeSlot {
                start_minute: last_end,
                end_minute: start.min(day_end),
            });
        }
        last_end = end.min(day_end);
    }

    if last_end < day_end {
        gaps.push(FreeSlot {
            start_minute: last_end,
            end_minute: day_end,
        });
    }

    gaps
}
