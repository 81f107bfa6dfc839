//! Day timeline: the grid coordinate system and free-slot detection.

mod axis;
mod gap;

pub use axis::{format_label, format_range, parse_clock, TimeAxis, MINUTES_PER_DAY};
pub use gap::{free_slots, FreeSlot};
