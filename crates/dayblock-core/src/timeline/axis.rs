//! Day window and grid coordinate system.
//!
//! All times are expressed as minutes since midnight. The axis covers the
//! half-open window `[day_start_minute, day_end_minute)` divided into slots of
//! `snap_unit_minutes`. Positions on the rendered axis are normalized
//! fractions; mapping those to pixels belongs to the UI.

use chrono::{NaiveTime, Timelike};

use crate::error::ConfigError;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Fixed day window and grid resolution.
///
/// Only constructible through [`TimeAxis::new`] (or `Default`), so every
/// instance satisfies the whole-slot invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    day_start_minute: i64,
    day_end_minute: i64,
    snap_unit_minutes: i64,
}

impl TimeAxis {
    /// Build an axis, validating that the window splits into whole slots.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the snap unit is not positive, the window is
    /// empty or extends past midnight, the start is off-grid, or the window
    /// length is not a multiple of the snap unit.
    pub fn new(
        day_start_minute: i64,
        day_end_minute: i64,
        snap_unit_minutes: i64,
    ) -> Result<Self, ConfigError> {
        if snap_unit_minutes <= 0 {
            return Err(ConfigError::invalid(
                "axis.snap_unit_minutes",
                format!("must be positive, got {snap_unit_minutes}"),
            ));
        }
        if day_start_minute < 0 || day_end_minute > MINUTES_PER_DAY {
            return Err(ConfigError::invalid(
                "axis",
                format!("window {day_start_minute}..{day_end_minute} must lie within 0..{MINUTES_PER_DAY}"),
            ));
        }
        if day_end_minute <= day_start_minute {
            return Err(ConfigError::invalid(
                "axis.day_end_minute",
                format!("must be greater than day_start_minute ({day_start_minute})"),
            ));
        }
        if (day_end_minute - day_start_minute) % snap_unit_minutes != 0 {
            return Err(ConfigError::UnevenSlots {
                start: day_start_minute,
                end: day_end_minute,
                snap_unit: snap_unit_minutes,
            });
        }
        // Snapped starts are absolute multiples of the unit, so the window
        // itself has to sit on the grid.
        if day_start_minute % snap_unit_minutes != 0 {
            return Err(ConfigError::invalid(
                "axis.day_start_minute",
                format!("{day_start_minute} is not a multiple of {snap_unit_minutes}"),
            ));
        }

        Ok(Self {
            day_start_minute,
            day_end_minute,
            snap_unit_minutes,
        })
    }

    pub fn day_start_minute(&self) -> i64 {
        self.day_start_minute
    }

    pub fn day_end_minute(&self) -> i64 {
        self.day_end_minute
    }

    pub fn snap_unit_minutes(&self) -> i64 {
        self.snap_unit_minutes
    }

    /// Length of the visible window in minutes.
    pub fn span_minutes(&self) -> i64 {
        self.day_end_minute - self.day_start_minute
    }

    /// Number of grid slots in the window.
    pub fn slot_count(&self) -> i64 {
        self.span_minutes() / self.snap_unit_minutes
    }

    /// Normalized position of `minute` on the axis, clamped to `0.0..=1.0`.
    pub fn minute_to_fraction(&self, minute: i64) -> f64 {
        let fraction = (minute - self.day_start_minute) as f64 / self.span_minutes() as f64;
        fraction.clamp(0.0, 1.0)
    }

    /// Map a pointer position within a rendered extent back to a snapped
    /// start minute.
    ///
    /// `pointer` is measured from the top of the axis in the same unit as
    /// `axis_extent` (pass an extent of `1.0` when `pointer` is already a
    /// fraction). The result always goes through [`snap`](Self::snap).
    pub fn fraction_to_minute(&self, pointer: f64, axis_extent: f64) -> i64 {
        let raw = self.raw_minute(pointer, axis_extent);
        self.clamp_start(self.round_f64(raw))
    }

    /// Like [`fraction_to_minute`](Self::fraction_to_minute) but for an end
    /// edge, which may land exactly on `day_end_minute`.
    pub fn fraction_to_end_minute(&self, pointer: f64, axis_extent: f64) -> i64 {
        let raw = self.raw_minute(pointer, axis_extent);
        self.clamp_end(self.round_f64(raw))
    }

    /// Round to the nearest grid multiple (half-up) and clamp so the result
    /// leaves room for at least one slot before the end of the window.
    pub fn snap(&self, minute: i64) -> i64 {
        self.clamp_start(self.round_to_unit(minute))
    }

    /// Snap an end-edge minute. End edges may sit on `day_end_minute` but
    /// never closer than one slot to the window start.
    pub fn snap_end(&self, minute: i64) -> i64 {
        self.clamp_end(self.round_to_unit(minute))
    }

    /// Normalize a duration: nearest grid multiple, at least one slot and at
    /// most [`max_duration_minutes`](Self::max_duration_minutes).
    pub fn snap_duration(&self, minutes: i64) -> i64 {
        self.round_to_unit(minutes)
            .clamp(self.snap_unit_minutes, self.max_duration_minutes())
    }

    /// Longest block the grid allows: the last grid multiple within a day.
    pub fn max_duration_minutes(&self) -> i64 {
        MINUTES_PER_DAY / self.snap_unit_minutes * self.snap_unit_minutes
    }

    /// Round half-up to a multiple of the snap unit, without clamping.
    ///
    /// Saturates instead of overflowing at the ends of the `i64` range.
    pub fn round_to_unit(&self, minute: i64) -> i64 {
        let unit = self.snap_unit_minutes;
        // `(2m + u) div 2u` is exact half-up for odd units as well.
        minute
            .saturating_mul(2)
            .saturating_add(unit)
            .div_euclid(2 * unit)
            * unit
    }

    /// Whether `minutes` sits on the grid.
    pub fn is_aligned(&self, minutes: i64) -> bool {
        minutes.rem_euclid(self.snap_unit_minutes) == 0
    }

    /// Latest legal start minute.
    pub fn last_slot_start(&self) -> i64 {
        self.day_end_minute - self.snap_unit_minutes
    }

    fn raw_minute(&self, pointer: f64, axis_extent: f64) -> f64 {
        let fraction = if axis_extent > 0.0 && pointer.is_finite() {
            (pointer / axis_extent).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.day_start_minute as f64 + fraction * self.span_minutes() as f64
    }

    // Whole minute first: a round trip through `minute_to_fraction` can land
    // a hair below an exact half slot.
    fn round_f64(&self, raw: f64) -> i64 {
        self.round_to_unit(raw.round() as i64)
    }

    fn clamp_start(&self, minute: i64) -> i64 {
        minute.clamp(self.day_start_minute, self.last_slot_start())
    }

    fn clamp_end(&self, minute: i64) -> i64 {
        minute.clamp(
            self.day_start_minute + self.snap_unit_minutes,
            self.day_end_minute,
        )
    }
}

impl Default for TimeAxis {
    /// 08:00 to 24:00 on a 30-minute grid.
    fn default() -> Self {
        Self {
            day_start_minute: 8 * 60,
            day_end_minute: MINUTES_PER_DAY,
            snap_unit_minutes: 30,
        }
    }
}

/// 12-hour clock label, e.g. `9:05 AM`. Minutes past midnight wrap.
pub fn format_label(minute: i64) -> String {
    let minute = minute.rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Label for a block's span, e.g. `9:00 AM - 10:30 AM`.
pub fn format_range(start_minute: i64, duration_minutes: i64) -> String {
    format!(
        "{} - {}",
        format_label(start_minute),
        format_label(start_minute + duration_minutes)
    )
}

/// Parse an `HH:MM` (24-hour) string into minutes since midnight.
///
/// `24:00` is accepted as the end of the day.
pub fn parse_clock(value: &str) -> Option<i64> {
    let value = value.trim();
    if value == "24:00" {
        return Some(MINUTES_PER_DAY);
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}
