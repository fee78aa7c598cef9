//! Travel direction of a call or a moving car.

use std::fmt;

/// Direction of travel.
///
/// `Idle` doubles as "no direction": an idle car, a car dwelling with its
/// doors open, or a degenerate same-floor call.  Transport calls submitted
/// by the passenger side always carry `Up` or `Down`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Direction {
    #[default]
    Idle,
    Up,
    Down,
}

impl Direction {
    /// Direction of travel from `from` to `to` (floor indices).
    ///
    /// Returns `Idle` when the floors are equal.
    #[inline]
    pub fn of_travel(from: u32, to: u32) -> Direction {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less    => Direction::Down,
            std::cmp::Ordering::Equal   => Direction::Idle,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up   => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    /// The wire form used in NDJSON records.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Idle => "Idle",
            Direction::Up   => "Up",
            Direction::Down => "Down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
