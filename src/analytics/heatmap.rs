//! Day-of-week by hour-of-day activity grid

use chrono::{Datelike, Duration, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::store::Struggle;

pub const DAYS: usize = 7;
pub const HOURS: usize = 24;

/// Monday-first week used for row order
const WEEK: [Weekday; DAYS] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// One bucket of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub day: Weekday,
    pub hour: u8,
    pub value: usize,
}

/// Complete 7x24 grid. Empty buckets hold zero rather than being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    grid: [[usize; HOURS]; DAYS],
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            grid: [[0; HOURS]; DAYS],
        }
    }
}

impl Heatmap {
    /// Bucket struggles after shifting their UTC timestamps by
    /// `utc_offset_minutes`.
    pub fn build(struggles: &[Struggle], utc_offset_minutes: i32) -> Self {
        let offset = Duration::minutes(utc_offset_minutes as i64);
        let mut heatmap = Self::default();

        for struggle in struggles {
            let local = struggle.timestamp + offset;
            let day = local.weekday().num_days_from_monday() as usize;
            let hour = local.hour() as usize;
            heatmap.grid[day][hour] += 1;
        }

        heatmap
    }

    pub fn get(&self, day: Weekday, hour: u8) -> usize {
        let hour = hour as usize;
        if hour >= HOURS {
            return 0;
        }
        self.grid[day.num_days_from_monday() as usize][hour]
    }

    /// All 168 buckets, Monday 00h first, hour-major within each day
    pub fn cells(&self) -> Vec<HeatmapCell> {
        let mut cells = Vec::with_capacity(DAYS * HOURS);
        for (row, day) in WEEK.iter().enumerate() {
            for hour in 0..HOURS {
                cells.push(HeatmapCell {
                    day: *day,
                    hour: hour as u8,
                    value: self.grid[row][hour],
                });
            }
        }
        cells
    }

    pub fn rows(&self) -> impl Iterator<Item = (Weekday, &[usize; HOURS])> {
        WEEK.iter().copied().zip(self.grid.iter())
    }

    pub fn total(&self) -> usize {
        self.grid.iter().flatten().sum()
    }

    pub fn max(&self) -> usize {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }
}
