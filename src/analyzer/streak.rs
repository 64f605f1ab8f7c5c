use crate::model::Series;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStreak {
    #[serde(rename = "type")]
    pub direction: StreakDirection,
    pub days: usize,
}

/// Longest run in one direction. Dates are `None` when no such day occurred.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakRun {
    pub days: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsecutiveDays {
    /// Run still open at the last bar; `None` when the last bar was flat.
    pub current: Option<CurrentStreak>,
    pub max_up: StreakRun,
    pub max_down: StreakRun,
}

/// Longest up and down runs of `pct_change`, plus the run open at the end.
///
/// A flat day resets the counter and ends any run. Bars without a
/// `pct_change` (the first bar) are skipped.
pub fn find_consecutive_days(series: &Series) -> Option<ConsecutiveDays> {
    if series.is_empty() {
        return None;
    }

    // positive: up run length, negative: down run length
    let mut counter: i64 = 0;
    let mut run_start: Option<NaiveDate> = None;
    let mut max_up = StreakRun::default();
    let mut max_down = StreakRun::default();

    for bar in series.bars() {
        let Some(pct) = bar.pct_change else {
            continue;
        };
        if pct > 0.0 {
            if counter <= 0 {
                counter = 0;
                run_start = Some(bar.date);
            }
            counter += 1;
            if counter as usize > max_up.days {
                max_up = StreakRun {
                    days: counter as usize,
                    start: run_start,
                    end: Some(bar.date),
                };
            }
        } else if pct < 0.0 {
            if counter >= 0 {
                counter = 0;
                run_start = Some(bar.date);
            }
            counter -= 1;
            if counter.unsigned_abs() as usize > max_down.days {
                max_down = StreakRun {
                    days: counter.unsigned_abs() as usize,
                    start: run_start,
                    end: Some(bar.date),
                };
            }
        } else {
            counter = 0;
            run_start = None;
        }
    }

    let current = match counter {
        0 => None,
        c if c > 0 => Some(CurrentStreak {
            direction: StreakDirection::Up,
            days: c as usize,
        }),
        c => Some(CurrentStreak {
            direction: StreakDirection::Down,
            days: c.unsigned_abs() as usize,
        }),
    };

    Some(ConsecutiveDays {
        current,
        max_up,
        max_down,
    })
}
