use chrono::NaiveDate;

use crate::{Message, MessageKind};

/// Message-type distribution for the doughnut chart.
///
/// `success` counts successful `file_process` messages, so it overlaps with
/// `file_process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Distribution {
    pub system: usize,
    pub file_process: usize,
    pub error: usize,
    pub success: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDay {
    Today,
    Yesterday,
    DayBefore,
}

impl TrendDay {
    pub fn label(self) -> &'static str {
        match self {
            TrendDay::Today => "today",
            TrendDay::Yesterday => "yesterday",
            TrendDay::DayBefore => "day before",
        }
    }
}

/// One bar pair of the daily trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    pub day: TrendDay,
    pub successes: usize,
    pub errors: usize,
    /// The server keeps no history; older days are scaled from today.
    pub estimated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSeries {
    pub distribution: Distribution,
    pub trend: [TrendPoint; 3],
}

impl Default for ChartSeries {
    fn default() -> Self {
        aggregate(&[])
    }
}

/// Numbers shown on the stats cards and the notification badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// `error` messages plus failed `file_process` messages.
    pub error_count: usize,
    /// Successful `file_process` messages stamped on `today`.
    pub today_success: usize,
    pub badge_count: usize,
}

pub fn distribution(snapshot: &[Message]) -> Distribution {
    snapshot
        .iter()
        .fold(Distribution::default(), |mut dist, message| {
            match message.kind {
                MessageKind::System => dist.system += 1,
                MessageKind::FileProcess => dist.file_process += 1,
                MessageKind::Error => dist.error += 1,
                MessageKind::Success => {}
            }
            if message.is_successful_file_process() {
                dist.success += 1;
            }
            dist
        })
}

/// Builds both chart series from the unfiltered snapshot.
pub fn aggregate(snapshot: &[Message]) -> ChartSeries {
    let distribution = distribution(snapshot);
    let successes = distribution.success;
    let errors = distribution.error;

    ChartSeries {
        distribution,
        trend: [
            TrendPoint {
                day: TrendDay::Today,
                successes,
                errors,
                estimated: false,
            },
            TrendPoint {
                day: TrendDay::Yesterday,
                successes: scale(successes, 8),
                errors: scale(errors, 7),
                estimated: true,
            },
            TrendPoint {
                day: TrendDay::DayBefore,
                successes: scale(successes, 6),
                errors: scale(errors, 5),
                estimated: true,
            },
        ],
    }
}

pub fn stats(snapshot: &[Message], today: NaiveDate) -> DashboardStats {
    let error_count = snapshot
        .iter()
        .filter(|m| m.kind == MessageKind::Error || m.is_failed_file_process())
        .count();
    let today_success = snapshot
        .iter()
        .filter(|m| m.is_successful_file_process() && m.timestamp.date() == today)
        .count();

    DashboardStats {
        error_count,
        today_success,
        badge_count: snapshot.len(),
    }
}

/// `floor(count * tenths / 10)`.
fn scale(count: usize, tenths: usize) -> usize {
    count * tenths / 10
}
