//! Monthly and yearly spending projection

use std::fmt;
use thiserror::Error;

/// Monthly spending above this amount earns the reduction advice
pub const ADVICE_THRESHOLD: i64 = 20_000;

pub const MONTHS_PER_YEAR: i64 = 12;

/// Advice attached to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    /// Cut back by roughly two occurrences a week
    Reduce,
    OnTrack,
}

impl Advice {
    pub fn for_monthly_total(monthly_total: i64) -> Self {
        if monthly_total > ADVICE_THRESHOLD {
            Advice::Reduce
        } else {
            Advice::OnTrack
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Advice::Reduce => {
                "Совет: попробуй сократить на 2 раза в неделю — экономия будет ощутимой!"
            }
            Advice::OnTrack => "Ты хорошо контролируешь свои расходы!",
        }
    }
}

/// Result of a completed dialog. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub category: String,
    pub monthly_total: i64,
    pub yearly_total: i64,
    pub advice: Advice,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ты тратишь {} тг в месяц и {} тг в год на {}.\n{}",
            self.monthly_total,
            self.yearly_total,
            self.category,
            self.advice.text()
        )
    }
}

/// Totals did not fit in an `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("projection overflows: {unit_cost} x {occurrences}")]
pub struct ProjectionOverflow {
    pub unit_cost: i64,
    pub occurrences: i64,
}

/// Project spending from the cost of one occurrence and occurrences per month.
pub fn project(
    category: &str,
    unit_cost: i64,
    occurrences_per_month: i64,
) -> Result<Report, ProjectionOverflow> {
    let overflow = ProjectionOverflow {
        unit_cost,
        occurrences: occurrences_per_month,
    };
    let monthly_total = unit_cost
        .checked_mul(occurrences_per_month)
        .ok_or(overflow)?;
    let yearly_total = monthly_total
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(overflow)?;

    Ok(Report {
        category: category.to_string(),
        monthly_total,
        yearly_total,
        advice: Advice::for_monthly_total(monthly_total),
    })
}
