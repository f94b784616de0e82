//! Per-category totals of a user's transactions over a day or a range of days.

mod db;
mod endpoints;

pub use db::{CategoryLabel, CategoryTotal, get_category_totals};
pub use endpoints::{DailySummaryParams, PeriodSummaryParams, get_daily_summary, get_period_summary};
