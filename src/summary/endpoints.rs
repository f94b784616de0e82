//! Route handlers for the daily and period summaries.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    auth::Principal,
    date::{DateRange, format_date, parse_required_date},
    db::{DbState, lock_connection},
    extract::ApiQuery,
    summary::get_category_totals,
};

/// The query string for the daily summary.
#[derive(Debug, Default, Deserialize)]
pub struct DailySummaryParams {
    pub date: Option<String>,
}

/// The query string for the period summary.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodSummaryParams {
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
}

/// Get the requesting user's per-category totals for a single day.
pub async fn get_daily_summary(
    State(state): State<DbState>,
    principal: Principal,
    ApiQuery(params): ApiQuery<DailySummaryParams>,
) -> Result<impl IntoResponse, Error> {
    let date = parse_required_date(params.date.as_deref(), "date")?;

    let connection = lock_connection(&state.db_connection)?;
    let summary =
        get_category_totals(principal.user_id, DateRange::single_day(date), &connection)?;

    Ok(Json(json!({
        "date": format_date(date),
        "summary": summary,
    })))
}

/// Get the requesting user's per-category totals for the days from `begin_date` to `end_date`.
pub async fn get_period_summary(
    State(state): State<DbState>,
    principal: Principal,
    ApiQuery(params): ApiQuery<PeriodSummaryParams>,
) -> Result<impl IntoResponse, Error> {
    let begin_date = parse_required_date(params.begin_date.as_deref(), "begin_date")?;
    let end_date = parse_required_date(params.end_date.as_deref(), "end_date")?;

    let connection = lock_connection(&state.db_connection)?;
    let summary = get_category_totals(
        principal.user_id,
        DateRange::new(begin_date, end_date),
        &connection,
    )?;

    Ok(Json(json!({
        "begin_date": format_date(begin_date),
        "end_date": format_date(end_date),
        "summary": summary,
    })))
}
