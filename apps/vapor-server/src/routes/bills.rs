//! # Bill Endpoints
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POST /bills                                          │
//! │                                                                         │
//! │  JSON body ──► CreateBillRequest ──► validate_create_bill ──► NewBill   │
//! │                                                                 │       │
//! │                          (VAPOR_ENFORCE_TOTALS) verify_total ◄──┤       │
//! │                                                                 ▼       │
//! │                                     db.bills().create (one transaction) │
//! │                                                                 │       │
//! │  201 { id, totalAmount, paymentMethod, createdAt, items } ◄─────┘       │
//! │                                                                         │
//! │  Any failure before the insert: 400, nothing written.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::Deserialize;
use tracing::debug;

use vapor_core::period::{parse_date, DayWindow};
use vapor_core::validation::{validate_create_bill, verify_total, CreateBillRequest};
use vapor_core::{Bill, BillWithProducts};

use crate::error::ApiResult;
use crate::state::SharedState;

/// Query string of `GET /bills`.
#[derive(Debug, Default, Deserialize)]
pub struct ListBillsParams {
    /// Calendar day in server-local time, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// `POST /bills`
pub async fn create_bill(
    State(state): State<SharedState>,
    payload: Result<Json<CreateBillRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Bill>)> {
    let Json(request) = payload?;

    let new_bill = validate_create_bill(request)?;
    if state.enforce_totals {
        verify_total(&new_bill, state.tax_rate)?;
    }

    debug!(
        items = new_bill.items.len(),
        payment_method = %new_bill.payment_method,
        "create_bill"
    );

    let bill = state.db.bills().create(&new_bill).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

/// `GET /bills[?date=YYYY-MM-DD]`
///
/// Without a date every bill is listed.
pub async fn list_bills(
    State(state): State<SharedState>,
    params: Result<Query<ListBillsParams>, QueryRejection>,
) -> ApiResult<Json<Vec<BillWithProducts>>> {
    let Query(params) = params?;

    let window = match params.date.as_deref() {
        Some(date) if !date.trim().is_empty() => {
            Some(DayWindow::for_date(parse_date(date)?, &Local))
        }
        _ => None,
    };

    debug!(date = ?params.date, "list_bills");

    let bills = state.db.bills().list(window.as_ref()).await?;
    Ok(Json(bills))
}
