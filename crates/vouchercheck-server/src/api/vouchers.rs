use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use vouchercheck_validation::{CodeStatus, ValidationRecord, ValidationSource};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CodeStatusItem {
    valid: bool,
    discount: String,
    description: String,
    expires: Option<DateTime<Utc>>,
    min_spend: Option<Decimal>,
    max_uses: Option<u32>,
    eligibility: String,
    terms: String,
    last_validated: Option<DateTime<Utc>>,
    source: Option<ValidationSource>,
}

impl From<CodeStatus> for CodeStatusItem {
    fn from(status: CodeStatus) -> Self {
        Self {
            valid: status.valid,
            discount: status.discount,
            description: status.description,
            expires: status.expires,
            min_spend: status.min_spend,
            max_uses: status.max_uses,
            eligibility: status.eligibility,
            terms: status.terms,
            last_validated: status.last_validated,
            source: status.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ActiveVoucherItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<String>,
    code: String,
    discount: String,
    description: String,
    expires: DateTime<Utc>,
    min_spend: Decimal,
    max_uses: Option<u32>,
    eligibility: String,
    terms: String,
    source: ValidationSource,
    last_validated: DateTime<Utc>,
}

impl ActiveVoucherItem {
    fn new(store: Option<String>, record: ValidationRecord) -> Self {
        Self {
            store,
            code: record.code,
            discount: record.discount,
            description: record.description,
            expires: record.expires,
            min_spend: record.min_spend,
            max_uses: record.max_uses,
            eligibility: record.eligibility,
            terms: record.terms,
            source: record.source,
            last_validated: record.last_validated,
        }
    }
}

pub(super) async fn get_code_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((store, code)): Path<(String, String)>,
) -> Json<ApiResponse<CodeStatusItem>> {
    let status = vouchercheck_validation::validate(&state.validation, &store, &code);

    Json(ApiResponse {
        data: CodeStatusItem::from(status),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_store_active(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(store): Path<String>,
) -> Json<ApiResponse<Vec<ActiveVoucherItem>>> {
    let data = vouchercheck_validation::active_for_store(&state.validation, &store)
        .into_iter()
        .map(|record| ActiveVoucherItem::new(None, record))
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_all_active(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ActiveVoucherItem>>> {
    let data = vouchercheck_validation::all_active(&state.validation)
        .into_iter()
        .map(|(store, record)| ActiveVoucherItem::new(Some(store), record))
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
