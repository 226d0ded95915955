use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use vouchercheck_core::Category;
use vouchercheck_discovery::VoucherRecord;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DiscoverQuery {
    pub query: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DiscoveredVoucherItem {
    id: String,
    title: String,
    discount: String,
    retailer: String,
    code: String,
    expires: String,
    category: Category,
    terms: String,
    verified: bool,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_spend: Option<String>,
}

impl From<VoucherRecord> for DiscoveredVoucherItem {
    fn from(record: VoucherRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            discount: record.discount,
            retailer: record.retailer,
            code: record.code,
            expires: record.expires,
            category: record.category,
            terms: record.terms,
            verified: record.verified,
            url: record.url,
            min_spend: record.min_spend,
        }
    }
}

pub(super) async fn discover_vouchers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<DiscoverQuery>,
) -> Result<Json<ApiResponse<Vec<DiscoveredVoucherItem>>>, ApiError> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                "query parameter is required",
            )
        })?;

    let records =
        vouchercheck_discovery::discover(&state.catalog, query, params.location.as_deref());

    let data = records.into_iter().map(DiscoveredVoucherItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
