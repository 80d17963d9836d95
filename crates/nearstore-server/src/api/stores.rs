use axum::{
    extract::{Query, State},
    Extension, Json,
};
use nearstore_engine::{Page, SearchError, SearchResult};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{normalize_limit, normalize_offset, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub cep: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub(super) async fn nearby_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let Some(cep) = query.cep.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query parameter `cep` is required",
        ));
    };

    let page = Page {
        limit: normalize_limit(query.limit),
        offset: normalize_offset(query.offset),
    };

    let result = state
        .search
        .search(cep, page)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::InvalidPostalCode(_) => {
            tracing::warn!(error = %error, "nearby search rejected postal code");
        }
        SearchError::GeocodingFailed(_) | SearchError::CatalogUnavailable(_) => {
            tracing::error!(error = %error, "nearby search failed");
        }
    }
    ApiError::new(request_id, error.code(), error.to_string())
}
