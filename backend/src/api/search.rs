use crate::error::ApiError;
use crate::models::{AggregatedResult, SearchParams};
use crate::services::aggregator::aggregate;
use crate::AppState;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/search_youtube?<params..>")]
pub async fn search_youtube(
    params: SearchParams,
    state: &State<AppState>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let query = params
        .query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("query parameter is required".to_string()))?;
    let page_token = params.page_token.as_deref().unwrap_or("");
    let category_id = params
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let result = aggregate(state.youtube.as_ref(), query, page_token, category_id)
        .await
        .map_err(ApiError::Upstream)?;

    info!(
        "search_youtube '{query}' returned {} items (next page: {})",
        result.items.len(),
        !result.next_page_token.is_empty()
    );
    Ok(Json(result))
}
