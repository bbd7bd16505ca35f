//! JSON handler for historized values.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use ladsim_app::ports::{AddressSpaceHost, HistoryRepository};
use ladsim_domain::error::{NotFoundError, ValidationError};
use ladsim_domain::history::HistoryRecord;
use ladsim_domain::time::{Timestamp, parse_rfc3339};

use crate::error::ApiError;
use crate::state::AppState;

/// Default limit for history records.
const DEFAULT_LIMIT: usize = 1000;

/// Upper bound on the `limit` parameter.
const MAX_LIMIT: usize = 10_000;

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
pub struct HistoryQuery {
    /// Start of time range (RFC 3339, inclusive). Open when absent.
    pub from: Option<String>,
    /// End of time range (RFC 3339, exclusive). Open when absent.
    pub to: Option<String>,
    /// Maximum number of records. Defaults to 1000.
    pub limit: Option<usize>,
}

fn parse_timestamp(value: &str) -> Result<Timestamp, ValidationError> {
    parse_rfc3339(value).map_err(|_| ValidationError::InvalidTimestamp(value.to_owned()))
}

/// `GET /api/nodes/{id}/history?from=&to=&limit=`
pub async fn list<H, R>(
    State(state): State<AppState<H, R>>,
    Path(id): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryRecord>>, ApiError>
where
    H: AddressSpaceHost + 'static,
    R: HistoryRepository + 'static,
{
    let node = super::parse_node_id(&id)?;
    let from = params.from.as_deref().map(parse_timestamp).transpose()?;
    let to = params.to.as_deref().map(parse_timestamp).transpose()?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    if !state.history.is_registered(node).await? {
        return Err(NotFoundError {
            entity: "History series",
            id: node.to_string(),
        }
        .into());
    }
    let records = state.history.find_in_range(node, from, to, limit).await?;
    Ok(Json(records))
}
