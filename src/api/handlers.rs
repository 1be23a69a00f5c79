use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;
use std::collections::HashMap;

use crate::api::state::AppState;
use crate::ingest::{self, IngestReport};
use crate::respository::Repository;
use crate::types::{AppError, BlockRecord, TransferRecord};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    /// 500 payload in the `{error, details}` shape; upstream failures
    /// additionally echo the status code and headers Bitquery returned.
    fn from_app(error: &str, err: AppError) -> Self {
        let mut body = serde_json::json!({
            "error": error,
            "details": err.to_string(),
        });

        if let AppError::Api {
            status,
            headers,
            message,
        } = &err
        {
            body["details"] = serde_json::json!(message);
            if let Some(code) = status {
                body["statusCode"] = serde_json::json!(code);
            }
            if !headers.is_empty() {
                let headers: HashMap<&String, &String> =
                    headers.iter().map(|(k, v)| (k, v)).collect();
                body["headers"] = serde_json::json!(headers);
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body,
        }
    }

    fn from_ingest_failures(report: &IngestReport) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: serde_json::json!({
                "error": "Failed to store blocks",
                "details": report.describe_failures(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Serialize)]
pub struct FetchBlocksResponse {
    pub message: &'static str,
}

pub async fn get_blocks(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlockRecord>>, ApiError> {
    let blocks = state.repository.get_blocks().await.map_err(|e| {
        error!("Error fetching blocks: {}", e);
        ApiError::from_app("Failed to fetch blocks", e)
    })?;
    Ok(Json(blocks))
}

pub async fn fetch_blocks(
    State(state): State<AppState>,
) -> Result<Json<FetchBlocksResponse>, ApiError> {
    let report = ingest::fetch_and_store(&state.bitquery, state.repository.as_ref())
        .await
        .map_err(|e| {
            error!("Error fetching from Bitquery: {}", e);
            ApiError::from_app("Failed to fetch from Bitquery", e)
        })?;

    if !report.is_clean() {
        return Err(ApiError::from_ingest_failures(&report));
    }

    Ok(Json(FetchBlocksResponse {
        message: "Blocks fetched and stored",
    }))
}

pub async fn get_transfers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransferRecord>>, ApiError> {
    let transfers = state.bitquery.fetch_latest_transfers().await.map_err(|e| {
        error!("Error fetching transfers: {}", e);
        ApiError::from_app("Failed to fetch transfers", e)
    })?;
    Ok(Json(transfers))
}
