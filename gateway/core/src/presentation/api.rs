// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP routes over the [`Gateway`] façade, one per gateway operation.
//!
//! Handlers do no work of their own: they extract a [`RequestContext`],
//! shape path/query/body into the typed request, call the gateway once and
//! render the result. [`ServiceError`] renders as a JSON error body with the
//! status code of its class; malformed path, query or body input is rejected
//! as a validation error before any backend is called.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::application::errors::ServiceError;
use crate::application::gateway::Gateway;
use crate::domain::agent::{
    AgentItem, MetricsReceipt, RegisterAgentRequest, RegisterAgentResponse, UnregisterAgentResponse,
};
use crate::domain::application::{Application, ApplicationInfo, InitializedApplication};
use crate::domain::context::RequestContext;
use crate::domain::query::{Pagination, SortDirection, TimeRange};
use crate::domain::scheduler::{AddSchedulerRequest, Scheduler, SchedulerAck};
use crate::domain::snapshot::{
    SchedulerInformation, SchedulerInformationQuery, SchedulerUptime, SchedulerUptimeQuery, SnapshotCode,
};
use crate::domain::stat::{AgentInformation, AgentStatQuery, StatMetric};
use crate::domain::transaction::{
    TransactionFilter, TransactionGroupBy, TransactionGroupFilter, TransactionGroups, TransactionInfo,
    TransactionPage, TransactionSortBy, TransactionStatus, TransactionTree, TransactionType,
};

pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Non-standard "client closed request"
const CLIENT_CLOSED_REQUEST: u16 = 499;

pub struct ApiState {
    pub gateway: Gateway,
    pub default_timeout: Option<Duration>,
    /// Parent of every request's cancellation token
    pub shutdown: CancellationToken,
}

type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Build the router. Cancelling `shutdown` cancels every in-flight request
/// context, which then fails with [`ServiceError::Cancelled`].
pub fn app(gateway: Gateway, default_timeout: Option<Duration>, shutdown: CancellationToken) -> Router {
    let state = Arc::new(ApiState {
        gateway,
        default_timeout,
        shutdown,
    });

    let api = Router::new()
        .route("/agents", get(list_agents).post(register_agent))
        .route("/agents/metrics", post(send_agent_metrics))
        .route("/agents/{id}", get(get_agent).delete(unregister_agent))
        .route("/agents/{id}/history", get(get_agent_history))
        .route("/agents/{id}/applications", get(list_applications_by_agent))
        .route("/schedulers", get(list_schedulers).post(add_scheduler))
        .route("/schedulers/{id}", get(get_scheduler).delete(remove_scheduler))
        .route("/schedulers/{id}/run", post(run_scheduler))
        .route("/schedulers/{id}/stop", post(stop_scheduler))
        .route("/schedulers/{id}/history", get(get_scheduler_history))
        .route("/schedulers/{id}/uptime", get(get_scheduler_uptime))
        .route("/applications", get(list_applications).post(register_application))
        .route("/applications/{id}", get(get_application))
        .route("/applications/{id}/archive", post(archive_application))
        .route("/applications/{id}/enable", post(enable_application))
        .route("/applications/{id}/disable", post(disable_application))
        .route("/applications/{id}/transactions", get(list_transactions))
        .route("/applications/{id}/transaction-groups", get(get_transaction_groups))
        .route("/transactions", post(save_transaction))
        .route("/transactions/{id}", get(get_transaction));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Cancelled => {
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::REQUEST_TIMEOUT)
            }
            ServiceError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "invalid_argument",
            ServiceError::Internal(_) => "internal",
            ServiceError::Cancelled => "cancelled",
            ServiceError::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }));
        (self.status_code(), body).into_response()
    }
}

impl FromRequestParts<Arc<ApiState>> for RequestContext {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let timeout = match parts.headers.get(REQUEST_TIMEOUT_HEADER) {
            Some(value) => {
                let millis = value
                    .to_str()
                    .ok()
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .ok_or_else(|| {
                        ServiceError::Validation(format!("{} must be a whole number of milliseconds", REQUEST_TIMEOUT_HEADER))
                    })?;
                Some(Duration::from_millis(millis))
            }
            None => state.default_timeout,
        };

        let ctx = RequestContext::with_cancellation(state.shutdown.child_token());
        Ok(match timeout {
            Some(timeout) => ctx.with_deadline(Instant::now() + timeout),
            None => ctx,
        })
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::Validation(rejection.body_text())
    }
}

/// [`Json`] body whose rejection renders as a validation error.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// [`Query`] string whose rejection renders as a validation error.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

fn time_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Option<TimeRange>, ServiceError> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }
    TimeRange::new(
        from.unwrap_or(DateTime::<Utc>::MIN_UTC),
        to.unwrap_or(DateTime::<Utc>::MAX_UTC),
    )
    .map(Some)
    .map_err(|err| ServiceError::Validation(err.to_string()))
}

fn pagination(offset: Option<u32>, limit: Option<u32>) -> Option<Pagination> {
    match (offset, limit) {
        (None, None) => None,
        (offset, limit) => Some(Pagination::new(offset.unwrap_or(0), limit.unwrap_or(u32::MAX))),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Agents

#[derive(Debug, Deserialize)]
pub struct AgentListParams {
    pub name: Option<String>,
}

async fn list_agents(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiQuery(params): ApiQuery<AgentListParams>,
) -> ApiResult<Vec<AgentItem>> {
    let agents = match params.name {
        Some(name) => state.gateway.get_agents_by_name(&ctx, &name).await?,
        None => state.gateway.get_agent_list(&ctx).await?,
    };
    Ok(Json(agents))
}

async fn register_agent(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiJson(request): ApiJson<RegisterAgentRequest>,
) -> ApiResult<RegisterAgentResponse> {
    Ok(Json(state.gateway.register_agent(&ctx, request).await?))
}

async fn get_agent(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<AgentItem> {
    Ok(Json(state.gateway.get_agent_by_id(&ctx, id).await?))
}

async fn unregister_agent(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<UnregisterAgentResponse> {
    Ok(Json(state.gateway.unregister_agent(&ctx, id).await?))
}

async fn send_agent_metrics(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiJson(metrics): ApiJson<Vec<StatMetric>>,
) -> ApiResult<MetricsReceipt> {
    let metrics = stream::iter(metrics).boxed();
    Ok(Json(state.gateway.send_agent_metrics(&ctx, metrics).await?))
}

#[derive(Debug, Deserialize)]
pub struct AgentHistoryParams {
    /// Integer stat category tag; ALL when absent
    #[serde(default)]
    pub category: i32,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

async fn get_agent_history(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<AgentHistoryParams>,
) -> ApiResult<AgentInformation> {
    let query = AgentStatQuery {
        agent_id: id.into(),
        category: params.category,
        pagination: pagination(params.offset, params.limit),
        time_range: time_range(params.from, params.to)?,
    };
    Ok(Json(state.gateway.get_agent_history_by_id(&ctx, query).await?))
}

async fn list_applications_by_agent(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Vec<Application>> {
    Ok(Json(state.gateway.get_application_list_by_agent_id(&ctx, id).await?))
}

// Schedulers

async fn list_schedulers(State(state): State<Arc<ApiState>>, ctx: RequestContext) -> ApiResult<Vec<Scheduler>> {
    Ok(Json(state.gateway.get_scheduler_list(&ctx).await?))
}

async fn add_scheduler(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiJson(request): ApiJson<AddSchedulerRequest>,
) -> ApiResult<SchedulerAck> {
    Ok(Json(state.gateway.add_scheduler(&ctx, request).await?))
}

async fn get_scheduler(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Scheduler> {
    Ok(Json(state.gateway.get_scheduler_by_id(&ctx, id).await?))
}

async fn remove_scheduler(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<SchedulerAck> {
    Ok(Json(state.gateway.remove_scheduler(&ctx, id).await?))
}

async fn run_scheduler(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<SchedulerAck> {
    Ok(Json(state.gateway.run_scheduler(&ctx, id).await?))
}

async fn stop_scheduler(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<SchedulerAck> {
    Ok(Json(state.gateway.stop_scheduler(&ctx, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SchedulerHistoryParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<SnapshotCode>,
    #[serde(default)]
    pub direction: SortDirection,
}

async fn get_scheduler_history(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<SchedulerHistoryParams>,
) -> ApiResult<SchedulerInformation> {
    let query = SchedulerInformationQuery {
        scheduler_id: id.into(),
        pagination: pagination(params.offset, params.limit),
        time_range: time_range(params.from, params.to)?,
        status: params.status,
        direction: params.direction,
    };
    Ok(Json(state.gateway.get_scheduler_history_by_id(&ctx, query).await?))
}

#[derive(Debug, Deserialize)]
pub struct UptimeParams {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

async fn get_scheduler_uptime(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<UptimeParams>,
) -> ApiResult<SchedulerUptime> {
    let query = SchedulerUptimeQuery {
        scheduler_id: id.into(),
        time_range: time_range(params.from, params.to)?,
    };
    Ok(Json(state.gateway.get_scheduler_uptime(&ctx, query).await?))
}

// Applications

async fn list_applications(State(state): State<Arc<ApiState>>, ctx: RequestContext) -> ApiResult<Vec<Application>> {
    Ok(Json(state.gateway.get_application_list(&ctx).await?))
}

async fn register_application(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiJson(info): ApiJson<ApplicationInfo>,
) -> ApiResult<InitializedApplication> {
    Ok(Json(state.gateway.register_application(&ctx, info).await?))
}

async fn get_application(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Application> {
    Ok(Json(state.gateway.get_application_by_id(&ctx, id).await?))
}

async fn archive_application(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ServiceError> {
    state.gateway.archive_application_by_id(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn enable_application(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ServiceError> {
    state.gateway.enable_application_by_id(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn disable_application(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, ServiceError> {
    state.gateway.disable_application_by_id(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Transactions

#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sort_by: TransactionSortBy,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub host: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
}

async fn list_transactions(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<TransactionListParams>,
) -> ApiResult<TransactionPage> {
    let filter = TransactionFilter {
        application_id: id.into(),
        pagination: pagination(params.offset, params.limit),
        time_range: time_range(params.from, params.to)?,
        sort_by: params.sort_by,
        direction: params.direction,
        transaction_type: params.transaction_type,
        status: params.status,
        host: params.host,
        name: params.name,
        path: params.path,
        method: params.method,
    };
    Ok(Json(state.gateway.get_transactions_list(&ctx, filter).await?))
}

#[derive(Debug, Deserialize)]
pub struct TransactionGroupParams {
    pub group_by: TransactionGroupBy,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
}

async fn get_transaction_groups(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<TransactionGroupParams>,
) -> ApiResult<TransactionGroups> {
    let filter = TransactionGroupFilter {
        application_id: id.into(),
        group_by: params.group_by,
        time_range: time_range(params.from, params.to)?,
        transaction_type: params.transaction_type,
        status: params.status,
    };
    Ok(Json(state.gateway.get_transaction_groups(&ctx, filter).await?))
}

async fn save_transaction(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiJson(info): ApiJson<TransactionInfo>,
) -> Result<StatusCode, ServiceError> {
    state.gateway.save_transaction(&ctx, info).await?;
    Ok(StatusCode::ACCEPTED)
}

async fn get_transaction(
    State(state): State<Arc<ApiState>>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<TransactionTree> {
    Ok(Json(state.gateway.get_transaction_by_id(&ctx, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_error_class() {
        assert_eq!(ServiceError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ServiceError::Cancelled.status_code().as_u16(), 499);
        assert_eq!(ServiceError::DeadlineExceeded.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_half_open_time_range() {
        let from = DateTime::<Utc>::MIN_UTC + chrono::Duration::days(1);
        let range = time_range(Some(from), None).unwrap().unwrap();
        assert_eq!(range.from(), from);
        assert!(time_range(None, None).unwrap().is_none());
        assert!(time_range(Some(Utc::now()), Some(Utc::now() - chrono::Duration::hours(1))).is_err());
    }

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(pagination(None, None), None);
        assert_eq!(pagination(None, Some(10)), Some(Pagination::new(0, 10)));
        assert_eq!(pagination(Some(5), None), Some(Pagination::new(5, u32::MAX)));
    }
}
