//! Truck model handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::domain::TruckModelInput;
use crate::envelope::{self, ApiResponse};
use crate::projection::Project;
use crate::store::EntityStore;

use super::error::{invalid, rejected};
use super::query::{path_id, QueryParams, RawId, RawQuery};
use super::{request_context, AppState};

type Body = Result<Json<TruckModelInput>, JsonRejection>;

pub(crate) async fn list<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: RawQuery,
) -> ApiResponse {
    let params = match QueryParams::extract(query) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let pagination = match params.paging(state.settings.models_per_page, state.settings.max_per_page) {
        Ok(pagination) => pagination,
        Err(response) => return response,
    };

    match state.models.list(pagination.window()) {
        Ok((models, total)) => envelope::success(
            Some(models.project()),
            Some(pagination.paging(total)),
            Some(&request_context(&uri, &headers)),
            200,
        ),
        Err(err) => state.fail(err),
    }
}

pub(crate) async fn get_one<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    id: RawId,
) -> ApiResponse {
    let id = match path_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.models.get(id) {
        Ok(model) => envelope::success(Some(model.project()), None, None, 200),
        Err(err) => state.fail(err),
    }
}

pub(crate) async fn create<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Body,
) -> ApiResponse {
    let model = match body {
        Ok(Json(input)) => match input.validate() {
            Ok(model) => model,
            Err(err) => return invalid(err),
        },
        Err(rejection) => return rejected("body", rejection),
    };
    match state.models.create(model) {
        Ok(model) => envelope::success(Some(model.project()), None, None, 201),
        Err(err) => state.fail(err),
    }
}

pub(crate) async fn update<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    id: RawId,
    body: Body,
) -> ApiResponse {
    let id = match path_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let model = match body {
        Ok(Json(input)) => match input.validate() {
            Ok(model) => model,
            Err(err) => return invalid(err),
        },
        Err(rejection) => return rejected("body", rejection),
    };
    match state.models.update(id, model) {
        Ok(model) => envelope::success(Some(model.project()), None, None, 200),
        Err(err) => state.fail(err),
    }
}

pub(crate) async fn delete<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    id: RawId,
) -> ApiResponse {
    let id = match path_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.models.delete(id) {
        Ok(()) => envelope::success(None, None, None, 200),
        Err(err) => state.fail(err),
    }
}
