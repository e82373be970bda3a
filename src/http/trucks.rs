//! Dump truck handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::domain::DumpTruckInput;
use crate::envelope::{self, ApiResponse};
use crate::projection::Project;
use crate::service::TruckFilter;
use crate::store::EntityStore;

use super::error::{invalid, rejected};
use super::query::{path_id, QueryParams, RawId, RawQuery};
use super::{request_context, AppState};

type Body = Result<Json<DumpTruckInput>, JsonRejection>;

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
    let pagination = match params.paging(state.settings.trucks_per_page, state.settings.max_per_page) {
        Ok(pagination) => pagination,
        Err(response) => return response,
    };
    let filter = TruckFilter {
        board_number: params.get("board_number").map(str::to_string),
        model_name: params.get("model_name").map(str::to_string),
    };

    match state.trucks.list(&filter, pagination.window()) {
        Ok((trucks, total)) => envelope::success(
            Some(trucks.project()),
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
    match state.trucks.get(id) {
        Ok(truck) => envelope::success(Some(truck.project()), None, None, 200),
        Err(err) => state.fail(err),
    }
}

pub(crate) async fn create<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
    body: Body,
) -> ApiResponse {
    let truck = match body {
        Ok(Json(input)) => match input.validate() {
            Ok(truck) => truck,
            Err(err) => return invalid(err),
        },
        Err(rejection) => return rejected("body", rejection),
    };
    match state.trucks.create(truck) {
        Ok(truck) => envelope::success(Some(truck.project()), None, None, 201),
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
    let truck = match body {
        Ok(Json(input)) => match input.validate() {
            Ok(truck) => truck,
            Err(err) => return invalid(err),
        },
        Err(rejection) => return rejected("body", rejection),
    };
    match state.trucks.update(id, truck) {
        Ok(truck) => envelope::success(Some(truck.project()), None, None, 200),
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
    match state.trucks.delete(id) {
        Ok(()) => envelope::success(None, None, None, 200),
        Err(err) => state.fail(err),
    }
}
