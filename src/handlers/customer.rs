use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::errors::CustomerError;
use crate::handlers::AppState;
use crate::models::requests::customer::{RequestCustomer, RequestListCustomers};
use crate::models::responses::DefaultResponse;
use crate::views;

/// List page. A non-empty `search` wins over `sort`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<RequestListCustomers>,
) -> Response {
    let customers = match (query.search_term(), query.sort_column()) {
        (Some(search), _) => state.customers.search(search).await,
        (None, Some(sort)) => state.customers.sort(sort, query.descending()).await,
        (None, None) => state.customers.get_all().await,
    };

    let customers = match customers {
        Ok(customers) => customers,
        Err(err) => return err.into_response_with("get customers failed"),
    };

    let html = views::customer_list(
        &customers,
        query.search_term(),
        query.sort_column(),
        query.descending(),
    );

    Html(html).into_response()
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let customer = match state.customers.get_by_id(id).await {
        Ok(customer) => customer,
        Err(err) => return err.into_response_with("get customer failed"),
    };

    Html(views::edit_form(&customer)).into_response()
}

pub async fn create_form() -> Html<String> {
    Html(views::create_form())
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let customer = match state.customers.get_by_id(id).await {
        Ok(customer) => customer,
        Err(err) => return err.into_response_with("get customer failed"),
    };

    let body = DefaultResponse::ok("get customer success")
        .with_data(json!(customer))
        .into_json();

    (StatusCode::OK, body).into_response()
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<RequestCustomer>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return CustomerError::Parse(rejection.body_text())
                .into_response_with("create customer failed")
        }
    };

    let customer = match state.customers.create(body).await {
        Ok(customer) => customer,
        Err(err) => return err.into_response_with("create customer failed"),
    };

    let body = DefaultResponse::ok("create customer success")
        .with_data(json!(customer))
        .into_json();

    (StatusCode::OK, body).into_response()
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<RequestCustomer>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            return CustomerError::Parse(rejection.body_text())
                .into_response_with("update customer failed")
        }
    };

    let customer = match state.customers.update(id, body).await {
        Ok(customer) => customer,
        Err(err) => return err.into_response_with("update customer failed"),
    };

    let body = DefaultResponse::ok("update customer success")
        .with_data(json!(customer))
        .into_json();

    (StatusCode::OK, body).into_response()
}
