use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::Error;
use crate::models::{ExpenseDto, ExpenseFilter, ExpenseId, ExpensePayload};
use crate::service::ExpenseService;
use crate::store::SqlExpenseStore;
use crate::validation::{validate_expense, validate_payload_id};

type Service = ExpenseService<SqlExpenseStore>;

fn parse_body(payload: Result<Json<ExpensePayload>, JsonRejection>) -> Result<ExpensePayload, Error> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| Error::InvalidBody(rejection.body_text()))
}

fn parse_id(path: Result<Path<ExpenseId>, PathRejection>) -> Result<ExpenseId, Error> {
    path.map(|Path(id)| id)
        .map_err(|rejection| Error::InvalidPath(rejection.body_text()))
}

pub fn expense_location(id: ExpenseId) -> String {
    format!("/expenses/{}", id)
}

pub async fn list_expenses(
    service: Service,
    query: Result<Query<ExpenseFilter>, QueryRejection>,
) -> Result<Json<Vec<ExpenseDto>>, Error> {
    let Query(filter) = query.map_err(|rejection| Error::InvalidQuery(rejection.body_text()))?;

    let expenses = service.list(&filter).await?;
    tracing::info!("found {} expenses", expenses.len());

    Ok(Json(expenses))
}

pub async fn get_expense(
    service: Service,
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<ExpenseDto>, Error> {
    let id = parse_id(path)?;
    let expense = service.get_by_id(id).await.inspect_err(|error| {
        if let Error::NotFound(_) = error {
            tracing::warn!("expense {} not found", id);
        }
    })?;

    Ok(Json(expense))
}

pub async fn create_expense(
    service: Service,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let payload = parse_body(payload)?;
    let input = validate_expense(&payload).inspect_err(|error| {
        tracing::warn!("rejected expense: {:?}", error);
    })?;

    let created = service.create(input).await?;
    tracing::info!("created expense {}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, expense_location(created.id))],
        Json(created),
    ))
}

pub async fn update_expense(
    service: Service,
    path: Result<Path<ExpenseId>, PathRejection>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let id = parse_id(path)?;
    let payload = parse_body(payload)?;
    validate_payload_id(id, payload.id).inspect_err(|error| {
        tracing::warn!("rejected update of expense {}: {}", id, error);
    })?;
    let input = validate_expense(&payload).inspect_err(|error| {
        tracing::warn!("rejected update of expense {}: {:?}", id, error);
    })?;

    service.update(id, input).await.inspect_err(|error| {
        tracing::warn!("could not update expense {}: {}", id, error);
    })?;
    tracing::info!("updated expense {}", id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_expense(
    service: Service,
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let id = parse_id(path)?;
    service.delete(id).await.inspect_err(|error| {
        tracing::warn!("could not delete expense {}: {}", id, error);
    })?;
    tracing::info!("deleted expense {}", id);

    Ok(StatusCode::NO_CONTENT)
}
