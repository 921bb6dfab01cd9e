use axum::{
    Form, Json,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::{form_fields, query_fields, user_not_found};
use crate::api::payloads::{
    CreateUserForm, CreatedUser, ExerciseForm, ExerciseResponse, LogItem, LogQuery, LogResponse,
};
use crate::api::server::AppState;
use crate::db::dates::format_date;
use crate::db::error::StoreError;
use crate::db::models::{NewExercise, NewUser, User};

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CreateUserForm>, FormRejection>,
) -> Result<Json<CreatedUser>, StoreError> {
    let form = form_fields(form)?;
    let user = state.repo.insert(NewUser::new(form.username)).await?;
    tracing::info!(user_id = %user.id, "user created");

    Ok(Json(CreatedUser {
        username: user.username,
        id: user.id,
    }))
}

pub async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    form: Result<Form<ExerciseForm>, FormRejection>,
) -> Result<Response, StoreError> {
    let form = form_fields(form)?;
    let Some(user) = state.repo.find_user_by_id(&user_id).await? else {
        return Ok(user_not_found(&user_id));
    };

    let exercise = state
        .repo
        .insert(NewExercise {
            user_id,
            description: form.description,
            duration: form.duration,
            date: form.date,
        })
        .await?;
    tracing::info!(user_id = %exercise.user_id, exercise_id = %exercise.id, "exercise logged");

    // Echoes the owner's id, not the id of the new exercise.
    Ok(Json(ExerciseResponse {
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_date(exercise.date),
        id: exercise.user_id,
    })
    .into_response())
}

pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> Result<Response, StoreError> {
    let query = query_fields(query)?;
    let Some(user) = state.repo.find_user_by_id(&user_id).await? else {
        return Ok(user_not_found(&user_id));
    };

    let mut log: Vec<LogItem> = state
        .repo
        .list_exercise_log(&user_id, query.from.as_deref(), query.to.as_deref())
        .await?
        .into_iter()
        .map(LogItem::from)
        .collect();

    // No ordering is applied first; "first" is whatever the store returned.
    if let Some(limit) = query.limit()
        && limit < log.len()
    {
        log.truncate(limit);
    }

    Ok(Json(LogResponse {
        username: user.username,
        count: log.len(),
        id: user_id,
        log,
    })
    .into_response())
}

pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, StoreError> {
    Ok(Json(state.repo.list_users().await?))
}
