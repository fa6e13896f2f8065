use crate::errors::AppError;
use crate::models::{
    Activity, ActivityForm, ActivityQuery, ActivityRequest, DashboardResponse, Goal, GoalForm,
    GoalQuery, GoalRequest, GoalUpdate, ProfileForm, SeriesQuery, SeriesResponse, User,
};
use crate::state::AppState;
use crate::stats::{build_dashboard_at, build_series, today};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use tracing::debug;
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = today();
    let tracker = state.tracker.lock().await;
    let dashboard = build_dashboard_at(today, tracker.activities(), tracker.goals(), tracker.user());
    Html(render_index(today, &dashboard, tracker.user()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let tracker = state.tracker.lock().await;
    Json(build_dashboard_at(
        today(),
        tracker.activities(),
        tracker.goals(),
        tracker.user(),
    ))
}

pub async fn get_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Json<SeriesResponse> {
    let tracker = state.tracker.lock().await;
    Json(build_series(
        tracker.activities(),
        query.activity_type.unwrap_or_default(),
    ))
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Json<Vec<Activity>> {
    let tracker = state.tracker.lock().await;
    let activities = match (query.activity_type, query.date) {
        (Some(activity_type), Some(date)) => tracker
            .activities_by_date(date)
            .into_iter()
            .filter(|activity| activity.activity_type == activity_type)
            .cloned()
            .collect(),
        (Some(activity_type), None) => tracker
            .activities_by_type(activity_type)
            .into_iter()
            .cloned()
            .collect(),
        (None, Some(date)) => tracker
            .activities_by_date(date)
            .into_iter()
            .cloned()
            .collect(),
        (None, None) => tracker.activities().to_vec(),
    };
    Json(activities)
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(payload): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let new_activity = payload.validate()?;
    let mut tracker = state.tracker.lock().await;
    let activity = tracker.add_activity(new_activity).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    if !tracker.delete_activity(id).await? {
        debug!(%id, "no activity to delete");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<GoalQuery>,
) -> Json<Vec<Goal>> {
    let tracker = state.tracker.lock().await;
    let goals = match query.goal_type {
        Some(goal_type) => tracker
            .goals_by_type(goal_type)
            .into_iter()
            .cloned()
            .collect(),
        None => tracker.goals().to_vec(),
    };
    Json(goals)
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<GoalRequest>,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let new_goal = payload.validate()?;
    let mut tracker = state.tracker.lock().await;
    let goal = tracker.add_goal(new_goal).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<StatusCode, AppError> {
    let update = payload.validate()?;
    let mut tracker = state.tracker.lock().await;
    if !tracker.update_goal(id, update).await? {
        debug!(%id, "no goal to update");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tracker = state.tracker.lock().await;
    if !tracker.delete_goal(id).await? {
        debug!(%id, "no goal to delete");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user(State(state): State<AppState>) -> Json<User> {
    let tracker = state.tracker.lock().await;
    Json(tracker.user().clone())
}

pub async fn put_user(
    State(state): State<AppState>,
    Json(payload): Json<User>,
) -> Result<Json<User>, AppError> {
    let user = payload.validate()?;
    let mut tracker = state.tracker.lock().await;
    tracker.update_user(user).await?;
    Ok(Json(tracker.user().clone()))
}

// The form fallbacks never report bad input; the page is simply shown again.

pub async fn submit_activity_form(
    State(state): State<AppState>,
    Form(form): Form<ActivityForm>,
) -> Result<Redirect, AppError> {
    match form.parse() {
        Ok(new_activity) => {
            state.tracker.lock().await.add_activity(new_activity).await?;
        }
        Err(err) => debug!(%err, "dropping activity form"),
    }
    Ok(Redirect::to("/"))
}

pub async fn submit_goal_form(
    State(state): State<AppState>,
    Form(form): Form<GoalForm>,
) -> Result<Redirect, AppError> {
    match form.parse() {
        Ok(new_goal) => {
            state.tracker.lock().await.add_goal(new_goal).await?;
        }
        Err(err) => debug!(%err, "dropping goal form"),
    }
    Ok(Redirect::to("/"))
}

pub async fn submit_profile_form(
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect, AppError> {
    match form.parse() {
        Ok(user) => state.tracker.lock().await.update_user(user).await?,
        Err(err) => debug!(%err, "dropping profile form"),
    }
    Ok(Redirect::to("/"))
}
