use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/activities", post(handlers::submit_activity_form))
        .route("/goals", post(handlers::submit_goal_form))
        .route("/profile", post(handlers::submit_profile_form))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/series", get(handlers::get_series))
        .route(
            "/api/activities",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route("/api/activities/:id", delete(handlers::delete_activity))
        .route(
            "/api/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/api/goals/:id",
            patch(handlers::update_goal).delete(handlers::delete_goal),
        )
        .route(
            "/api/user",
            get(handlers::get_user).put(handlers::put_user),
        )
        .with_state(state)
}
