use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use chrono::{Offset, Utc};
use domain::services::{Aggregator, PlaceProximityIndex, TriggerEngine};
use persistence::repositories::postgres_stores;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{
    activity_logs, daily_summaries, ema_logs, food_log_entries, food_logs, foods, friends, health,
    notifications, places, users, visit_logs,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub engine: Arc<TriggerEngine>,
    pub aggregator: Arc<Aggregator>,
    pub proximity: Arc<PlaceProximityIndex>,
}

impl AppState {
    pub fn new(config: Arc<Config>, pool: PgPool) -> Self {
        let stores = postgres_stores(&pool);
        let offset = config.utc_offset().unwrap_or_else(|| Utc.fix());

        Self {
            engine: Arc::new(TriggerEngine::new(
                &stores,
                config.service_region(),
                config.trigger_settings(),
            )),
            aggregator: Arc::new(Aggregator::new(&stores, offset)),
            proximity: Arc::new(PlaceProximityIndex::new(stores.places.clone())),
            pool,
            config,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);
    let state = AppState::new(config.clone(), pool);

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let user_routes = Router::new()
        .route("/api/v1/users/register", post(users::register))
        .route("/api/v1/users/login", post(users::login))
        .route(
            "/api/v1/users/:user_id",
            get(users::get_user).patch(users::update_user),
        )
        .route("/api/v1/users/:user_id/profile", get(users::get_profile))
        .route("/api/v1/users/:user_id/dashboard", get(users::get_dashboard))
        .route("/api/v1/users/:user_id/progress", get(users::get_progress));

    let place_routes = Router::new()
        .route(
            "/api/v1/places",
            post(places::create_place).get(places::list_places),
        )
        .route("/api/v1/places/nearby", get(places::nearby_places))
        .route(
            "/api/v1/places/category/:category",
            get(places::list_places_by_category),
        )
        .route(
            "/api/v1/places/:place_id",
            get(places::get_place)
                .patch(places::update_place)
                .delete(places::delete_place),
        );

    let food_routes = Router::new()
        .route("/api/v1/foods", post(foods::create_food).get(foods::search_foods))
        .route("/api/v1/foods/:food_id", get(foods::get_food));

    let log_routes = Router::new()
        // Food logs
        .route("/api/v1/food-logs", post(food_logs::create_food_log))
        .route(
            "/api/v1/food-logs/:log_id",
            get(food_logs::get_food_log)
                .patch(food_logs::update_food_log)
                .delete(food_logs::delete_food_log),
        )
        .route(
            "/api/v1/food-logs/user/:user_id",
            get(food_logs::list_user_food_logs),
        )
        .route(
            "/api/v1/food-logs/user/:user_id/range",
            get(food_logs::list_user_food_logs_in_range),
        )
        // Food log lines
        .route("/api/v1/food-in-logs", post(food_log_entries::create_entry))
        .route(
            "/api/v1/food-in-logs/:entry_id",
            get(food_log_entries::get_entry)
                .patch(food_log_entries::update_entry)
                .delete(food_log_entries::delete_entry),
        )
        .route(
            "/api/v1/food-in-logs/log/:log_id",
            get(food_log_entries::list_log_entries),
        )
        // Activity logs
        .route(
            "/api/v1/activity-logs",
            post(activity_logs::create_activity_log),
        )
        .route(
            "/api/v1/activity-logs/bulk",
            post(activity_logs::bulk_create_activity_logs),
        )
        .route(
            "/api/v1/activity-logs/:log_id",
            get(activity_logs::get_activity_log)
                .patch(activity_logs::update_activity_log)
                .delete(activity_logs::delete_activity_log),
        )
        .route(
            "/api/v1/activity-logs/user/:user_id",
            get(activity_logs::list_user_activity_logs),
        )
        .route(
            "/api/v1/activity-logs/user/:user_id/range",
            get(activity_logs::list_user_activity_logs_in_range),
        )
        .route(
            "/api/v1/activity-logs/user/:user_id/current",
            get(activity_logs::get_current_activity),
        )
        .route(
            "/api/v1/activity-logs/user/:user_id/type/:activity_type",
            get(activity_logs::list_user_activity_logs_by_type),
        )
        // Visit logs
        .route("/api/v1/visit-logs", post(visit_logs::create_visit_log))
        .route(
            "/api/v1/visit-logs/:log_id",
            get(visit_logs::get_visit_log)
                .patch(visit_logs::update_visit_log)
                .delete(visit_logs::delete_visit_log),
        )
        .route(
            "/api/v1/visit-logs/user/:user_id",
            get(visit_logs::list_user_visit_logs),
        )
        .route(
            "/api/v1/visit-logs/user/:user_id/range",
            get(visit_logs::list_user_visit_logs_in_range),
        )
        .route(
            "/api/v1/visit-logs/place/:place_id",
            get(visit_logs::list_place_visit_logs),
        )
        // Mood logs
        .route("/api/v1/ema-logs", post(ema_logs::create_ema_log))
        .route(
            "/api/v1/ema-logs/:log_id",
            get(ema_logs::get_ema_log)
                .patch(ema_logs::update_ema_log)
                .delete(ema_logs::delete_ema_log),
        )
        .route(
            "/api/v1/ema-logs/user/:user_id",
            get(ema_logs::list_user_ema_logs),
        )
        .route(
            "/api/v1/ema-logs/user/:user_id/range",
            get(ema_logs::list_user_ema_logs_in_range),
        )
        .route(
            "/api/v1/ema-logs/user/:user_id/location",
            get(ema_logs::list_user_ema_logs_near),
        )
        // Daily summaries
        .route(
            "/api/v1/daily-summaries",
            post(daily_summaries::create_daily_summary),
        )
        .route(
            "/api/v1/daily-summaries/:summary_id",
            get(daily_summaries::get_daily_summary)
                .patch(daily_summaries::update_daily_summary)
                .delete(daily_summaries::delete_daily_summary),
        )
        .route(
            "/api/v1/daily-summaries/user/:user_id",
            get(daily_summaries::list_user_daily_summaries),
        )
        .route(
            "/api/v1/daily-summaries/user/:user_id/date/:date",
            get(daily_summaries::get_user_daily_summary_for_date),
        );

    let social_routes = Router::new()
        .route("/api/v1/friends", post(friends::create_friendship))
        .route(
            "/api/v1/friends/user/:user_id",
            get(friends::list_user_friendships),
        )
        .route(
            "/api/v1/friends/:friendship_id",
            patch(friends::update_friendship).delete(friends::delete_friendship),
        )
        .route(
            "/api/v1/notifications/:user_id/triggers",
            get(notifications::check_triggers),
        )
        .route(
            "/api/v1/notifications/:user_id/history",
            get(notifications::history),
        );

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(place_routes)
        .merge(food_routes)
        .merge(log_routes)
        .merge(social_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
