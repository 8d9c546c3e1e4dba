// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::multipart::MAX_FORM_BYTES,
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::auth_guard,
};

pub fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Define as rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let customer_routes = Router::new()
        .route(
            "/",
            post(handlers::customers::create_customer).get(handlers::customers::list_customers),
        )
        .route("/counts", get(handlers::customers::status_counts))
        .route(
            "/{code}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route("/{code}/status", patch(handlers::customers::set_status))
        .route("/{code}/notify", post(handlers::customers::notify_customer))
        // Dois arquivos de até 15 MB + campos
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES));

    let staff_routes = Router::new()
        .route(
            "/",
            post(handlers::staff::create_staff).get(handlers::staff::list_staff),
        )
        .route(
            "/{id}",
            get(handlers::staff::get_staff)
                .put(handlers::staff::update_staff)
                .delete(handlers::staff::delete_staff),
        )
        .route("/{id}/status", patch(handlers::staff::update_status))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES));

    let lead_option_routes = Router::new()
        .route("/add", post(handlers::lead_options::add_option))
        .route("/all", get(handlers::lead_options::list_options))
        .route("/field/{name}", get(handlers::lead_options::options_by_field))
        .route("/update/{id}", put(handlers::lead_options::update_option))
        .route("/delete/{id}", delete(handlers::lead_options::delete_option))
        .route("/delete-multiple", delete(handlers::lead_options::delete_many));

    let notification_routes =
        Router::new().route("/whatsapp", post(handlers::notifications::send_whatsapp));

    let report_routes = Router::new()
        .route("/customers", get(handlers::reports::customer_report))
        .route("/staff", get(handlers::reports::staff_report));

    // Tudo abaixo exige token
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/staff", staff_routes)
        .nest("/api/lead-options", lead_option_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/reports", report_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
