use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::provider::CourseProvider;
use crate::ui::Icons;

pub mod routes;

/// Server state
pub struct AppState {
    pub provider: CourseProvider,
}

/// Routes mirroring the course addressing scheme
pub fn router(provider: CourseProvider) -> Router {
    let state = Arc::new(AppState { provider });

    Router::new()
        .route(
            "/courses",
            get(routes::list_courses)
                .post(routes::create_course)
                .delete(routes::delete_all_courses),
        )
        .route(
            "/courses/{id}",
            get(routes::get_course)
                .put(routes::update_course)
                .delete(routes::delete_course),
        )
        .route("/summary", get(routes::get_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, provider: CourseProvider) -> anyhow::Result<()> {
    let app = router(provider);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Starting server on {}", addr);
    println!("{} Server running at http://{}", Icons::GLOBE, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
