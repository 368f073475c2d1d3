// File: services/reserva_backend/src/main.rs
use axum::{http::Method, routing::get, Router};
use reserva_booking::handlers::BookingState;
use reserva_booking::routes as booking_routes;
use reserva_common::error::{config_error, ReservaError};
use reserva_common::logging;
use reserva_config::load_config;
use reserva_backend::service_factory::calendar_service;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let _guard = logging::init();

    if let Err(e) = run().await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ReservaError> {
    let config = Arc::new(load_config()?);

    let api_router: Router = Router::new().route("/", get(|| async { "Welcome to Reserva API!" }));

    let booking_router = match calendar_service(&config).await? {
        Some(binding) => {
            let state = BookingState::from_config(&config, binding.service, binding.calendar_id)
                .map_err(config_error)?;
            Some(booking_routes::routes(Arc::new(state)))
        }
        None => {
            warn!("No calendar configured, /api/booking is not mounted");
            None
        }
    };

    let api_router = Router::new().nest("/api", {
        let mut router = api_router;
        if let Some(booking_router) = booking_router {
            router = router.merge(booking_router);
        }
        router
    });

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = api_router;

    // Swagger UI and the JSON document when built with openapi
    #[cfg(feature = "openapi")]
    {
        use reserva_booking::doc::BookingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Reserva API",
                version = "0.1.0",
                description = "Appointment booking API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Reserva", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
