// --- File: crates/services/paygate_backend/src/router.rs ---
use axum::Router;
use paygate_stripe::PaymentsService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assembles the HTTP surface: health, payments and (with `openapi`) the docs.
pub fn build_router(payments: Arc<PaymentsService>) -> Router {
    #[allow(unused_mut)] // only mutated with the openapi feature
    let mut app = Router::new()
        .merge(paygate_common::routes())
        .merge(paygate_stripe::routes(payments));

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use paygate_stripe::doc::PaymentsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Paygate API",
                version = "0.1.0",
                description = "Payments microservice API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags((name = "Payments", description = "Stripe checkout sessions and webhook relay")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(PaymentsApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /docs");

        app = app.merge(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
}
