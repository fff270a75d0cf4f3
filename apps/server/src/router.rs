use axum::Router;
use girder::Environment;
use girder::kernel::server::dispatch::dispatch_handler;
use girder::kernel::server::router::system_router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
struct ApiDoc;

#[allow(unreachable_pub)]
pub fn init(environment: Environment) -> Router {
    let api = ApiDoc::openapi();

    // Separate the OpenAPI routes and the API documentation object
    let (openapi_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(system_router())
        .layer(TraceLayer::new_for_http())
        .with_state(environment.clone())
        .split_for_parts();

    // Create the Scalar UI routes
    let scalar_routes = Scalar::with_url("/api", api_doc);

    // Everything unmatched goes to the graph dispatcher
    let dispatch_routes = Router::new().fallback(dispatch_handler).with_state(environment);

    Router::new().merge(openapi_routes).merge(scalar_routes).merge(dispatch_routes)
}
