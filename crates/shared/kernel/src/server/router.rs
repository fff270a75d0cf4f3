use super::health;
use crate::environment::Environment;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn system_router() -> OpenApiRouter<Environment> {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}
