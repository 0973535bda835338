use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ATCRadio Listeners API",
        version = "0.1.0",
        description = "Comptage approximatif des auditeurs par heartbeat",
    ),
    paths(
        crate::api::register_heartbeat,
        crate::api::count_listeners,
        crate::api::remove_listener,
    ),
    components(
        schemas(
            crate::api::SessionRequest,
            crate::api::ListenersUpdateResponse,
            crate::api::ListenersCountResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "listeners", description = "Registre des auditeurs")
    )
)]
pub struct ListenersApiDoc;
