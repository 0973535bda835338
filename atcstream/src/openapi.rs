use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ATCRadio Stream API",
        version = "0.1.0",
        description = "Relais des flux audio ATC et catalogue des aéroports",
    ),
    paths(
        crate::api_rest::proxy_stream,
        crate::api_rest::proxy_legacy,
        crate::api_rest::stream_preflight,
        crate::api_rest::stream_info,
        crate::api_rest::list_airports,
    ),
    components(
        schemas(
            crate::airports::Airport,
            crate::models::StationSource,
            crate::models::StreamInfo,
            crate::api_rest::ErrorResponse,
        )
    ),
    tags(
        (name = "stream", description = "Relais audio et informations de flux")
    )
)]
pub struct StreamApiDoc;
