use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ATCRadio Weather API",
        version = "0.1.0",
        description = "Météo aéronautique (METAR/TAF) et heures du soleil",
    ),
    paths(crate::api::get_weather),
    components(schemas(crate::models::WeatherReport)),
    tags(
        (name = "weather", description = "Météo des aéroports")
    )
)]
pub struct WeatherApiDoc;
