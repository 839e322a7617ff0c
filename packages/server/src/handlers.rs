//! HTTP handler functions for the youth dashboard API.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use youth_map_demographics::{EngineError, parse_age_group, parse_metric};
use youth_map_demographics_models::AgeGroup;
use youth_map_server_models::{AgeGroupQuery, ApiError, ApiHealth};

use crate::AppState;

fn error_response(error: &EngineError) -> HttpResponse {
    let body = ApiError::new(error.to_string());
    match error {
        EngineError::InvalidSelector { .. } | EngineError::InvalidMetric { .. } => {
            HttpResponse::BadRequest().json(body)
        }
        EngineError::NotFound { .. } => HttpResponse::NotFound().json(body),
        EngineError::MissingInputData { .. } | EngineError::InvalidColumnTable { .. } => {
            log::error!("Failed to serve statistics: {error}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, EngineError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn age_group(query: &AgeGroupQuery) -> Result<AgeGroup, EngineError> {
    parse_age_group(query.selector())
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/geral`
///
/// State-wide summary for the requested age group.
pub async fn state_summary(
    state: web::Data<AppState>,
    query: web::Query<AgeGroupQuery>,
) -> HttpResponse {
    respond(age_group(&query).and_then(|g| state.stats.state_summary(g)))
}

/// `GET /api/municipios`
///
/// Sorted list of municipality names.
pub async fn municipalities(state: web::Data<AppState>) -> HttpResponse {
    respond(state.stats.municipality_names())
}

/// `GET /api/municipio/{nome}`
///
/// Summary of one municipality. The name is matched case- and
/// whitespace-insensitively.
pub async fn municipality(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<AgeGroupQuery>,
) -> HttpResponse {
    let name = path.into_inner();
    respond(age_group(&query).and_then(|g| state.stats.municipality_summary(&name, g)))
}

/// `GET /api/mapa`
///
/// Municipality boundaries with statistics attached, as a `GeoJSON`
/// feature collection.
pub async fn map(state: web::Data<AppState>, query: web::Query<AgeGroupQuery>) -> HttpResponse {
    respond(age_group(&query).and_then(|g| state.stats.map(g)))
}

/// `GET /api/ranking/{metric}`
///
/// Top and bottom five municipalities by `metric`.
pub async fn ranking(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<AgeGroupQuery>,
) -> HttpResponse {
    let result = parse_metric(&path).and_then(|metric| {
        let g = age_group(&query)?;
        state.stats.ranking(metric, g)
    });
    respond(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use geojson::{Geometry, Value};
    use serde_json::Value as Json;
    use youth_map_demographics::Engine;
    use youth_map_demographics_models::RawRecord;
    use youth_map_geography_models::MunicipalityGeometry;

    use crate::{AppState, configure};

    fn state() -> web::Data<AppState> {
        let records = vec![
            RawRecord::new("Manaus")
                .with_population(100.0)
                .with_income(1000.0)
                .with_vulnerability(0.2)
                .with_count("15-19 ANOS", 10)
                .with_count("15-19 ANOS, RAÇA PARDA", 10)
                .with_count("15 A 19 ANOS, ALFABETIZADAS", 9),
            RawRecord::new("Tefé")
                .with_population(300.0)
                .with_income(2000.0)
                .with_vulnerability(0.8)
                .with_count("20-24 ANOS", 4)
                .with_count("20-24 ANOS, RAÇA INDÍGENA", 4)
                .with_count("20 A 24 ANOS, ALFABETIZADAS", 2),
        ];
        let geometries = ["Manaus", "Tefé", "Japurá"]
            .iter()
            .map(|name| MunicipalityGeometry {
                name: (*name).to_string(),
                geometry: Geometry::new(Value::Polygon(vec![vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![1.0, 1.0],
                    vec![0.0, 0.0],
                ]])),
            })
            .collect();
        let engine = Engine::new(records, geometries).unwrap();
        web::Data::new(AppState {
            stats: Arc::new(engine),
        })
    }

    async fn get(uri: &str) -> (u16, Json) {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status().as_u16();
        let body: Json = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn health() {
        let (status, body) = get("/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["healthy"], true);
    }

    #[actix_web::test]
    async fn state_summary_defaults_to_geral() {
        let (status, body) = get("/api/geral").await;
        assert_eq!(status, 200);
        assert_eq!(body["total_jovens"], 14);
        assert_eq!(body["renda_media"], 1750.0);
        assert_eq!(body["distribuicao_raca"]["indigena"], 4);
    }

    #[actix_web::test]
    async fn state_summary_for_one_bracket() {
        let (status, body) = get("/api/geral?age_group=20-24").await;
        assert_eq!(status, 200);
        assert_eq!(body["total_jovens"], 4);
        assert_eq!(body["taxa_alfabetizacao_jovens"], 50.0);
        assert_eq!(body["distribuicao_etaria"]["20 a 24"], 4);
    }

    #[actix_web::test]
    async fn invalid_selector_is_bad_request() {
        let (status, body) = get("/api/geral?age_group=30-34").await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("30-34"));
    }

    #[actix_web::test]
    async fn lists_municipalities() {
        let (status, body) = get("/api/municipios").await;
        assert_eq!(status, 200);
        assert_eq!(body, serde_json::json!(["MANAUS", "TEFÉ"]));
    }

    #[actix_web::test]
    async fn municipality_name_is_normalized() {
        let (status, body) = get("/api/municipio/tef%C3%A9?age_group=20-24").await;
        assert_eq!(status, 200);
        assert_eq!(body["total_jovens"], 4);
    }

    #[actix_web::test]
    async fn unknown_municipality_is_not_found() {
        let (status, body) = get("/api/municipio/Japur%C3%A1").await;
        assert_eq!(status, 404);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn map_has_every_boundary() {
        let (status, body) = get("/api/mapa?age_group=15-19").await;
        assert_eq!(status, 200);
        assert_eq!(body["type"], "FeatureCollection");
        let features = body["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[2]["properties"]["nome"], "Japurá");
        assert_eq!(features[2]["properties"]["total_jovens"], 0);
    }

    #[actix_web::test]
    async fn ranking_orders_by_metric() {
        let (status, body) = get("/api/ranking/renda").await;
        assert_eq!(status, 200);
        assert_eq!(body["top_5"][0]["municipio"], "TEFÉ");
        assert_eq!(body["top_5"][0]["value"], 2000.0);
        assert_eq!(body["bottom_5"][0]["municipio"], "MANAUS");
    }

    #[actix_web::test]
    async fn invalid_metric_is_bad_request() {
        let (status, _) = get("/api/ranking/idade").await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn ranking_rejects_invalid_selector() {
        let (status, _) = get("/api/ranking/populacao?age_group=todos").await;
        assert_eq!(status, 400);
    }
}
