//! HTTP adapter around the analysis engine.
//!
//! Callers send records they already fetched from the cell database; nothing
//! here talks to the upstream service.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use wavetracker::{
    analyze_single_tower,
    insight::{prompt, CannedInsights, InsightGenerator},
    AnalysisResult, BoundingBox, Error, RawTowerRecord,
};

use crate::{config::Config, selection};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaRequest {
    bbox: BoundingBox,
    #[serde(default)]
    cells: Vec<RawTowerRecord>,
    #[serde(default)]
    radio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsightsRequest {
    question: Option<String>,
    data: Option<AnalysisResult>,
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    prompt: String,
    insights: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(tower_service)
        .service(area_service)
        .service(area_size_service)
        .service(insights_service);
}

fn bad_request(reason: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": {
            "code": 400,
            "reason": reason,
            "message": message,
        }
    }))
}

fn engine_error(e: Error) -> HttpResponse {
    bad_request(e.reason(), e.to_string())
}

#[post("/v1/analysis/tower")]
pub async fn tower_service(data: web::Json<RawTowerRecord>) -> actix_web::Result<HttpResponse> {
    match analyze_single_tower(&data.into_inner()) {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            debug!("rejected tower: {e}");
            Ok(engine_error(e))
        }
    }
}

#[post("/v1/analysis/area")]
pub async fn area_service(
    data: web::Json<AreaRequest>,
    config: web::Data<Config>,
) -> actix_web::Result<HttpResponse> {
    let AreaRequest { bbox, cells, radio } = data.into_inner();

    match selection::analyze(cells, &bbox, radio.as_deref(), config.max_area_records) {
        Ok(report) => Ok(HttpResponse::Ok().json(report)),
        Err(e) => Ok(engine_error(e)),
    }
}

#[post("/v1/analysis/area-size")]
pub async fn area_size_service(data: web::Json<BoundingBox>) -> actix_web::Result<HttpResponse> {
    match data.area_km2() {
        Ok(area) => Ok(HttpResponse::Ok().json(json!({ "areaSizeKm2": area }))),
        Err(e) => Ok(engine_error(e)),
    }
}

#[post("/v1/insights")]
pub async fn insights_service(data: web::Json<InsightsRequest>) -> actix_web::Result<HttpResponse> {
    let InsightsRequest { question, data } = data.into_inner();
    let (Some(question), Some(data)) = (question.filter(|q| !q.trim().is_empty()), data) else {
        return Ok(bad_request(
            "missingParameters",
            "both question and data are required".to_owned(),
        ));
    };

    Ok(HttpResponse::Ok().json(InsightsResponse {
        prompt: prompt(&question, &data),
        insights: CannedInsights.generate(&question, &data),
    }))
}
