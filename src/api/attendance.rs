use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::errors::SubmitError;
use crate::submit::{Ack, RecordSubmitter};

/// Submission envelope shared by both record kinds. `data` is positional:
/// `[name, time, marker]` for attendance, `[driverName, location, purpose,
/// visitTime]` for site visits.
#[derive(Deserialize, ToSchema)]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    #[schema(example = "attendance")]
    pub kind: String,
    #[schema(example = json!(["Alex", "08:50", "in"]))]
    pub data: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    #[schema(example = true)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Record submission endpoint
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission handled; the success flag reports the outcome", body = SubmitResponse, example = json!({
            "success": true
        })),
        (status = 400, description = "Unrecognized record type", body = SubmitResponse, example = json!({
            "success": false,
            "error": "Invalid type"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn submit(
    submitter: web::Data<RecordSubmitter>,
    payload: web::Json<SubmitRequest>,
) -> actix_web::Result<impl Responder> {
    match payload.kind.as_str() {
        "attendance" => {
            // data[2] carries the form's in/out marker; the status written
            // to the sheet is recomputed from the time either way.
            let (name, time) = match (payload.data.first(), payload.data.get(1)) {
                (Some(name), Some(time)) => (name.as_str(), time.as_str()),
                _ => {
                    return Ok(HttpResponse::Ok().json(SubmitResponse::failed(
                        "attendance expects [name, time, status]",
                    )));
                }
            };
            Ok(respond(submitter.submit_attendance(name, time).await))
        }
        "site-visit" => match payload.data.as_slice() {
            [driver_name, location, purpose, visit_time, ..] => Ok(respond(
                submitter
                    .submit_site_visit(driver_name, location, purpose, visit_time)
                    .await,
            )),
            _ => Ok(HttpResponse::Ok().json(SubmitResponse::failed(
                "site-visit expects [driverName, location, purpose, visitTime]",
            ))),
        },
        other => {
            warn!(kind = other, "rejected submission with unknown type");
            Ok(HttpResponse::BadRequest().json(SubmitResponse::failed("Invalid type")))
        }
    }
}

fn respond(result: Result<Ack, SubmitError>) -> HttpResponse {
    match result {
        Ok(_) => HttpResponse::Ok().json(SubmitResponse::ok()),
        Err(e) => {
            match &e {
                SubmitError::Persistence { .. } => error!(error = %e, "submission failed"),
                _ => warn!(error = %e, "submission rejected"),
            }
            HttpResponse::Ok().json(SubmitResponse::failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::fake::{Call, FakeGateway};
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web::Data};
    use std::sync::Arc;

    fn submitter_data(gateway: Arc<FakeGateway>) -> Data<RecordSubmitter> {
        Data::new(RecordSubmitter::new(gateway, "Site Visits"))
    }

    async fn call(
        gateway: Arc<FakeGateway>,
        body: serde_json::Value,
    ) -> (StatusCode, SubmitResponse) {
        let app = test::init_service(
            App::new()
                .app_data(submitter_data(gateway))
                .route("/api/attendance", web::post().to(submit)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: SubmitResponse = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn records_attendance_submission() {
        let gateway = Arc::new(FakeGateway::with_roster(3, &[("Alex", 5)]));
        let (status, body) = call(
            gateway.clone(),
            json!({ "type": "attendance", "data": ["Alex", "08:50", "in"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert!(body.error.is_none());
        assert!(
            gateway
                .calls()
                .iter()
                .any(|c| matches!(c, Call::Write { .. }))
        );
    }

    #[actix_web::test]
    async fn records_site_visit_submission() {
        let gateway = Arc::new(FakeGateway::default());
        let (status, body) = call(
            gateway.clone(),
            json!({ "type": "site-visit", "data": ["Sam", "Depot 3", "Delivery", "13:00"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert!(
            gateway
                .calls()
                .iter()
                .any(|c| matches!(c, Call::Append { .. }))
        );
    }

    #[actix_web::test]
    async fn unknown_type_is_a_bad_request() {
        let gateway = Arc::new(FakeGateway::default());
        let (status, body) = call(gateway, json!({ "type": "overtime", "data": ["Alex"] })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Invalid type"));
    }

    #[actix_web::test]
    async fn unknown_driver_reports_failure_with_200() {
        let gateway = Arc::new(FakeGateway::with_roster(3, &[]));
        let (status, body) = call(
            gateway.clone(),
            json!({ "type": "attendance", "data": ["Nobody", "08:50", "in"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.success);
        assert!(body.error.is_some());
        assert!(
            !gateway
                .calls()
                .iter()
                .any(|c| matches!(c, Call::Write { .. }))
        );
    }

    #[actix_web::test]
    async fn short_data_array_reports_failure() {
        let gateway = Arc::new(FakeGateway::default());
        let (status, body) = call(
            gateway.clone(),
            json!({ "type": "attendance", "data": ["Alex"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.success);
        assert!(gateway.calls().is_empty());
    }
}
