//! Mock payment endpoints mirroring the original Stripe checkout mock.
//!
//! Nothing here is persisted; the handlers validate input and answer with
//! fixed session/payment shapes.

use actix_web::{get, post, web, HttpResponse, Scope};
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;

pub fn scope() -> Scope {
    web::scope("/payment")
        .service(checkout)
        .service(process)
        .service(history)
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    amount: Option<f64>,
    currency: Option<String>,
    description: Option<String>,
}

/// Create a mock checkout session. Failures use an `{error}` body, unlike
/// the rest of the API.
#[post("/checkout")]
async fn checkout(body: web::Json<CheckoutRequest>) -> HttpResponse {
    let CheckoutRequest {
        amount,
        currency,
        description,
    } = body.into_inner();

    if !amount.is_some_and(|a| a.is_finite() && a > 0.0) {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Invalid amount. Must be a positive number." }));
    }

    if !currency.as_deref().is_some_and(|c| c.len() == 3) {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Invalid currency. Currency code must be a 3-letter string." }));
    }

    if !description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Invalid description. Description cannot be empty." }));
    }

    HttpResponse::Ok().json(json!({
        "id": "mockSessionId",
        "url": "https://mock.stripe.url/session",
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    amount: Option<f64>,
    items: Option<Vec<serde_json::Value>>,
}

/// Process a mock payment.
#[post("/process")]
async fn process(body: web::Json<ProcessRequest>) -> Result<HttpResponse, ApiError> {
    let ProcessRequest { amount, items } = body.into_inner();

    let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
        return Err(ApiError::Validation(
            "Invalid amount. Must be a positive number.".to_string(),
        ));
    };

    let Some(items) = items.filter(|items| !items.is_empty()) else {
        return Err(ApiError::Validation(
            "Invalid items. Must be a non-empty array.".to_string(),
        ));
    };

    let payment = json!({
        "id": rand::thread_rng().gen_range(0..1_000_000),
        "amount": amount,
        "items": items,
        "status": "completed",
        "timestamp": Utc::now(),
    });

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payment processed successfully",
        "payment": payment,
    })))
}

/// Mock payment history.
#[get("/history")]
async fn history() -> HttpResponse {
    let payments = json!([
        {
            "id": 123456,
            "amount": 100.50,
            "status": "completed",
            "timestamp": Utc::now() - Duration::days(1),
        },
        {
            "id": 123457,
            "amount": 75.25,
            "status": "completed",
            "timestamp": Utc::now() - Duration::days(2),
        },
    ]);

    HttpResponse::Ok().json(json!({ "payments": payments }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::store::memory::MemoryStore;
    use crate::test_support::test_state;
    use actix_web::{test, App};
    use ratetrack_fx::provider::MockRateSource;
    use std::sync::Arc;

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .app_data(routes::json_config())
                    .configure(routes::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_checkout_returns_mock_session() {
        let state = test_state(Arc::new(MockRateSource::new()), Arc::new(MemoryStore::new()));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/payment/checkout")
            .set_json(json!({ "amount": 49.99, "currency": "USD", "description": "Cart" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "mockSessionId");
        assert_eq!(body["url"], "https://mock.stripe.url/session");
    }

    #[actix_web::test]
    async fn test_checkout_validation_uses_error_key() {
        let state = test_state(Arc::new(MockRateSource::new()), Arc::new(MemoryStore::new()));
        let app = test_app!(state);

        let cases = [
            (
                json!({ "currency": "USD", "description": "Cart" }),
                "Invalid amount. Must be a positive number.",
            ),
            (
                json!({ "amount": 10.0, "currency": "DOLLARS", "description": "Cart" }),
                "Invalid currency. Currency code must be a 3-letter string.",
            ),
            (
                json!({ "amount": 10.0, "currency": "USD", "description": "   " }),
                "Invalid description. Description cannot be empty.",
            ),
        ];

        for (payload, error) in cases {
            let req = test::TestRequest::post()
                .uri("/api/payment/checkout")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status().as_u16(), 400);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], error);
        }
    }

    #[actix_web::test]
    async fn test_process_mock_payment() {
        let state = test_state(Arc::new(MockRateSource::new()), Arc::new(MemoryStore::new()));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/payment/process")
            .set_json(json!({ "amount": 10.0, "items": [{ "sku": "a" }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Payment processed successfully");
        assert_eq!(body["payment"]["status"], "completed");
        assert_eq!(body["payment"]["amount"], 10.0);
    }

    #[actix_web::test]
    async fn test_process_rejects_empty_items() {
        let state = test_state(Arc::new(MockRateSource::new()), Arc::new(MemoryStore::new()));
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/payment/process")
            .set_json(json!({ "amount": 10.0, "items": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid items. Must be a non-empty array.");
    }

    #[actix_web::test]
    async fn test_payment_history_shape() {
        let state = test_state(Arc::new(MockRateSource::new()), Arc::new(MemoryStore::new()));
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/api/payment/history").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["payments"].as_array().unwrap().len(), 2);
    }
}
