//! Exchange rates, conversion, history, and admin currency CRUD.

use actix_web::{delete, get, post, put, web, HttpResponse, Scope};
use ratetrack_common::CurrencyCode;
use ratetrack_fx::{FxError, Side};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{CurrencyStore, CurrencyUpdate};

pub fn scope() -> Scope {
    web::scope("/currency")
        .service(rates)
        .service(convert)
        .service(history)
        .service(create_currency)
        .service(list_currencies)
        .service(update_currency)
        .service(delete_currency)
}

/// Current exchange-rate table (public).
#[get("/rates")]
async fn rates(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let rates = state.conversions.current_rates().await?;
    Ok(HttpResponse::Ok().json(json!({ "rates": rates })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    amount: Option<f64>,
    from_currency: Option<String>,
    to_currency: Option<String>,
}

/// Convert an amount between two currencies and record the result.
#[post("/convert")]
async fn convert(
    user: AuthUser,
    state: web::Data<AppState>,
    body: web::Json<ConvertRequest>,
) -> Result<HttpResponse, ApiError> {
    let ConvertRequest {
        amount,
        from_currency,
        to_currency,
    } = body.into_inner();

    // Checked before any rate fetch happens.
    let amount = match amount {
        Some(a) if a.is_finite() && a > 0.0 => a,
        _ => {
            return Err(ApiError::Validation(
                "Amount must be a positive number".to_string(),
            ))
        }
    };

    let (from, to) = match (non_empty(from_currency), non_empty(to_currency)) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return Err(ApiError::Validation(
                "Both fromCurrency and toCurrency are required".to_string(),
            ))
        }
    };

    let from = parse_code(&from, Side::From)?;
    let to = parse_code(&to, Side::To)?;

    let outcome = state
        .conversions
        .convert_and_record(user.id, from, to, amount)
        .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// Conversion history for the authenticated user, most recent first.
#[get("/history")]
async fn history(user: AuthUser, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state.conversions.history(user.id).await?;
    Ok(HttpResponse::Ok().json(records))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A present-but-malformed code gets the same message an unknown code does.
fn parse_code(raw: &str, side: Side) -> Result<CurrencyCode, ApiError> {
    CurrencyCode::new(raw).map_err(|_| {
        ApiError::Fx(FxError::UnknownCurrency {
            side,
            code: raw.to_string(),
        })
    })
}

#[derive(Debug, Deserialize)]
pub struct NewCurrencyRequest {
    code: Option<String>,
    name: Option<String>,
    rate: Option<f64>,
}

/// Create a currency record (admin only).
#[post("/admin/currencies")]
async fn create_currency(
    _admin: AdminUser,
    state: web::Data<AppState>,
    body: web::Json<NewCurrencyRequest>,
) -> Result<HttpResponse, ApiError> {
    let NewCurrencyRequest { code, name, rate } = body.into_inner();

    let (code, name, rate) = match (code, name, rate) {
        (Some(code), Some(name), Some(rate)) if !name.is_empty() && rate.is_finite() => {
            (code, name, rate)
        }
        _ => return Err(ApiError::Validation("Invalid currency data".to_string())),
    };
    let Ok(code) = CurrencyCode::new(&code) else {
        return Err(ApiError::Validation("Invalid currency data".to_string()));
    };

    let currency = state
        .currencies
        .create(&code, &name, rate)
        .await
        .map_err(ApiError::store("Failed to create currency record"))?;

    Ok(HttpResponse::Created().json(currency))
}

/// List all currency records (admin only).
#[get("/admin/currencies")]
async fn list_currencies(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let currencies = state
        .currencies
        .list()
        .await
        .map_err(ApiError::store("Failed to fetch currencies"))?;

    Ok(HttpResponse::Ok().json(currencies))
}

/// Update a currency record (admin only).
#[put("/admin/currencies/{id}")]
async fn update_currency(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    body: web::Json<CurrencyUpdate>,
) -> Result<HttpResponse, ApiError> {
    let updated = state
        .currencies
        .update(id.into_inner(), body.into_inner())
        .await
        .map_err(ApiError::store("Failed to update currency record"))?;

    match updated {
        Some(currency) => Ok(HttpResponse::Ok().json(currency)),
        None => Err(ApiError::NotFound("Currency")),
    }
}

/// Delete a currency record (admin only).
#[delete("/admin/currencies/{id}")]
async fn delete_currency(
    _admin: AdminUser,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let deleted = state
        .currencies
        .delete(id.into_inner())
        .await
        .map_err(ApiError::store("Failed to delete currency record"))?;

    if deleted {
        Ok(HttpResponse::Ok().json(json!({ "message": "Currency deleted successfully" })))
    } else {
        Err(ApiError::NotFound("Currency"))
    }
}
