use std::sync::Arc;

use ampere_api::models::{BillRequest, Channel, MonthlyQuery, MonthlyUsage};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use time::OffsetDateTime;

use crate::configs::Storage;
use crate::errors::{ApiError, BillError};
use crate::models::Bill;
use crate::repositories::BillRepository;

#[derive(Clone)]
pub struct BillState {
    pub storage: Arc<Storage>,
}

fn parse_device(device: &str) -> Result<Channel, BillError> {
    device
        .strip_prefix("device")
        .and_then(|number| number.parse::<u8>().ok())
        .and_then(|number| Channel::try_from(number).ok())
        .ok_or_else(|| BillError::UnknownDevice(device.to_string()))
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BillError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BillError::InvalidBody(rejection.body_text()))
}

/// Replaces whatever the session stored before for this device with the new totals.
pub async fn store_bill(
    Path(device): Path<String>,
    State(state): State<BillState>,
    payload: Result<Json<BillRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let channel = parse_device(&device)?;
    let body = parse_body(payload)?;
    let repository = BillRepository::new(state.storage.clone());
    let now = OffsetDateTime::now_utc();

    let mut tx = state.storage.get_pool().begin().await?;

    let replaced = repository
        .delete_by_session(channel.number().into(), &body.session_id, &mut tx)
        .await?;

    repository
        .create(
            &Bill {
                id: 0,
                device: channel.number().into(),
                session_id: body.session_id.clone(),
                power_used: body.power_used,
                price: body.price,
                month: u8::from(now.month()).into(),
                year: now.year(),
                created_at: now,
            },
            &mut tx,
        )
        .await?;

    tx.commit().await?;

    tracing::debug!(
        session = %body.session_id,
        replaced,
        "stored {} bill: {} Wh, price {}",
        channel,
        body.power_used,
        body.price
    );

    Ok(format!("{} bill stored for session", channel))
}

pub async fn get_monthly_bill(
    Path(device): Path<String>,
    State(state): State<BillState>,
    payload: Result<Json<MonthlyQuery>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let channel = parse_device(&device)?;
    let query = parse_body(payload)?;

    if !query.is_valid() {
        return Err(BillError::InvalidMonth(query.month).into());
    }

    let (power_used, price) = BillRepository::new(state.storage.clone())
        .sum_by_period(channel.number().into(), query.month.into(), query.year)
        .await?;

    Ok(Json(MonthlyUsage { power_used, price }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device() {
        assert_eq!(parse_device("device1").unwrap(), Channel::One);
        assert_eq!(parse_device("device2").unwrap(), Channel::Two);
        assert!(parse_device("device3").is_err());
        assert!(parse_device("1").is_err());
        assert!(parse_device("devicedevice1").is_err());
        assert!(parse_device("device").is_err());
    }
}
