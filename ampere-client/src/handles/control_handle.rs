use ampere_api::models::{Channel, MonthlyQuery};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::monitor::MonitorHandle;

#[derive(Clone)]
pub struct ControlState {
    pub monitor: MonitorHandle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitBody {
    /// Raw user input, validated by the monitor
    pub minutes: String,
}

pub async fn get_device(
    Path(channel): Path<String>,
    State(state): State<ControlState>,
) -> Result<impl IntoResponse, Error> {
    let channel = channel.parse::<Channel>()?;

    Ok(Json(state.monitor.reading(channel)))
}

pub async fn power_on(
    Path(channel): Path<String>,
    State(state): State<ControlState>,
) -> Result<impl IntoResponse, Error> {
    let channel = channel.parse::<Channel>()?;

    Ok(Json(state.monitor.power_on(channel).await?))
}

pub async fn power_off(
    Path(channel): Path<String>,
    State(state): State<ControlState>,
) -> Result<impl IntoResponse, Error> {
    let channel = channel.parse::<Channel>()?;

    Ok(Json(state.monitor.power_off(channel).await?))
}

pub async fn get_monthly_usage(
    Path(channel): Path<String>,
    State(state): State<ControlState>,
    Json(query): Json<MonthlyQuery>,
) -> Result<impl IntoResponse, Error> {
    let channel = channel.parse::<Channel>()?;

    Ok(Json(state.monitor.monthly(channel, query).await?))
}

pub async fn set_limit(
    State(state): State<ControlState>,
    Json(body): Json<LimitBody>,
) -> Result<impl IntoResponse, Error> {
    let minutes = state.monitor.arm_limit(&body.minutes).await?;

    Ok(format!("Usage limit set for {} minutes", minutes))
}
