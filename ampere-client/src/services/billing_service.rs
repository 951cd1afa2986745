use std::time::Duration;

use ampere_api::models::{BillRequest, Channel, MonthlyQuery, MonthlyUsage};
use async_trait::async_trait;
use reqwest::Client;

use crate::configs::Billing;
use crate::error::Result;

/// Remote store for per-session bills.
#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// Stores the session totals of `channel`, replacing the session's previous record.
    async fn submit(&self, channel: Channel, bill: &BillRequest) -> Result<String>;

    async fn monthly(&self, channel: Channel, query: MonthlyQuery) -> Result<MonthlyUsage>;
}

pub struct BillingService {
    client: Client,
    base_url: String,
}

impl BillingService {
    pub fn new(billing: &Billing) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(billing.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: billing.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BillingGateway for BillingService {
    async fn submit(&self, channel: Channel, bill: &BillRequest) -> Result<String> {
        let response = self.client
            .post(format!("{}{}", self.base_url, channel.bill_path()))
            .json(bill)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    async fn monthly(&self, channel: Channel, query: MonthlyQuery) -> Result<MonthlyUsage> {
        let usage = self.client
            .post(format!("{}{}", self.base_url, channel.monthly_path()))
            .json(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<MonthlyUsage>()
            .await?;

        Ok(usage)
    }
}
