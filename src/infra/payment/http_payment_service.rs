use crate::domain::ports::{ChargeHandle, ChargeStatus, PaymentService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct HttpPaymentService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ChargePayload {
    amount: f64,
    currency: String,
    description: String,
    customer_ref: String,
}

#[derive(Deserialize)]
struct ChargeCreated {
    reference: String,
    checkout_url: String,
}

#[derive(Deserialize)]
struct ChargeState {
    status: String,
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn create_charge(&self, amount: f64, description: &str, customer_ref: &str) -> Result<ChargeHandle, AppError> {
        let payload = ChargePayload {
            amount,
            currency: "USD".to_string(),
            description: description.to_string(),
            customer_ref: customer_ref.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        let created: ChargeCreated = res.json().await
            .map_err(|e| AppError::Upstream(format!("Payment service returned invalid body: {}", e)))?;

        Ok(ChargeHandle {
            reference: created.reference,
            checkout_url: created.checkout_url,
        })
    }

    async fn charge_status(&self, reference: &str) -> Result<ChargeStatus, AppError> {
        let url = format!("{}/{}", self.api_url.trim_end_matches('/'), reference);

        let res = self.client.get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Payment service connection error: {}", e)))?;

        if !res.status().is_success() {
            return Err(AppError::Upstream(format!("Payment status lookup failed: {}", res.status())));
        }

        let state: ChargeState = res.json().await
            .map_err(|e| AppError::Upstream(format!("Payment service returned invalid body: {}", e)))?;

        match state.status.as_str() {
            "paid" => Ok(ChargeStatus::Paid),
            "unpaid" | "failed" | "expired" => Ok(ChargeStatus::Unpaid),
            _ => Ok(ChargeStatus::Pending),
        }
    }
}
