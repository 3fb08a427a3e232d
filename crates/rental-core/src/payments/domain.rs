use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Month, PaymentId, PropertyId, UnitId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

/// A rent payment. Completion is synchronous and optimistic: there is no
/// gateway callback, so a submitted payment lands as `Completed`.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub payer_id: AccountId,
    pub unit_id: Option<UnitId>,
    pub property_id: Option<PropertyId>,
    /// Amount in cents; historical amounts are never edited.
    pub amount_cents: u64,
    pub month: Month,
    pub year: i32,
    pub status: PaymentStatus,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    pub fn view(&self) -> PaymentView {
        PaymentView {
            id: self.id,
            payer_id: self.payer_id,
            unit_id: self.unit_id,
            amount: self.amount_cents as f64 / 100.0,
            month: self.month,
            year: self.year,
            status: self.status,
            method: self.method.clone(),
            paid_at: self.paid_at,
        }
    }
}

/// Client-facing payment row.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub payer_id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub amount: f64,
    pub month: Month,
    pub year: i32,
    pub status: PaymentStatus,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}

/// Input to `MakePayment`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    /// Dollars as entered on the form.
    pub amount: f64,
    pub month: Month,
    pub year: i32,
    pub payment_method: String,
}
