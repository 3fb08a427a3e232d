use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tracing::info;

use crate::domain::{Actor, Month, PaymentId};
use crate::error::ApiError;
use crate::policy::{self, AccessDenied, Action};
use crate::repository::RepositoryError;
use crate::visibility;

use super::domain::{Payment, PaymentRequest, PaymentStatus, PaymentView};
use super::repository::PaymentRepository;

static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Service owning payment submission and the read paths over the ledger.
pub struct PaymentService<P> {
    payments: Arc<P>,
}

impl<P> PaymentService<P>
where
    P: PaymentRepository + 'static,
{
    pub fn new(payments: Arc<P>) -> Self {
        Self { payments }
    }

    /// Record a rent payment for the actor's billing period.
    ///
    /// The duplicate guard is read-then-write: an existing completed payment
    /// for (payer, month, year) short-circuits with `AlreadyPaid` and no new
    /// row. A concurrent double-submit can still slip through; that is an
    /// accepted weak-consistency point, not an exclusive invariant.
    pub fn submit(
        &self,
        actor: &Actor,
        request: PaymentRequest,
        now: DateTime<Utc>,
    ) -> Result<Payment, PaymentServiceError> {
        let account = policy::authorized_account(actor, Action::MakePayment, None)?;

        if !request.amount.is_finite() || request.amount < 0.0 {
            return Err(PaymentServiceError::InvalidAmount);
        }

        if let Some(existing) =
            self.payments
                .find_period(account.id, request.month, request.year)?
        {
            if existing.status == PaymentStatus::Completed {
                return Err(PaymentServiceError::AlreadyPaid);
            }
        }

        let payment = Payment {
            id: PaymentId(PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed)),
            payer_id: account.id,
            unit_id: account.unit_id,
            property_id: None,
            amount_cents: (request.amount * 100.0).round() as u64,
            month: request.month,
            year: request.year,
            status: PaymentStatus::Completed,
            method: request.payment_method.trim().to_string(),
            paid_at: now,
        };

        let stored = self.payments.insert(payment)?;
        info!(
            payer = %account.username,
            amount = %format!("{:.2}", stored.amount_cents as f64 / 100.0),
            period = %format!("{} {}", stored.month, stored.year),
            "payment recorded"
        );
        Ok(stored)
    }

    /// Payment history the actor may see: tenants their own rows, owners and
    /// admins everything, newest first.
    pub fn ledger(&self, actor: &Actor) -> Result<Vec<PaymentView>, PaymentServiceError> {
        policy::authorize(actor, Action::ViewPayments, None)?;
        let rows = self.payments.list_all()?;
        Ok(visibility::visible_payments(actor, &rows)
            .into_iter()
            .map(Payment::view)
            .collect())
    }

    /// Owner-only global payment report. Not org-scoped: every owner sees the
    /// system-wide ledger, matching the observed multi-tenant design gap.
    pub fn report(&self, actor: &Actor) -> Result<Vec<PaymentView>, PaymentServiceError> {
        policy::authorize(actor, Action::ViewReports, None)?;
        let rows = self.payments.list_all()?;
        Ok(visibility::visible_payments(actor, &rows)
            .into_iter()
            .map(Payment::view)
            .collect())
    }

    /// The global ledger as CSV, for the export link on the reports page.
    pub fn export_csv(&self, actor: &Actor) -> Result<String, PaymentServiceError> {
        policy::authorize(actor, Action::ExportReports, None)?;
        let rows = self.payments.list_all()?;
        let visible = visibility::visible_payments(actor, &rows);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "payment_id",
                "payer_id",
                "month",
                "year",
                "amount",
                "method",
                "status",
                "paid_at",
            ])
            .map_err(|err| PaymentServiceError::Export(err.to_string()))?;

        for payment in visible {
            writer
                .write_record([
                    payment.id.to_string(),
                    payment.payer_id.to_string(),
                    payment.month.to_string(),
                    payment.year.to_string(),
                    format!("{:.2}", payment.amount_cents as f64 / 100.0),
                    payment.method.clone(),
                    payment.status.label().to_string(),
                    payment.paid_at.to_rfc3339(),
                ])
                .map_err(|err| PaymentServiceError::Export(err.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| PaymentServiceError::Export(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| PaymentServiceError::Export(err.to_string()))
    }

    /// Selectable billing periods for the payment form: all twelve months and
    /// the year window around `now`.
    pub fn form_view(now: DateTime<Utc>) -> PaymentFormView {
        let current = now.year();
        PaymentFormView {
            months: Month::ALL.iter().map(|month| month.label()).collect(),
            years: (current - 1..=current + 1).collect(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct PaymentFormView {
    pub months: Vec<&'static str>,
    pub years: Vec<i32>,
}

/// Error raised by the payment service.
#[derive(Debug, thiserror::Error)]
pub enum PaymentServiceError {
    #[error("payment amount must be a non-negative number")]
    InvalidAmount,
    #[error("payment for this month has already been made")]
    AlreadyPaid,
    #[error("ledger export failed: {0}")]
    Export(String),
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<PaymentServiceError> for ApiError {
    fn from(value: PaymentServiceError) -> Self {
        match value {
            PaymentServiceError::InvalidAmount => ApiError::Validation(value.to_string()),
            PaymentServiceError::AlreadyPaid => ApiError::Duplicate(value.to_string()),
            PaymentServiceError::Export(detail) => ApiError::Internal(detail),
            PaymentServiceError::Denied(denied) => ApiError::Denied(denied),
            PaymentServiceError::Repository(err) => err.into(),
        }
    }
}
