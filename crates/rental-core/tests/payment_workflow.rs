//! Integration specifications for rent payments: the one-completed-payment
//! invariant per billing period, amount validation, visibility of the ledger,
//! and the HTTP surface.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use rental_core::auth::{actor_layer, ActorResolver};
use rental_core::domain::{AccountId, Actor, ActorAccount, Month, Role};
use rental_core::memory::{MemoryPayments, MemorySessions};
use rental_core::payments::{
    payment_router, PaymentRepository, PaymentRequest, PaymentService, PaymentServiceError,
    PaymentStatus,
};

fn actor(role: Role, id: u64) -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(id),
        username: format!("account-{id}"),
        role,
        tenant_org_id: None,
        unit_id: None,
    })
}

fn request(amount: f64, month: Month, year: i32) -> PaymentRequest {
    PaymentRequest {
        amount,
        month,
        year,
        payment_method: "bank transfer".to_string(),
    }
}

fn service() -> (PaymentService<MemoryPayments>, Arc<MemoryPayments>) {
    let repository = Arc::new(MemoryPayments::default());
    (PaymentService::new(repository.clone()), repository)
}

#[test]
fn second_payment_for_the_same_period_reports_already_paid() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let now = Utc::now();

    service
        .submit(&tenant, request(950.0, Month::March, 2026), now)
        .expect("first payment succeeds");

    let result = service.submit(&tenant, request(950.0, Month::March, 2026), now);
    assert!(matches!(result, Err(PaymentServiceError::AlreadyPaid)));

    let rows = repository.list_all().expect("list runs");
    assert_eq!(rows.len(), 1, "exactly one completed row for the period");
    assert_eq!(rows[0].status, PaymentStatus::Completed);
}

#[test]
fn different_periods_are_independent() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let now = Utc::now();

    service
        .submit(&tenant, request(950.0, Month::March, 2026), now)
        .expect("march");
    service
        .submit(&tenant, request(950.0, Month::April, 2026), now)
        .expect("april");
    service
        .submit(&tenant, request(950.0, Month::March, 2027), now)
        .expect("next year");

    assert_eq!(repository.list_all().expect("list runs").len(), 3);
}

#[test]
fn negative_and_non_finite_amounts_are_rejected() {
    let (service, repository) = service();
    let tenant = actor(Role::Tenant, 1);
    let now = Utc::now();

    for amount in [-1.0, f64::NAN, f64::INFINITY] {
        let result = service.submit(&tenant, request(amount, Month::May, 2026), now);
        assert!(matches!(result, Err(PaymentServiceError::InvalidAmount)));
    }

    assert!(repository.list_all().expect("list runs").is_empty());
}

#[test]
fn owners_cannot_pay_rent() {
    let (service, _) = service();
    let owner = actor(Role::Owner, 2);

    let result = service.submit(&owner, request(950.0, Month::May, 2026), Utc::now());
    assert!(matches!(result, Err(PaymentServiceError::Denied(_))));
}

#[test]
fn tenants_see_only_their_own_payments_and_owners_see_all() {
    let (service, _) = service();
    let alice = actor(Role::Tenant, 1);
    let bob = actor(Role::Tenant, 2);
    let owner = actor(Role::Owner, 3);
    let now = Utc::now();

    service
        .submit(&alice, request(900.0, Month::March, 2026), now)
        .expect("alice pays");
    service
        .submit(&bob, request(1100.0, Month::March, 2026), now)
        .expect("bob pays");

    let alice_rows = service.ledger(&alice).expect("ledger");
    assert_eq!(alice_rows.len(), 1);
    assert_eq!(alice_rows[0].payer_id, AccountId(1));

    let owner_rows = service.ledger(&owner).expect("ledger");
    assert_eq!(owner_rows.len(), 2);
}

#[test]
fn reports_are_owner_only_and_global() {
    let (service, _) = service();
    let alice = actor(Role::Tenant, 1);
    let owner = actor(Role::Owner, 3);
    let now = Utc::now();

    service
        .submit(&alice, request(900.0, Month::March, 2026), now)
        .expect("alice pays");

    assert!(matches!(
        service.report(&alice),
        Err(PaymentServiceError::Denied(_))
    ));

    let report = service.report(&owner).expect("owner report");
    assert_eq!(report.len(), 1);
}

#[test]
fn csv_export_carries_every_visible_row() {
    let (service, _) = service();
    let alice = actor(Role::Tenant, 1);
    let owner = actor(Role::Owner, 3);
    let now = Utc::now();

    service
        .submit(&alice, request(900.5, Month::March, 2026), now)
        .expect("alice pays");

    let csv = service.export_csv(&owner).expect("export succeeds");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("payment_id,payer_id,month,year,amount,method,status,paid_at")
    );
    let row = lines.next().expect("one data row");
    assert!(row.contains("March"));
    assert!(row.contains("900.50"));
    assert!(row.contains("completed"));

    assert!(matches!(
        service.export_csv(&alice),
        Err(PaymentServiceError::Denied(_))
    ));
}

mod http {
    use super::*;

    fn build_app() -> (axum::Router, Arc<MemoryPayments>) {
        let repository = Arc::new(MemoryPayments::default());
        let service = Arc::new(PaymentService::new(repository.clone()));

        let sessions = MemorySessions::default();
        sessions.register(
            "renter-token",
            ActorAccount {
                id: AccountId(1),
                username: "casey".to_string(),
                role: Role::Tenant,
                tenant_org_id: None,
                unit_id: None,
            },
        );

        let resolver: Arc<dyn ActorResolver> = Arc::new(sessions);
        let app = payment_router(service).layer(actor_layer(resolver));
        (app, repository)
    }

    fn payment_request_body() -> Body {
        Body::from(
            serde_json::to_vec(&json!({
                "amount": 950.0,
                "month": "March",
                "year": 2026,
                "payment_method": "bank transfer",
            }))
            .expect("serialize"),
        )
    }

    #[tokio::test]
    async fn post_payment_then_duplicate_yields_conflict_warning() {
        let (app, repository) = build_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payment")
                    .header("content-type", "application/json")
                    .header("authorization", "Bearer renter-token")
                    .body(payment_request_body())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payment")
                    .header("content-type", "application/json")
                    .header("authorization", "Bearer renter-token")
                    .body(payment_request_body())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload.get("warning").is_some());

        assert_eq!(repository.list_all().expect("list runs").len(), 1);
    }

    #[tokio::test]
    async fn payment_form_lists_months_and_the_year_window() {
        let (app, _) = build_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/payment")
                    .header("authorization", "Bearer renter-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        let months = payload["form"]["months"].as_array().expect("months");
        assert_eq!(months.len(), 12);
        let years = payload["form"]["years"].as_array().expect("years");
        assert_eq!(years.len(), 3);
    }

    #[tokio::test]
    async fn anonymous_payment_is_denied() {
        let (app, repository) = build_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payment")
                    .header("content-type", "application/json")
                    .body(payment_request_body())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(repository.list_all().expect("list runs").is_empty());
    }
}
