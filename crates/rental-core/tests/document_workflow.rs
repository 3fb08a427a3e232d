//! Integration specifications for the document library: the extension
//! allow-list, audience-gated downloads, and the missing-file distinction.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;

use rental_core::auth::{actor_layer, ActorResolver};
use rental_core::documents::{
    document_router, DocumentRepository, DocumentService, DocumentServiceError, DocumentUpload,
};
use rental_core::domain::{AccountId, Actor, ActorAccount, Role, TargetAudience};
use rental_core::memory::{MemoryDocuments, MemoryFileStore, MemorySessions};
use rental_core::storage::FileStore;

fn actor(role: Role, id: u64) -> Actor {
    Actor::Account(ActorAccount {
        id: AccountId(id),
        username: format!("account-{id}"),
        role,
        tenant_org_id: None,
        unit_id: None,
    })
}

fn upload(filename: &str, audience: TargetAudience) -> DocumentUpload {
    DocumentUpload {
        title: "Move-in checklist".to_string(),
        filename: filename.to_string(),
        content_type: Some("application/pdf".to_string()),
        audience,
        bytes: b"%PDF-1.4 checklist".to_vec(),
    }
}

fn service() -> (
    DocumentService<MemoryDocuments, MemoryFileStore>,
    Arc<MemoryDocuments>,
    Arc<MemoryFileStore>,
) {
    let repository = Arc::new(MemoryDocuments::default());
    let files = Arc::new(MemoryFileStore::default());
    (
        DocumentService::new(repository.clone(), files.clone()),
        repository,
        files,
    )
}

#[test]
fn executable_uploads_are_rejected_with_no_row_and_no_file() {
    let (service, repository, files) = service();
    let owner = actor(Role::Owner, 1);

    let result = service.upload(&owner, upload("setup.exe", TargetAudience::Everyone), Utc::now());
    assert!(matches!(
        result,
        Err(DocumentServiceError::UnsupportedFileType)
    ));

    assert!(repository.list_all().expect("list runs").is_empty());
    assert!(files.is_empty());
}

#[test]
fn unsafe_filenames_are_sanitized_before_storage() {
    let (service, _, files) = service();
    let owner = actor(Role::Owner, 1);

    let document = service
        .upload(
            &owner,
            upload("../../etc/move in.pdf", TargetAudience::Everyone),
            Utc::now(),
        )
        .expect("upload succeeds");
    assert_eq!(document.filename, "move_in.pdf");
    assert!(files.exists(&document.path));
}

#[test]
fn tenants_are_denied_owner_only_documents() {
    let (service, _, _) = service();
    let owner = actor(Role::Owner, 1);
    let tenant = actor(Role::Tenant, 2);
    let admin = actor(Role::Admin, 3);

    let document = service
        .upload(&owner, upload("ledger.xlsx", TargetAudience::Owner), Utc::now())
        .expect("upload succeeds");

    assert!(matches!(
        service.download(&tenant, document.id),
        Err(DocumentServiceError::Denied(_))
    ));
    assert!(service.download(&owner, document.id).is_ok());
    assert!(service.download(&admin, document.id).is_ok());
}

#[test]
fn tenant_audience_documents_are_downloadable_by_tenants() {
    let (service, _, _) = service();
    let owner = actor(Role::Owner, 1);
    let tenant = actor(Role::Tenant, 2);

    for audience in [TargetAudience::Tenant, TargetAudience::Everyone] {
        let document = service
            .upload(&owner, upload("notice.pdf", audience), Utc::now())
            .expect("upload succeeds");
        let download = service
            .download(&tenant, document.id)
            .expect("tenant may read");
        assert_eq!(download.bytes, b"%PDF-1.4 checklist");
    }
}

#[test]
fn missing_backing_file_is_not_found_rather_than_forbidden() {
    let (service, _, files) = service();
    let owner = actor(Role::Owner, 1);

    let document = service
        .upload(&owner, upload("lease.pdf", TargetAudience::Everyone), Utc::now())
        .expect("upload succeeds");

    files.remove(&document.path);

    let result = service.download(&owner, document.id);
    assert!(matches!(
        result,
        Err(DocumentServiceError::Storage(
            rental_core::storage::StorageError::Missing(_)
        ))
    ));
}

#[test]
fn unknown_document_id_is_not_found() {
    let (service, _, _) = service();
    let owner = actor(Role::Owner, 1);

    let result = service.download(&owner, rental_core::domain::DocumentId(404));
    assert!(matches!(result, Err(DocumentServiceError::NotFound)));
}

#[test]
fn listing_applies_the_audience_filter() {
    let (service, _, _) = service();
    let owner = actor(Role::Owner, 1);
    let tenant = actor(Role::Tenant, 2);

    service
        .upload(&owner, upload("owners.pdf", TargetAudience::Owner), Utc::now())
        .expect("owner doc");
    service
        .upload(&owner, upload("everyone.pdf", TargetAudience::Everyone), Utc::now())
        .expect("shared doc");

    let tenant_rows = service.list(&tenant).expect("tenant lists");
    assert_eq!(tenant_rows.len(), 1);
    assert_eq!(tenant_rows[0].filename, "everyone.pdf");

    let owner_rows = service.list(&owner).expect("owner lists");
    assert_eq!(owner_rows.len(), 2);
}

mod http {
    use super::*;

    const BOUNDARY: &str = "X-DOCUMENT-TEST-BOUNDARY";

    fn build_app() -> axum::Router {
        let repository = Arc::new(MemoryDocuments::default());
        let files = Arc::new(MemoryFileStore::default());
        let service = Arc::new(DocumentService::new(repository, files));

        let sessions = MemorySessions::default();
        sessions.register(
            "owner-token",
            ActorAccount {
                id: AccountId(1),
                username: "landlord".to_string(),
                role: Role::Owner,
                tenant_org_id: None,
                unit_id: None,
            },
        );
        sessions.register(
            "renter-token",
            ActorAccount {
                id: AccountId(2),
                username: "casey".to_string(),
                role: Role::Tenant,
                tenant_org_id: None,
                unit_id: None,
            },
        );

        let resolver: Arc<dyn ActorResolver> = Arc::new(sessions);
        document_router(service).layer(actor_layer(resolver))
    }

    fn multipart_body(filename: &str, target_role: &str) -> Body {
        let payload = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             Building rules\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"target_role\"\r\n\r\n\
             {target_role}\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4 rules\r\n\
             --{BOUNDARY}--\r\n"
        );
        Body::from(payload)
    }

    fn upload_request(filename: &str, target_role: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/documents/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("authorization", format!("Bearer {token}"))
            .body(multipart_body(filename, target_role))
            .expect("request")
    }

    #[tokio::test]
    async fn upload_then_download_round_trips_over_http() {
        let app = build_app();

        let response = app
            .clone()
            .oneshot(upload_request("rules.pdf", "all", "owner-token"))
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let id = payload["document"]["id"].as_u64().expect("document id");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/documents/{id}/download"))
                    .header("authorization", "Bearer renter-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("application/pdf")
        );

        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        assert_eq!(&bytes[..], b"%PDF-1.4 rules");
    }

    #[tokio::test]
    async fn executable_upload_is_a_validation_failure_over_http() {
        let app = build_app();

        let response = app
            .clone()
            .oneshot(upload_request("setup.exe", "all", "owner-token"))
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn owner_only_document_is_forbidden_for_renters_over_http() {
        let app = build_app();

        let response = app
            .clone()
            .oneshot(upload_request("ledger.pdf", "owner", "owner-token"))
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let id = payload["document"]["id"].as_u64().expect("document id");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/documents/{id}/download"))
                    .header("authorization", "Bearer renter-token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dispatch");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
