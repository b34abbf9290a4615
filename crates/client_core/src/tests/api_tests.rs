use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use shared::{
    domain::ContactField,
    error::{ErrorCode, FieldErrors},
    protocol::DeleteContactResponse,
    validation::validate_draft,
};
use tokio::{net::TcpListener, sync::Mutex};

type Contacts = Arc<Mutex<Vec<Contact>>>;

async fn list(State(contacts): State<Contacts>) -> Json<Vec<Contact>> {
    Json(contacts.lock().await.clone())
}

async fn create(
    State(contacts): State<Contacts>,
    Json(draft): Json<ContactDraft>,
) -> Result<(StatusCode, Json<CreateContactResponse>), (StatusCode, Json<ApiError>)> {
    validate_draft(&draft)
        .map_err(|fields| (StatusCode::BAD_REQUEST, Json(ApiError::invalid_payload(fields))))?;
    let contact = Contact {
        id: ContactId::generate(),
        name: draft.name,
        email: draft.email,
        phone: draft.phone,
        message: draft.message,
        created_at: Utc::now(),
    };
    contacts.lock().await.insert(0, contact.clone());
    Ok((StatusCode::CREATED, Json(CreateContactResponse { contact })))
}

async fn remove(
    State(contacts): State<Contacts>,
    Path(id): Path<String>,
) -> Json<DeleteContactResponse> {
    let id = ContactId(id);
    let mut contacts = contacts.lock().await;
    let before = contacts.len();
    contacts.retain(|c| c.id != id);
    let removed = contacts.len() != before;
    Json(DeleteContactResponse { id, removed })
}

async fn spawn_contacts_server() -> String {
    let contacts: Contacts = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/api/contacts", get(list).post(create))
        .route("/api/contacts/:id", delete(remove))
        .with_state(contacts);
    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn ada() -> ContactDraft {
    ContactDraft {
        name: "Ada".into(),
        email: "ada@x.com".into(),
        phone: "1234567890".into(),
        message: String::new(),
    }
}

#[test]
fn rejects_unparseable_server_url() {
    assert!(matches!(
        HttpContactApi::new("not a url"),
        Err(ClientError::InvalidUrl(_))
    ));
}

#[test]
fn rejects_server_url_without_path() {
    assert!(matches!(
        HttpContactApi::new("mailto:ada@x.com"),
        Err(ClientError::CannotBeABase(_))
    ));
}

#[test]
fn contact_url_escapes_identifier() {
    let api = HttpContactApi::new("http://localhost:5000").expect("api");
    let url = api.contact_url(&ContactId::from("a b/c")).expect("url");
    assert_eq!(url.as_str(), "http://localhost:5000/api/contacts/a%20b%2Fc");
}

#[tokio::test]
async fn create_list_delete_round_trip() {
    let server_url = spawn_contacts_server().await;
    let api = HttpContactApi::new(&server_url).expect("api");

    let created = api.create_contact(&ada()).await.expect("create");
    assert_eq!(created.name, "Ada");

    let listed = api.list_contacts().await.expect("list");
    assert_eq!(listed, vec![created.clone()]);

    api.delete_contact(&created.id).await.expect("delete");
    api.delete_contact(&created.id).await.expect("delete missing");
    assert!(api.list_contacts().await.expect("list").is_empty());
}

#[tokio::test]
async fn validation_rejection_carries_field_errors() {
    let server_url = spawn_contacts_server().await;
    let api = HttpContactApi::new(&server_url).expect("api");

    let err = api
        .create_contact(&ContactDraft::default())
        .await
        .expect_err("should be rejected");
    match &err {
        ClientError::Rejected { status, error } => {
            assert_eq!(*status, 400);
            assert_eq!(error.code, ErrorCode::InvalidPayload);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let fields: &FieldErrors = err.field_errors().expect("fields");
    assert!(fields.contains_key(&ContactField::Name));
}

#[tokio::test]
async fn non_envelope_failure_is_unexpected_status() {
    let app = Router::new().route(
        "/api/contacts",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let server_url = serve(app).await;
    let api = HttpContactApi::new(&server_url).expect("api");

    let err = api.list_contacts().await.expect_err("should fail");
    assert!(matches!(err, ClientError::UnexpectedStatus(502)));
}

#[tokio::test]
async fn delete_accepts_any_success_body() {
    let app = Router::new().route(
        "/api/contacts/:id",
        delete(|| async { (StatusCode::OK, "deleted") }),
    );
    let server_url = serve(app).await;
    let api = HttpContactApi::new(&server_url).expect("api");

    api.delete_contact(&ContactId::from("a"))
        .await
        .expect("2xx confirms the delete");
}

#[tokio::test]
async fn delete_failure_still_reads_error_envelope() {
    let app = Router::new().route(
        "/api/contacts/:id",
        delete(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::storage_unavailable()),
            )
        }),
    );
    let server_url = serve(app).await;
    let api = HttpContactApi::new(&server_url).expect("api");

    let err = api
        .delete_contact(&ContactId::from("a"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, ClientError::Rejected { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpContactApi::new(&format!("http://{addr}")).expect("api");
    let err = api.list_contacts().await.expect_err("should fail");
    assert!(matches!(err, ClientError::Transport(_)));
}
