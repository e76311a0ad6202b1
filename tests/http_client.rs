//! Exercises `HttpContentApi` against an in-process axum backend.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post},
};
use content_desk::{
    errors::ClientError,
    models::{
        content::{ContentChanges, UploadFile},
        filters::Filters,
        metadata::{Metadata, MetadataMap},
    },
    services::{
        api_client::{ContentApi, HttpContentApi},
        form::encode_content,
        mapper::map_content_records,
    },
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

#[derive(Clone, Debug, PartialEq)]
enum Seen {
    Query(HashMap<String, String>),
    Field {
        name: String,
        file_name: Option<String>,
        data: Vec<u8>,
    },
    Patch {
        id: u64,
        content_type: String,
        body: Vec<u8>,
    },
    Delete(u64),
    Auth(Option<String>),
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn list_content(
    State(log): State<Log>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    log.lock().unwrap().push(Seen::Query(query));
    Json(json!({
        "success": true,
        "error": null,
        "data": [{
            "id": 3,
            "title": "Rain",
            "active": true,
            "content_file": "/media/rain.pdf",
            "created_by": "curator",
            "created_on": "2021-06-01",
            "status": "Active",
            "metadata_info": [
                { "id": 8, "name": "Weather", "type": 1, "type_name": "Subject" },
                { "id": 9, "name": "English", "type": 2, "type_name": "Language" },
                { "id": 7, "name": "Climate", "type": 1, "type_name": "Subject" }
            ]
        }]
    }))
}

async fn create_content(State(log): State<Log>, mut multipart: Multipart) -> StatusCode {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        log.lock().unwrap().push(Seen::Field {
            name,
            file_name,
            data,
        });
    }
    StatusCode::CREATED
}

async fn update_content(
    State(log): State<Log>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    log.lock().unwrap().push(Seen::Patch {
        id,
        content_type,
        body: body.to_vec(),
    });
    StatusCode::OK
}

async fn delete_content(State(log): State<Log>, Path(id): Path<u64>) -> impl IntoResponse {
    log.lock().unwrap().push(Seen::Delete(id));
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "data": null, "error": "No such content", "success": false })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn current_user(State(log): State<Log>, headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    log.lock().unwrap().push(Seen::Auth(auth));
    Json(json!({
        "data": {
            "username": "ana",
            "email": "ana@example.org",
            "groups": ["Admin"],
            "permissions": { "content": { "read": true } }
        }
    }))
}

async fn metadata_types() -> Json<Value> {
    Json(json!({ "data": [{ "id": 1, "name": "Subject" }] }))
}

async fn broken() -> &'static str {
    "not json"
}

async fn serve() -> (String, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/api/content/", get(list_content).post(create_content))
        .route(
            "/api/content/{id}/",
            patch(update_content).delete(delete_content),
        )
        .route("/api/user/", get(current_user))
        .route("/api/metadata_types/", get(metadata_types))
        .route("/broken/api/metadata_types/", get(broken))
        .route("/api/logout/", post(|| async { StatusCode::OK }))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), log)
}

fn client(base: &str, token: Option<&str>) -> HttpContentApi {
    HttpContentApi::new(base, token.map(str::to_string), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_sends_filters_and_unwraps_envelope() {
    let (base, log) = serve().await;
    let api = client(&base, None);

    let filters = Filters {
        status: Some("Active".into()),
        active: Some(true),
        metadata: vec![7, 9],
        ..Filters::default()
    };
    let records = api.list_content(&filters).await.unwrap();

    let expected: HashMap<String, String> = [
        ("status", "Active"),
        ("active", "true"),
        ("metadata", "7,9"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(log.lock().unwrap().as_slice(), &[Seen::Query(expected)]);

    let content = map_content_records(records);
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].file_url.as_deref(), Some("/media/rain.pdf"));
    let ids: Vec<_> = content[0].metadata[&1].iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![8, 7]);
    assert_eq!(content[0].metadata[&2][0].name, "English");
}

#[tokio::test]
async fn create_sends_multipart_fields_and_file() {
    let (base, log) = serve().await;
    let api = client(&base, None);

    let form = encode_content(&ContentChanges {
        title: Some("Rain".into()),
        metadata: MetadataMap::from([(1, vec![Metadata::reference(8, 1)])]),
        upload: Some(UploadFile {
            file_name: "rain.pdf".into(),
            bytes: "%PDF-1.4".into(),
        }),
        ..Default::default()
    });
    api.create_content(form).await.unwrap();

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Seen::Field {
                name: "title".into(),
                file_name: None,
                data: b"Rain".to_vec(),
            },
            Seen::Field {
                name: "metadata".into(),
                file_name: None,
                data: b"8".to_vec(),
            },
            Seen::Field {
                name: "content_file".into(),
                file_name: Some("rain.pdf".into()),
                data: b"%PDF-1.4".to_vec(),
            },
        ]
    );
}

#[tokio::test]
async fn clearing_write_is_json() {
    let (base, log) = serve().await;
    let api = client(&base, None);

    api.update_content_json(12, json!({ "metadata": [] }))
        .await
        .unwrap();

    match log.lock().unwrap().as_slice() {
        [Seen::Patch {
            id,
            content_type,
            body,
        }] => {
            assert_eq!(*id, 12);
            assert!(content_type.starts_with("application/json"));
            assert_eq!(
                serde_json::from_slice::<Value>(body).unwrap(),
                json!({ "metadata": [] })
            );
        }
        other => panic!("unexpected requests {other:?}"),
    }
}

#[tokio::test]
async fn multipart_update_targets_item_url() {
    let (base, log) = serve().await;
    let api = client(&base, None);

    let form = encode_content(&ContentChanges {
        status: Some("Review".into()),
        ..Default::default()
    });
    api.update_content(5, form).await.unwrap();

    match log.lock().unwrap().as_slice() {
        [Seen::Patch {
            id, content_type, ..
        }] => {
            assert_eq!(*id, 5);
            assert!(content_type.starts_with("multipart/form-data"));
        }
        other => panic!("unexpected requests {other:?}"),
    }
}

#[tokio::test]
async fn delete_failure_carries_envelope_message() {
    let (base, log) = serve().await;
    let api = client(&base, None);

    api.delete_content(1).await.unwrap();
    let err = api.delete_content(404).await.unwrap_err();

    match err {
        ClientError::Status {
            status, message, ..
        } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "No such content");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert_eq!(
        log.lock().unwrap().as_slice(),
        &[Seen::Delete(1), Seen::Delete(404)]
    );
}

#[tokio::test]
async fn token_is_sent_as_authorization_header() {
    let (base, log) = serve().await;
    let api = client(&base, Some("abc123"));

    let user = api.current_user().await.unwrap();

    assert!(user.is_admin());
    assert_eq!(
        log.lock().unwrap().as_slice(),
        &[Seen::Auth(Some("Token abc123".into()))]
    );
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let (base, _log) = serve().await;

    let types = client(&base, None).list_metadata_types().await.unwrap();
    assert_eq!(types.len(), 1);

    let err = client(&format!("{}/broken", base), None)
        .list_metadata_types()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr), None)
        .logout()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
}
