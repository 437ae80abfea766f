//! Notes REST API — CRUD over the plain-text notes in the cache directory.
//!
//! `GET/PUT/DELETE /notes/{name}`, `GET /notes`, and `POST /write`.
//! Errors are answered with a status code and a short plain-text message.

use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, mime, web};
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::notes::{self, NoteError, NoteStore};

/// Largest JSON / form-urlencoded body accepted
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB
/// Largest single multipart field accepted
pub const MAX_FIELD_SIZE: usize = 1024 * 1024; // 1MB

const NOT_FOUND: &str = "Not found";
const ALREADY_EXISTS: &str = "Note already exists";
const INVALID_BODY: &str = "Invalid request body";

fn plain_text(mut builder: actix_web::HttpResponseBuilder, message: impl Into<String>) -> HttpResponse {
    builder
        .content_type(ContentType::plaintext())
        .body(message.into())
}

fn error_response(err: NoteError) -> HttpResponse {
    match err {
        NoteError::NotFound(_) => plain_text(HttpResponse::NotFound(), NOT_FOUND),
        NoteError::AlreadyExists(_) => plain_text(HttpResponse::BadRequest(), ALREADY_EXISTS),
        NoteError::InvalidInput(msg) => plain_text(HttpResponse::BadRequest(), msg),
        e @ NoteError::InvalidName(_) => plain_text(HttpResponse::BadRequest(), e.to_string()),
        NoteError::Io(e) => {
            log::error!("[NOTES] Filesystem error: {}", e);
            plain_text(HttpResponse::InternalServerError(), "Internal server error")
        }
    }
}

/// Run a store operation on the blocking thread pool so its filesystem
/// check-then-act sequence does not stall the worker.
async fn with_store<F, R>(data: &web::Data<AppState>, op: F) -> Result<R, HttpResponse>
where
    F: FnOnce(&NoteStore) -> notes::Result<R> + Send + 'static,
    R: Send + 'static,
{
    let store = Arc::clone(&data.notes);
    match web::block(move || op(&store)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(e)),
        Err(e) => {
            log::error!("[NOTES] Blocking task failed: {}", e);
            Err(plain_text(HttpResponse::InternalServerError(), "Internal server error"))
        }
    }
}

// --- Body decoding ---

enum BodyKind {
    Json,
    Form,
    Multipart,
    Other,
}

fn body_kind(req: &HttpRequest) -> BodyKind {
    let Ok(Some(mime_type)) = req.mime_type() else {
        return BodyKind::Other;
    };
    match (mime_type.type_(), mime_type.subtype()) {
        (mime::APPLICATION, mime::JSON) => BodyKind::Json,
        (mime::APPLICATION, mime::WWW_FORM_URLENCODED) => BodyKind::Form,
        (mime::MULTIPART, mime::FORM_DATA) => BodyKind::Multipart,
        _ => BodyKind::Other,
    }
}

/// Buffer the request body, refusing anything above `MAX_BODY_SIZE`
async fn read_body(mut payload: web::Payload) -> Result<Vec<u8>, HttpResponse> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(data) => {
                body.extend_from_slice(&data);
                if body.len() > MAX_BODY_SIZE {
                    return Err(plain_text(
                        HttpResponse::PayloadTooLarge(),
                        "Request body exceeds 2MB limit",
                    ));
                }
            }
            Err(e) => {
                return Err(plain_text(
                    HttpResponse::BadRequest(),
                    format!("Failed to read request body: {}", e),
                ));
            }
        }
    }
    Ok(body)
}

/// Decode a JSON or form-urlencoded body. An empty body or any other content
/// type decodes to `T::default()`.
async fn decode_body<T>(req: &HttpRequest, payload: web::Payload) -> Result<T, HttpResponse>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let kind = body_kind(req);
    let body = read_body(payload).await?;
    if body.is_empty() {
        return Ok(T::default());
    }

    let decoded = match kind {
        BodyKind::Json => serde_json::from_slice(&body).map_err(|e| e.to_string()),
        BodyKind::Form => serde_urlencoded::from_bytes(&body).map_err(|e| e.to_string()),
        BodyKind::Multipart | BodyKind::Other => return Ok(T::default()),
    };

    decoded.map_err(|e| {
        log::debug!("[NOTES] Rejected request body: {}", e);
        plain_text(HttpResponse::BadRequest(), INVALID_BODY)
    })
}

// --- Read note ---

async fn get_note(data: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    let name = name.into_inner();
    match with_store(&data, move |store| store.get(&name)).await {
        Ok(text) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(text),
        Err(resp) => resp,
    }
}

// --- Update note ---

#[derive(Debug, Default, Deserialize)]
struct UpdateNoteBody {
    #[serde(default)]
    text: Option<String>,
}

async fn update_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    name: web::Path<String>,
    payload: web::Payload,
) -> HttpResponse {
    let body: UpdateNoteBody = match decode_body(&req, payload).await {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let name = name.into_inner();
    let text = body.text.unwrap_or_default();
    match with_store(&data, move |store| store.put(&name, &text)).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(resp) => resp,
    }
}

// --- Delete note ---

async fn delete_note(data: web::Data<AppState>, name: web::Path<String>) -> HttpResponse {
    let name = name.into_inner();
    match with_store(&data, move |store| store.delete(&name)).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(resp) => resp,
    }
}

// --- List notes ---

async fn list_notes(data: web::Data<AppState>) -> HttpResponse {
    match with_store(&data, |store| store.list()).await {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(resp) => resp,
    }
}

// --- Write (create) note ---

#[derive(Debug, Default, Deserialize)]
struct WriteNoteForm {
    #[serde(default)]
    note_name: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

/// Collect the `note_name` and `note` fields from a multipart upload.
/// Other fields are drained and ignored.
async fn read_multipart_form(mut payload: Multipart) -> Result<WriteNoteForm, HttpResponse> {
    let mut form = WriteNoteForm::default();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                return Err(plain_text(
                    HttpResponse::BadRequest(),
                    format!("Failed to process multipart: {}", e),
                ));
            }
        };
        let field_name = field.name().to_string();

        let mut value: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(data) => {
                    value.extend_from_slice(&data);
                    if value.len() > MAX_FIELD_SIZE {
                        return Err(plain_text(
                            HttpResponse::PayloadTooLarge(),
                            format!("Field '{}' exceeds 1MB limit", field_name),
                        ));
                    }
                }
                Err(e) => {
                    return Err(plain_text(
                        HttpResponse::BadRequest(),
                        format!("Failed to read field '{}': {}", field_name, e),
                    ));
                }
            }
        }

        let value = String::from_utf8_lossy(&value).to_string();
        match field_name.as_str() {
            "note_name" => form.note_name = Some(value),
            "note" => form.note = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

async fn write_note(
    data: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> HttpResponse {
    let form = match body_kind(&req) {
        BodyKind::Multipart => read_multipart_form(Multipart::new(req.headers(), payload)).await,
        _ => decode_body::<WriteNoteForm>(&req, payload).await,
    };
    let form = match form {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    let name = form.note_name.unwrap_or_default();
    let text = form.note.unwrap_or_default();

    match with_store(&data, move |store| store.create(&name, &text)).await {
        Ok(()) => HttpResponse::Created().finish(),
        Err(resp) => resp,
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/notes").route(web::get().to(list_notes)))
        .service(
            web::resource("/notes/{name}")
                .route(web::get().to(get_note))
                .route(web::put().to(update_note))
                .route(web::delete().to(delete_note)),
        )
        .service(web::resource("/write").route(web::post().to(write_note)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::{Note, NoteStore};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn test_state(cache_dir: &Path) -> web::Data<AppState> {
        web::Data::new(AppState {
            notes: Arc::new(NoteStore::open(cache_dir).expect("Failed to open store")),
            started_at: std::time::Instant::now(),
        })
    }

    const BOUNDARY: &str = "----notesboundary";

    fn multipart_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    #[actix_web::test]
    async fn test_end_to_end_lifecycle() {
        let dir = tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(dir.path())).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/write")
            .set_form([("note_name", "foo"), ("note", "bar")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/notes/foo").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&test::read_body(resp).await[..], b"bar");

        let req = test::TestRequest::put()
            .uri("/notes/foo")
            .set_form([("text", "baz")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(test::read_body(resp).await.is_empty());

        let req = test::TestRequest::get().uri("/notes/foo").to_request();
        assert_eq!(&test::call_and_read_body(&app, req).await[..], b"baz");

        let req = test::TestRequest::delete().uri("/notes/foo").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/notes/foo").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(&test::read_body(resp).await[..], b"Not found");
    }

    #[actix_web::test]
    async fn test_missing_note_returns_404() {
        let dir = tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(dir.path())).configure(config)).await;

        for req in [
            test::TestRequest::get().uri("/notes/ghost").to_request(),
            test::TestRequest::delete().uri("/notes/ghost").to_request(),
            test::TestRequest::put()
                .uri("/notes/ghost")
                .set_json(serde_json::json!({ "text": "boo" }))
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
        assert!(!dir.path().join("ghost.txt").exists());
    }

    #[actix_web::test]
    async fn test_put_json_and_empty_body() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.notes.create("draft", "original").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::put()
            .uri("/notes/draft")
            .set_json(serde_json::json!({ "text": "from json" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(state.notes.get("draft").unwrap(), "from json");

        // No body at all clears the note
        let req = test::TestRequest::put().uri("/notes/draft").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(state.notes.get("draft").unwrap(), "");
    }

    #[actix_web::test]
    async fn test_put_malformed_json_rejected() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.notes.create("keep", "safe").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::put()
            .uri("/notes/keep")
            .insert_header(ContentType::json())
            .set_payload("{not json")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.notes.get("keep").unwrap(), "safe");
    }

    #[actix_web::test]
    async fn test_list_notes() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::get().uri("/notes").to_request();
        let notes: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        assert!(notes.is_empty());

        state.notes.create("x", "1").unwrap();
        state.notes.create("y", "2").unwrap();

        let req = test::TestRequest::get().uri("/notes").to_request();
        let mut notes: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        notes.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(notes.len(), 2);
        assert_eq!((notes[0].name.as_str(), notes[0].text.as_str()), ("x", "1"));
        assert_eq!((notes[1].name.as_str(), notes[1].text.as_str()), ("y", "2"));
    }

    #[actix_web::test]
    async fn test_write_multipart() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/write")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(&[
                ("note_name", "shopping"),
                ("ignored", "whatever"),
                ("note", "apples"),
            ]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        assert_eq!(state.notes.get("shopping").unwrap(), "apples");
    }

    #[actix_web::test]
    async fn test_write_json() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/write")
            .set_json(serde_json::json!({ "note_name": "todo", "note": "ship it" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        assert_eq!(state.notes.get("todo").unwrap(), "ship it");
    }

    #[actix_web::test]
    async fn test_write_missing_fields() {
        let dir = tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(dir.path())).configure(config)).await;

        for form in [
            vec![("note_name", "only-name")],
            vec![("note", "only-text")],
            vec![("note_name", "empty"), ("note", "")],
        ] {
            let req = test::TestRequest::post().uri("/write").set_form(form).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                &test::read_body(resp).await[..],
                b"Missing required fields: note_name or note"
            );
        }

        let req = test::TestRequest::post()
            .uri("/write")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(&[("note_name", "no-text")]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_write_existing_note() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.notes.create("dup", "first").unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/write")
            .set_form([("note_name", "dup"), ("note", "second")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(&test::read_body(resp).await[..], b"Note already exists");
        assert_eq!(state.notes.get("dup").unwrap(), "first");
    }

    #[actix_web::test]
    async fn test_write_invalid_name() {
        let dir = tempdir().unwrap();
        let app =
            test::init_service(App::new().app_data(test_state(dir.path())).configure(config)).await;

        let req = test::TestRequest::post()
            .uri("/write")
            .set_form([("note_name", "../escape"), ("note", "x")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }
}
