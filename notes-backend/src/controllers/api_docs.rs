//! Machine-readable API description served at `/api-docs/openapi.json`.
//!
//! Generated from the static route table below; it never touches the store.

use actix_web::{HttpResponse, Responder, web};
use serde_json::{Map, Value, json};

use super::health::VERSION;

/// Request body accepted by a route
#[derive(Clone, Copy)]
enum RequestBody {
    None,
    /// Optional `text` field (JSON or form-urlencoded)
    UpdateText,
    /// Required `note_name` and `note` fields (multipart, form-urlencoded or JSON)
    WriteForm,
}

/// Success payload of a route
#[derive(Clone, Copy)]
enum ResponseBody {
    Empty,
    PlainText,
    NoteList,
    Html,
    Json,
}

struct RouteDoc {
    method: &'static str,
    path: &'static str,
    summary: &'static str,
    has_name_param: bool,
    request: RequestBody,
    success: (u16, ResponseBody),
    failures: &'static [(u16, &'static str)],
}

const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "get",
        path: "/notes",
        summary: "List every note with its text",
        has_name_param: false,
        request: RequestBody::None,
        success: (200, ResponseBody::NoteList),
        failures: &[],
    },
    RouteDoc {
        method: "get",
        path: "/notes/{name}",
        summary: "Read the text of a note",
        has_name_param: true,
        request: RequestBody::None,
        success: (200, ResponseBody::PlainText),
        failures: &[(400, "Invalid note name"), (404, "Note not found")],
    },
    RouteDoc {
        method: "put",
        path: "/notes/{name}",
        summary: "Replace the text of an existing note",
        has_name_param: true,
        request: RequestBody::UpdateText,
        success: (200, ResponseBody::Empty),
        failures: &[(400, "Invalid note name or body"), (404, "Note not found")],
    },
    RouteDoc {
        method: "delete",
        path: "/notes/{name}",
        summary: "Delete a note",
        has_name_param: true,
        request: RequestBody::None,
        success: (200, ResponseBody::Empty),
        failures: &[(400, "Invalid note name"), (404, "Note not found")],
    },
    RouteDoc {
        method: "post",
        path: "/write",
        summary: "Create a new note",
        has_name_param: false,
        request: RequestBody::WriteForm,
        success: (201, ResponseBody::Empty),
        failures: &[(400, "Missing fields, invalid name, or note already exists")],
    },
    RouteDoc {
        method: "get",
        path: "/UploadForm.html",
        summary: "HTML form for uploading a note",
        has_name_param: false,
        request: RequestBody::None,
        success: (200, ResponseBody::Html),
        failures: &[],
    },
    RouteDoc {
        method: "get",
        path: "/api/health",
        summary: "Service health",
        has_name_param: false,
        request: RequestBody::None,
        success: (200, ResponseBody::Json),
        failures: &[],
    },
    RouteDoc {
        method: "get",
        path: "/api/version",
        summary: "Service version",
        has_name_param: false,
        request: RequestBody::None,
        success: (200, ResponseBody::Json),
        failures: &[],
    },
];

fn plain_text_content() -> Value {
    json!({ "text/plain": { "schema": { "type": "string" } } })
}

fn response_doc(body: ResponseBody) -> Value {
    match body {
        ResponseBody::Empty => json!({ "description": "Success" }),
        ResponseBody::PlainText => json!({
            "description": "Note text",
            "content": plain_text_content(),
        }),
        ResponseBody::NoteList => json!({
            "description": "All notes",
            "content": {
                "application/json": {
                    "schema": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Note" }
                    }
                }
            }
        }),
        ResponseBody::Html => json!({
            "description": "HTML page",
            "content": { "text/html": { "schema": { "type": "string" } } }
        }),
        ResponseBody::Json => json!({
            "description": "Success",
            "content": { "application/json": { "schema": { "type": "object" } } }
        }),
    }
}

fn request_doc(body: RequestBody) -> Option<Value> {
    match body {
        RequestBody::None => None,
        RequestBody::UpdateText => {
            let schema = json!({ "$ref": "#/components/schemas/UpdateNote" });
            Some(json!({
                "required": false,
                "content": {
                    "application/json": { "schema": schema },
                    "application/x-www-form-urlencoded": { "schema": schema },
                }
            }))
        }
        RequestBody::WriteForm => {
            let schema = json!({ "$ref": "#/components/schemas/WriteNote" });
            Some(json!({
                "required": true,
                "content": {
                    "multipart/form-data": { "schema": schema },
                    "application/x-www-form-urlencoded": { "schema": schema },
                    "application/json": { "schema": schema },
                }
            }))
        }
    }
}

fn operation_doc(route: &RouteDoc) -> Value {
    let mut responses = Map::new();
    let (status, body) = route.success;
    responses.insert(status.to_string(), response_doc(body));
    for (status, description) in route.failures {
        responses.insert(
            status.to_string(),
            json!({ "description": description, "content": plain_text_content() }),
        );
    }

    let mut op = Map::new();
    op.insert("summary".to_string(), json!(route.summary));
    if route.has_name_param {
        op.insert(
            "parameters".to_string(),
            json!([{
                "name": "name",
                "in": "path",
                "required": true,
                "schema": { "type": "string" }
            }]),
        );
    }
    if let Some(body) = request_doc(route.request) {
        op.insert("requestBody".to_string(), body);
    }
    op.insert("responses".to_string(), Value::Object(responses));
    Value::Object(op)
}

/// Build the OpenAPI 3 document for every route in the table
pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(route.method.to_string(), operation_doc(route));
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Notes service",
            "description": "Plain-text notes stored one file per note",
            "version": VERSION,
        },
        "paths": paths,
        "components": {
            "schemas": {
                "Note": {
                    "type": "object",
                    "required": ["name", "text"],
                    "properties": {
                        "name": { "type": "string" },
                        "text": { "type": "string" }
                    }
                },
                "UpdateNote": {
                    "type": "object",
                    "properties": { "text": { "type": "string" } }
                },
                "WriteNote": {
                    "type": "object",
                    "required": ["note_name", "note"],
                    "properties": {
                        "note_name": { "type": "string" },
                        "note": { "type": "string" }
                    }
                }
            }
        }
    })
}

async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(openapi_document())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api-docs/openapi.json").route(web::get().to(openapi_json)));
}
