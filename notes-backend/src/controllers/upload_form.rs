//! Browser upload form posting multipart data to `/write`

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Responder, web};

const UPLOAD_FORM_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Upload Form</title>
</head>
<body>
  <h2>Upload Form</h2>
  <form method="post" action="/write" enctype="multipart/form-data">
    <label for="note_name_input">Note Name:</label><br>
    <input type="text" id="note_name_input" name="note_name"><br><br>
    <label for="note_input">Note:</label><br>
    <textarea id="note_input" name="note" rows="4" cols="50"></textarea><br><br>
    <button type="submit">Upload</button>
  </form>
</body>
</html>
"#;

async fn upload_form() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(UPLOAD_FORM_HTML)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/UploadForm.html").route(web::get().to(upload_form)));
}
