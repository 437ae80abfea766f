pub mod api_docs;
pub mod health;
pub mod notes;
pub mod upload_form;
