// Job application handlers, including the multipart resume upload

use axum::{
    body::Bytes,
    extract::{Extension, Multipart, Path, State},
};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    results::{DeleteResult, InsertOneResult},
    Cursor,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::config::state::AppState;
use crate::database::documents::{
    bson_to_json, collect_documents, documents_to_json, parse_object_id,
};
use crate::services::{Claims, PendingUpload, StoredFile};
use crate::utils::{ApiError, ApiResult, HandlerResponse};

/// Multipart field that carries the resume file.
pub const RESUME_FIELD: &str = "resume";

/// The resume part of an application form, held in memory until the
/// submission has been validated.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub mimetype: String,
    pub bytes: Bytes,
}

/// A parsed application form.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub fields: Document,
    pub resume: Option<ResumeUpload>,
}

impl ApplicationForm {
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form: ApplicationForm = ApplicationForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name: String = field.name().unwrap_or_default().to_string();

            // Only a file part counts as the resume; a plain `resume` text
            // field is kept as an ordinary form value.
            if name == RESUME_FIELD && field.file_name().is_some() {
                let file_name: String = field.file_name().unwrap_or(RESUME_FIELD).to_string();
                let mimetype: String = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes: Bytes = field.bytes().await?;

                form.resume = Some(ResumeUpload { file_name, mimetype, bytes });
            } else if !name.is_empty() {
                let value: String = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// The resume must be present and the form must be filed by the caller.
    pub fn validate(self, caller_email: &str) -> ApiResult<(Document, ResumeUpload)> {
        let Some(resume) = self.resume else {
            return Err(ApiError::BadRequest("No file uploaded".to_string()));
        };

        if self.fields.get_str("email").ok() != Some(caller_email) {
            return Err(ApiError::Forbidden("Forbidden access".to_string()));
        }

        Ok((self.fields, resume))
    }
}

/// Form fields plus the stored resume metadata and a `createdAt` stamp.
pub fn application_document(
    mut fields: Document,
    stored: &StoredFile,
    mimetype: &str,
    now: DateTime,
) -> Document {
    fields.insert(
        "resume",
        doc! {
            "filename": stored.filename.as_str(),
            "path": stored.path.as_str(),
            "mimetype": mimetype,
            "size": i64::try_from(stored.size).unwrap_or(i64::MAX),
        },
    );
    fields.insert("createdAt", now);
    fields
}

/// Accepts an application with its resume
#[instrument(skip_all)]
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> ApiResult<HandlerResponse> {
    let form: ApplicationForm = ApplicationForm::from_multipart(multipart).await?;
    let (fields, resume) = form.validate(&claims.email)?;

    let stored: StoredFile = state.uploads.save(&resume.file_name, &resume.bytes).await?;
    // Removed again unless the insert below succeeds
    let pending: PendingUpload = state.uploads.pending(stored);
    let application: Document =
        application_document(fields, pending.stored(), &resume.mimetype, DateTime::now());

    let result: InsertOneResult = state.database.applications().insert_one(application).await?;
    pending.commit();

    info!("Application submitted by {}", claims.email);
    Ok(HandlerResponse::ok(json!({
        "insertedId": bson_to_json(result.inserted_id),
    }))
    .message("Application submitted successfully!"))
}

#[instrument(skip(state))]
pub async fn list_applications(State(state): State<AppState>) -> ApiResult<HandlerResponse> {
    let cursor: Cursor<Document> = state
        .database
        .applications()
        .find(doc! {})
        .sort(doc! { "createdAt": -1 })
        .await?;
    let applications: Vec<Document> = collect_documents(cursor).await?;
    Ok(HandlerResponse::ok(documents_to_json(applications)))
}

/// Deletes an application and its resume file
#[instrument(skip(state))]
pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<HandlerResponse> {
    let id: ObjectId = parse_object_id(&id, "Invalid ID format")?;
    let filter: Document = doc! { "_id": id };

    let application: Document = state
        .database
        .applications()
        .find_one(filter.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    match application.get_document("resume").and_then(|resume| resume.get_str("path")) {
        Ok(path) => {
            state.uploads.remove(path).await;
        }
        Err(_) => warn!("Application {} has no resume on record", id),
    }

    let result: DeleteResult = state.database.applications().delete_one(filter).await?;
    Ok(HandlerResponse::ok(json!({ "deletedCount": result.deleted_count })))
}
