// Token and upload services held in AppState

pub mod token_service;
pub mod upload_store;

pub use token_service::{bearer_token, Claims, TokenService};
pub use upload_store::{PendingUpload, StoredFile, UploadStore};
