pub mod documents;
pub mod mongo_service;

pub use mongo_service::DatabaseService;
