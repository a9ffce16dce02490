pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod log_repo;
pub use log_repo::LogRepository;
pub mod material_repo;
pub use material_repo::MaterialRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod stats_repo;
pub use stats_repo::StatsRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

pub mod store;
pub use store::{PgStore, WorkflowStore, WorkflowTx};

#[cfg(test)]
pub mod memory;
