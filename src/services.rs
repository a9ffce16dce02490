pub mod audit_service;
pub mod auth;
pub mod catalog_service;
pub mod document_service;
pub mod material_service;
pub mod project_service;
pub mod stats_service;
pub mod user_service;
