pub mod auth;
pub mod catalog;
pub mod document;
pub mod log;
pub mod material;
pub mod project;
pub mod stats;
