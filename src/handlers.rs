pub mod auth;
pub mod catalog;
pub mod documents;
pub mod health;
pub mod logs;
pub mod materials;
pub mod projects;
pub mod stats;
pub mod users;
