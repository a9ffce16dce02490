// Regras do fluxo de aprovação, sem acesso a banco.
pub mod aggregate;
pub mod approval;
pub mod brand_guidance;
pub mod permissions;
pub mod replication;
