pub mod config;
pub mod fs;
pub mod negotiation;
pub mod observability;
pub mod static_files;
