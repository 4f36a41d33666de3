pub mod schema;
pub mod contact_repo;
