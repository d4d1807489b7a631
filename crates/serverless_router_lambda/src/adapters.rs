pub mod credentials;
pub mod database;
pub mod student_store;
