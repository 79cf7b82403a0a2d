pub mod field;
pub mod growth;
