pub mod document;
pub mod field_spec;
pub mod form;
pub mod health;
pub mod message;
pub mod payload;
pub mod response;
pub mod validation;
