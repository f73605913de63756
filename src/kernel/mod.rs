pub mod source;
pub mod validate;
