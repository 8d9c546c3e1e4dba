pub mod error;
pub mod multipart;
