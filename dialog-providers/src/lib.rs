pub mod multipart;
pub mod parse;
pub mod request;
pub mod rest;
pub mod runtime;
