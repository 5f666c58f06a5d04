pub mod extractor;
pub mod manager;
pub mod password;
pub mod token;
