pub mod attributes;
pub mod recipes;
pub mod tokens;
pub mod users;
