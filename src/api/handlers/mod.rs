pub mod forecast;
pub mod pages;
pub mod schema;
