pub mod envelope;
pub mod models;
pub mod signing;
