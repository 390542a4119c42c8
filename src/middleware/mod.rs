// Middleware applied to the web router

pub mod cors;

pub use cors::*;
