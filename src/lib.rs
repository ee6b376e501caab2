//! Backend for a home-cleaning service: customer accounts and onboarding,
//! room selection and pricing, booking management, and an admin panel for
//! service prices and operational stats.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod onboarding;
pub mod pricing;
pub mod retry;
pub mod routes;
