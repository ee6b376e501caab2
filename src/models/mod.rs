pub mod account;
pub mod admin;
pub mod booking;
pub mod catalog;
pub mod profile;
