pub mod auth;
pub mod customers;
pub mod lead_options;
pub mod notifications;
pub mod reports;
pub mod staff;
