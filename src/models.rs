pub mod auth;
pub mod customer;
pub mod document;
pub mod lead_option;
pub mod notification;
pub mod report;
pub mod staff;
