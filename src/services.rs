pub mod auth;
pub mod customer_service;
pub mod lead_option_service;
pub mod media;
pub mod notification_service;
pub mod report_service;
pub mod staff_service;
