pub mod user_repo;
pub use user_repo::{PgUserRepository, UserRepository};
pub mod customer_repo;
pub use customer_repo::{CustomerRepository, PgCustomerRepository};
pub mod staff_repo;
pub use staff_repo::{PgStaffRepository, StaffRepository};
pub mod lead_option_repo;
pub use lead_option_repo::{LeadOptionRepository, PgLeadOptionRepository};

#[cfg(test)]
pub mod memory;
