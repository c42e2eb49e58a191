pub mod cake_status;
pub mod cake_type;
