pub mod actuator_service;
pub mod billing_service;
