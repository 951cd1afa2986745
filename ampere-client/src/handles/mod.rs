pub mod control_handle;
pub mod event_handle;
