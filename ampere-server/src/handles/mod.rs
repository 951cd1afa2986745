mod bill_handle;

pub use bill_handle::*;
