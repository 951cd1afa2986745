mod bill;
mod channel;
mod reading;

pub use bill::*;
pub use channel::*;
pub use reading::*;
