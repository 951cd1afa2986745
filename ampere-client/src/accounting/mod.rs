mod energy;
mod session;

pub use energy::*;
pub use session::SessionId;
