mod channel;
mod commands;

pub use channel::DeviceChannel;
pub use commands::CommandTable;
