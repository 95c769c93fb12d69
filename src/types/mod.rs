mod access_mode;
mod models;

pub use access_mode::AccessMode;
pub use models::*;
