mod client;
mod error;
mod session;
mod session_file;

pub use client::*;
pub use error::*;
pub use session::*;
pub use session_file::*;
