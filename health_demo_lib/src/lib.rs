pub mod measurement;
pub mod privacy_mode;
pub mod session;
pub mod session_type;
pub mod summary;
