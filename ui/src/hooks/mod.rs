pub mod use_session_sync;

pub use use_session_sync::use_session_sync;
pub use use_session_sync::SessionSync;
