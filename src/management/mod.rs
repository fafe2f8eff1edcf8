mod session;

pub use session::{SessionManager, SessionStore};
