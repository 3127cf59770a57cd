pub mod handlers;
pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::{require_admin, require_user, CurrentAdmin, CurrentUser};
pub use session::Viewer;
