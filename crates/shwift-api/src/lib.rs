pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod server;
pub mod sessions;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::Server;
pub use sessions::SessionStore;
pub use state::AppState;
