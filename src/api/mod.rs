mod app;
mod handlers;
mod server;
mod state;

pub use app::router;
pub use server::serve;
pub use state::AppState;
