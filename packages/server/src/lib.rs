pub mod server;
pub mod state;

pub use server::{router, AppState};
pub use state::{CreatePost, PostState, StateError};
