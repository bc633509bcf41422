pub mod poster;
pub mod rest;

pub use poster::{ImageFetchError, TmdbConfig, TmdbPosterClient};
pub use rest::{AppState, RestApi};
