mod api_types;
mod client;
mod collection;
mod filter;
mod form;
mod repository;
mod store;
mod types;

pub use client::{JokesApi, JokesClient};
pub use collection::JokeCollection;
pub use filter::{CategoryFilter, JokeFilter, LikeFilter};
pub use form::{DraftField, FieldError, JokeDraft};
pub use repository::JokeTypesRepository;
pub use store::JokeStore;
pub use types::{Joke, JokeType, LikeStatus};
