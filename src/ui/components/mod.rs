mod input;
mod joke_form;
mod key_result;
mod search_input;

pub use joke_form::{JokeForm, JokeFormEvent};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
