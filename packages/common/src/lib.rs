pub mod chat_state;
pub mod oauth;
pub mod response;
pub mod user;
pub mod writing_state;

pub use chat_state::ChatState;
pub use oauth::OauthProvider;
pub use response::ResponseStatus;
pub use user::{RegisterState, Role};
pub use writing_state::WritingState;
