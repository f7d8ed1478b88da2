pub mod chat;
pub mod responses;

pub use chat::ChatClient;
pub use responses::ResponsesProvider;
