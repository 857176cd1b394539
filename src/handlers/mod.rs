// Handlers module

pub mod chat;
pub mod file;
pub mod upload;

pub use chat::chat_handler;
pub use file::get_file_handler;
pub use upload::upload_handler;
