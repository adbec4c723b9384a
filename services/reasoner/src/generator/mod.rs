//! Sketch generators: the HTTP chat-completions client and a replaying mock

pub mod chat;
pub mod mock;
pub mod prompt;
pub mod traits;

pub use chat::ChatCompletionsGenerator;
pub use mock::{Script, ScriptedGenerator, ScriptedReply};
pub use traits::SketchGenerator;
