//! Model backend client

pub mod ollama;
pub mod stream;

pub use ollama::OllamaBackend;
pub use stream::{collect_fragments, Fragment, FragmentDecoder};
