//! Ollagen Types - Pure data definitions
//!
//! Request, result and history types shared between the generation core
//! and the HTTP gateway. No async runtime or I/O lives here.

pub mod history;
pub mod model;
pub mod options;
pub mod request;

pub use history::*;
pub use model::*;
pub use options::*;
pub use request::*;
