pub mod engine;
pub mod replies;

pub use engine::DialogueEngine;
