//! Domain types shared by every Briefly crate.

mod article;
mod voice;

pub use article::{Article, ArticleSummary};
pub use voice::{VoiceCatalog, VoiceDescriptor};
