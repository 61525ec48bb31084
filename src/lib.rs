//! chaptercast: caption timing, dialogue segmentation and export utilities
//! for multi-chapter scripts written with a generative-AI collaborator.

pub mod captions;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod dialogue;
pub mod export;
pub mod prompts;
pub mod snapshot;
pub mod types;

pub use captions::synthesize;
pub use dialogue::segment;
