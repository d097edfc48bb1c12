pub mod categories;
pub mod orchestrator;
pub mod prompts;
pub mod scratch;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use categories::parse_categories;
pub use orchestrator::{RequestOrchestrator, WorkerContext};
pub use scratch::{ScratchDir, ScratchFile};
pub use traits::{ImageSynthesizer, MusicSynthesizer, TextGenerator};
