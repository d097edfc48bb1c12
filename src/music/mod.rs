pub mod ace_step_client;

pub use ace_step_client::AceStepClient;
