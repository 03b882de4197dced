//! Persona prompts for the chat agents

pub mod ojou;

pub use ojou::build_system_prompt;
