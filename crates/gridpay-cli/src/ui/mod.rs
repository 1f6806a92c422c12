//! Terminal interaction.
//!
//! - `prompt`: menu and input prompts, validated before they return
//! - `presenter`: renders flow events and errors to the console

pub mod presenter;
pub mod prompt;

pub use presenter::ConsolePresenter;
pub use prompt::MenuChoice;
