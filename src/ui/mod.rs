// Terminal UI using Ratatui

pub mod components;
pub mod converter;
pub mod events;
pub mod focus;
pub mod prompt;
pub mod quit_modal;
pub mod state;
pub mod widgets;

pub use converter::Converter;
pub use events::{handle_backend_event, handle_key, run_ui};
pub use prompt::PromptModal;
pub use quit_modal::{NoticeModal, QuitModal};
pub use state::AppState;
