//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created each frame from application state:
//! - `TitleBar`: model name, status and theme
//! - `MessageView`: a single transcript entry
//! - `LandingPage`: greeting and suggested prompts
//! - `ConfirmView`: delete-all overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Hold local state in `TuiState` and emit events:
//! - `InputBox`: prompt editor
//! - `MessageListState` / `MessageList`: scrollable transcript
//! - `ConfirmDialog`: delete-all confirmation
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── landing.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── input_box.rs
//! └── confirm.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod confirm;
pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub use confirm::{ConfirmDialog, ConfirmEvent, ConfirmView};
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
