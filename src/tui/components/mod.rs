//! # TUI Components
//!
//! UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: Top status bar showing backend, model and status
//! - `SummaryLine`: Rolling conversation summary, hidden until one exists
//! - `MessageBlock`: One conversation message
//! - `InputBox`: The pending input behind the prompt marker
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `MessageList`: Scrollable conversation view backed by `MessageListState`,
//!   which persists scroll position across frames and handles scroll events
//!
//! Components receive external data as "props", not by reaching into `App`:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! MessageList::new(&mut tui.message_list, app.log.messages(), pending).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── summary_line.rs  (Rolling summary row)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box.rs     (Prompt-marked input)
//! ```

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod summary_line;
pub mod title_bar;

pub use input_box::InputBox;
pub use message_list::{MessageList, MessageListState};
pub use summary_line::SummaryLine;
pub use title_bar::TitleBar;
