pub mod extract;
pub mod registry;
pub mod session;
pub mod view;

pub use extract::ActiveChat;
pub use registry::{spawn_sweeper, ChatHandle, SessionRegistry};
pub use session::{ChatSession, Notification, GREETING};
pub use view::{transcript_views, MessageView, SourceView};
