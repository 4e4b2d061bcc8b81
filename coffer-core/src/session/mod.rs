//! The click-interaction protocol: decoded messages in, committed or
//! rejected transactions out.

mod click_session;
mod click_type;
mod hooks;
mod messages;
mod proposals;
mod queue;

pub use click_session::ClickSession;
pub use click_type::{ClickType, DragHeader, DragKind, DragPhase, MouseButton};
pub use hooks::{ClickProposal, CursorTransaction, EventDisposition, NoHooks, SessionHooks};
pub use messages::{
    ClickWindow, CloseWindow, CreativeClick, DropHeldItem, InboundMessage, SLOT_CLICKED_OUTSIDE,
};
pub use queue::SessionQueue;
