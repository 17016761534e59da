// Interview chat: a pure state machine (session) run by an async driver.
// Speech is an optional capability attached per chat.

pub mod driver;
pub mod handlers;
pub mod registry;
pub mod session;
pub mod speech;

pub use registry::ChatRegistry;
pub use session::ChatError;
