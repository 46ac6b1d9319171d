//! Browser binding: window `message` events in, real DOM nodes out.

mod channel;
mod document;
mod error;
mod messenger;

pub use channel::WindowChannel;
pub use document::BrowserDocument;
pub use messenger::IframeMessenger;
