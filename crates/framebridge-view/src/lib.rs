//! Overlay node factory and the outbound document boundary.
//!
//! The overlay is a four-node subtree:
//! ```text
//! container (fixed, full viewport)
//! └── wrapper (relative, sized)
//!     ├── frame (iframe, fills wrapper)
//!     └── close button (fixed, top-right)
//! ```
//!
//! Node constructors are pure and never reference messenger state. A
//! [`Document`] turns them into live nodes; [`VirtualDocument`] is the
//! in-memory implementation.

pub mod document;
pub mod element;
pub mod error;
pub mod factory;
pub mod html;
pub mod sizing;
pub mod virtual_dom;

pub use document::Document;
pub use element::{ClickHandler, Element, Tag};
pub use error::{Result, ViewError};
pub use factory::{close_button, container, frame, wrapper, Overlay};
pub use sizing::{Sizing, DEFAULT_HEIGHT, DEFAULT_TOP, DEFAULT_WIDTH, FULL};
pub use virtual_dom::{NodeId, VirtualDocument};
