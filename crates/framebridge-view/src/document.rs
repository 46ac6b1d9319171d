use crate::element::Element;
use crate::error::Result;

/// The outbound DOM boundary: node creation, insertion and removal.
///
/// `Node` is a cheap handle (an index, or a reference-counted JS object).
/// Implementations must wire an element's click handler so that activating
/// the live node invokes it.
pub trait Document {
    type Node: Clone;

    /// The node overlays are appended to.
    fn body(&self) -> Result<Self::Node>;

    /// Create a detached node from its description.
    fn create(&self, element: &Element) -> Result<Self::Node>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Structural parent of a node, if attached to one.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
}
