use std::{cell::RefCell, collections::HashMap};

/// Attribute the thread container carries once the thread got its id
pub const THREAD_ID_ATTRIBUTE: &str = "data-comment-thread-id";

/// Read access to whatever got rendered, used to recover a thread id that did
/// not flow through the creation path
pub trait ThreadLocator {
    /// Value of `attribute` on the closest element, starting from the one
    /// tagged with `marker_class` and going up
    fn closest_attribute(&self, marker_class: &str, attribute: &str) -> Option<String>;
}

impl<T: ThreadLocator> ThreadLocator for RefCell<T> {
    fn closest_attribute(&self, marker_class: &str, attribute: &str) -> Option<String> {
        self.borrow().closest_attribute(marker_class, attribute)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
}

/// Minimal rendered element tree
#[derive(Clone, Debug, Default)]
pub struct RenderTree {
    nodes: Vec<Node>,
}

impl RenderTree {
    pub fn new() -> RenderTree {
        RenderTree::default()
    }

    pub fn add_root(&mut self) -> NodeId {
        self.push(None)
    }

    /// Adds a node under `parent`, or as a root if `parent` is not part of
    /// this tree
    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        if parent.0 >= self.nodes.len() {
            tracing::warn!(?parent, "unknown parent node, adding child as a root");
            return self.push(None);
        }
        self.push(Some(parent))
    }

    fn push(&mut self, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(Node {
            parent,
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_class(&mut self, node: NodeId, class: impl Into<String>) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.classes.push(class.into());
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.insert(name.into(), value.into());
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)
            .and_then(|n| n.attributes.get(name))
            .map(|v| v as &str)
    }

    /// First node, in insertion order, carrying `class`
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        let mut found = self.with_class(class);
        let first = found.next();
        if found.next().is_some() {
            tracing::warn!(%class, "class is on several nodes, using the first one");
        }
        first
    }

    fn with_class<'a>(&'a self, class: &'a str) -> impl 'a + Iterator<Item = NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.classes.iter().any(|c| c == class))
            .map(|(i, _)| NodeId(i))
    }

    /// `node` itself, then its parent, and so on up to the root
    pub fn ancestors(&self, node: NodeId) -> impl '_ + Iterator<Item = NodeId> {
        let first = self.nodes.get(node.0).map(|_| node);
        std::iter::successors(first, move |n| self.nodes.get(n.0).and_then(|n| n.parent))
    }

    pub fn closest(&self, node: NodeId, attribute: &str) -> Option<NodeId> {
        self.ancestors(node)
            .find(|n| self.attribute(*n, attribute).is_some())
    }
}

impl ThreadLocator for RenderTree {
    fn closest_attribute(&self, marker_class: &str, attribute: &str) -> Option<String> {
        let marker = self.find_by_class(marker_class)?;
        let holder = self.closest(marker, attribute)?;
        self.attribute(holder, attribute).map(String::from)
    }
}
