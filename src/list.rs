//! Lazy node lists over siblings, attributes and whole subtrees.

use std::cell::Cell;
use std::rc::Rc;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::Node;

/// Nesting depth the deep-traversal stack is sized for up front.
const DEFAULT_XML_LEVELS: usize = 200;

/// A predicate narrowing a [`NodeList`].
///
/// It receives the list itself next to the candidate so a caller can stop
/// on context (current depth, already-yielded count, …).
pub type NodeFilter = Rc<dyn Fn(&NodeList, &Document, Node) -> bool>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListMode {
    Attributes,
    ChildNodes,
    ChildNodesDeep,
    Flat,
}

/// A resume point of the deep traversal: where to continue once the
/// current subtree is exhausted.
#[derive(Clone, Copy)]
struct Frame {
    parent: Option<Node>,
    resume: Option<Node>,
    revision: u32,
}

/// A lazy, filterable list of nodes.
///
/// A value type: [`save`](NodeList::save) (or plain `clone`) yields an
/// independent iterator over the same nodes. Every stepping operation
/// cross-checks the revision counter of the list it is walking and fails
/// with [`Error::ListChanged`] when the underlying list was structurally
/// modified.
#[derive(Clone)]
pub struct NodeList {
    mode: ListMode,
    origin: Node,
    front: Option<Node>,
    /// The node whose child/attribute list `front` currently sits in,
    /// with the revision observed when we entered that list.
    curr_parent: Option<Node>,
    curr_revision: u32,
    stack: Vec<Frame>,
    flat: Rc<Vec<Node>>,
    flat_pos: usize,
    filter: Option<NodeFilter>,
    length: Cell<Option<usize>>,
}

impl NodeList {
    pub(crate) fn attributes(doc: &Document, parent: Node) -> NodeList {
        NodeList {
            mode: ListMode::Attributes,
            origin: parent,
            front: parent.first_attribute(doc),
            curr_parent: Some(parent),
            curr_revision: doc.revision_of(parent),
            stack: Vec::new(),
            flat: Rc::new(Vec::new()),
            flat_pos: 0,
            filter: None,
            length: Cell::new(None),
        }
    }

    pub(crate) fn child_nodes(doc: &Document, parent: Node) -> NodeList {
        NodeList {
            mode: ListMode::ChildNodes,
            origin: parent,
            front: parent.first_child(doc),
            curr_parent: Some(parent),
            curr_revision: doc.revision_of(parent),
            stack: Vec::new(),
            flat: Rc::new(Vec::new()),
            flat_pos: 0,
            filter: None,
            length: Cell::new(None),
        }
    }

    /// Preorder over `origin` and its whole subtree, `origin` first.
    pub(crate) fn child_nodes_deep(_doc: &Document, origin: Node) -> NodeList {
        NodeList {
            mode: ListMode::ChildNodesDeep,
            origin,
            front: Some(origin),
            curr_parent: None,
            curr_revision: 0,
            stack: Vec::with_capacity(DEFAULT_XML_LEVELS),
            flat: Rc::new(Vec::new()),
            flat_pos: 0,
            filter: None,
            length: Cell::new(None),
        }
    }

    /// A list over an explicit set of nodes.
    pub fn flat(nodes: Vec<Node>) -> NodeList {
        let front = nodes.first().copied();
        let origin = match front {
            Some(n) => n,
            // An empty flat list never dereferences its origin.
            None => Node {
                doc_token: 0,
                id: crate::node::NodeId::from_usize(0),
            },
        };
        NodeList {
            mode: ListMode::Flat,
            origin,
            front,
            curr_parent: None,
            curr_revision: 0,
            stack: Vec::new(),
            flat: Rc::new(nodes),
            flat_pos: 0,
            filter: None,
            length: Cell::new(None),
        }
    }

    /// Attaches a filter and skips a non-matching front.
    pub fn with_filter(mut self, doc: &Document, filter: NodeFilter) -> NodeList {
        self.filter = Some(filter);
        self.skip_unmatched(doc).ok();
        self
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// The current node, without advancing.
    pub fn front(&self) -> Option<Node> {
        self.front
    }

    /// Returns the current node and advances past it.
    pub fn pop_front(&mut self, doc: &Document) -> Result<Option<Node>> {
        let node = self.front;
        if node.is_some() {
            self.length.set(None);
            self.advance(doc)?;
        }
        Ok(node)
    }

    /// Advances without returning the node.
    pub fn move_front(&mut self, doc: &Document) -> Result<()> {
        if self.front.is_some() {
            self.advance(doc)?;
        }
        Ok(())
    }

    /// The `i`-th node, counted from the start of the list.
    pub fn item(&self, doc: &Document, i: usize) -> Result<Option<Node>> {
        let mut walk = self.restarted(doc)?;
        for _ in 0..i {
            if walk.pop_front(doc)?.is_none() {
                return Ok(None);
            }
        }
        Ok(walk.front())
    }

    /// Number of nodes in the list.
    ///
    /// Memoized; the memo is dropped by `pop_front` and recomputed by
    /// walking an independent snapshot.
    pub fn len(&self, doc: &Document) -> Result<usize> {
        if let Some(n) = self.length.get() {
            return Ok(n);
        }

        let mut walk = self.restarted(doc)?;
        let mut n = 0;
        while walk.pop_front(doc)?.is_some() {
            n += 1;
        }
        self.length.set(Some(n));
        Ok(n)
    }

    /// Position of `node` in the list, counted from the start.
    pub fn index_of(&self, doc: &Document, node: Node) -> Result<Option<usize>> {
        let mut walk = self.restarted(doc)?;
        let mut i = 0;
        while let Some(curr) = walk.pop_front(doc)? {
            if curr == node {
                return Ok(Some(i));
            }
            i += 1;
        }
        Ok(None)
    }

    /// The last node of the list.
    pub fn back(&self, doc: &Document) -> Result<Option<Node>> {
        let mut walk = self.restarted(doc)?;
        let mut last = None;
        while let Some(curr) = walk.pop_front(doc)? {
            last = Some(curr);
        }
        Ok(last)
    }

    /// Detaches every node in the list from its parent.
    pub fn remove_all(&mut self, doc: &mut Document) -> Result<()> {
        let mut nodes = Vec::new();
        {
            let mut walk = self.restarted(doc)?;
            while let Some(node) = walk.pop_front(doc)? {
                nodes.push(node);
            }
        }

        for node in nodes {
            doc.detach_any(node)?;
        }

        self.front = None;
        self.stack.clear();
        self.length.set(Some(0));
        Ok(())
    }

    /// Rewinds to the start of the list.
    pub fn reset(&mut self, doc: &Document) -> Result<()> {
        self.stack.clear();
        self.length.set(None);
        match self.mode {
            ListMode::Attributes => {
                self.front = self.origin.first_attribute(doc);
                self.curr_parent = Some(self.origin);
                self.curr_revision = doc.revision_of(self.origin);
            }
            ListMode::ChildNodes => {
                self.front = self.origin.first_child(doc);
                self.curr_parent = Some(self.origin);
                self.curr_revision = doc.revision_of(self.origin);
            }
            ListMode::ChildNodesDeep => {
                self.front = Some(self.origin);
                self.curr_parent = None;
                self.curr_revision = 0;
            }
            ListMode::Flat => {
                self.flat_pos = 0;
                self.front = self.flat.first().copied();
            }
        }
        self.skip_unmatched(doc)
    }

    /// An independent copy for re-iteration.
    pub fn save(&self) -> NodeList {
        self.clone()
    }

    fn restarted(&self, doc: &Document) -> Result<NodeList> {
        let mut copy = self.save();
        copy.reset(doc)?;
        Ok(copy)
    }

    /// One filtered step.
    fn advance(&mut self, doc: &Document) -> Result<()> {
        self.advance_raw(doc)?;
        self.skip_unmatched(doc)
    }

    fn skip_unmatched(&mut self, doc: &Document) -> Result<()> {
        let filter = match &self.filter {
            Some(f) => Rc::clone(f),
            None => return Ok(()),
        };

        while let Some(node) = self.front {
            if (*filter)(&*self, doc, node) {
                break;
            }
            self.advance_raw(doc)?;
        }
        Ok(())
    }

    /// One structural step, ignoring the filter.
    fn advance_raw(&mut self, doc: &Document) -> Result<()> {
        let curr = match self.front {
            Some(n) => n,
            None => return Ok(()),
        };

        if self.mode == ListMode::Flat {
            self.flat_pos += 1;
            self.front = self.flat.get(self.flat_pos).copied();
            return Ok(());
        }

        self.check_revision(doc)?;

        if self.mode == ListMode::ChildNodesDeep {
            if let Some(child) = curr.first_child(doc) {
                // The origin's own siblings are outside the subtree.
                let resume = if curr == self.origin {
                    None
                } else {
                    curr.next_sibling(doc)
                };
                self.stack.push(Frame {
                    parent: self.curr_parent,
                    resume,
                    revision: self.curr_revision,
                });
                self.curr_parent = Some(curr);
                self.curr_revision = doc.revision_of(curr);
                self.front = Some(child);
                return Ok(());
            }
        }

        // The deep traversal must not leave the origin's subtree.
        let next = if self.mode == ListMode::ChildNodesDeep && curr == self.origin {
            None
        } else {
            curr.next_sibling(doc)
        };

        if let Some(next) = next {
            self.front = Some(next);
            return Ok(());
        }

        if self.mode == ListMode::ChildNodesDeep {
            while let Some(frame) = self.stack.pop() {
                if let Some(parent) = frame.parent {
                    if doc.revision_of(parent) != frame.revision {
                        self.front = None;
                        return Err(Error::ListChanged);
                    }
                }
                if let Some(resume) = frame.resume {
                    self.curr_parent = frame.parent;
                    self.curr_revision = frame.revision;
                    self.front = Some(resume);
                    return Ok(());
                }
            }
        }

        self.front = None;
        Ok(())
    }

    fn check_revision(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.curr_parent {
            if doc.revision_of(parent) != self.curr_revision {
                return Err(Error::ListChanged);
            }
        }
        Ok(())
    }
}
