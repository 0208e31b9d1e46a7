use serde::{Deserialize, Serialize};

use crate::post::Post;

/// A post in the reply tree. `children` are positions in the owning
/// thread's node list, in reply order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadNode {
    pub post: Post,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
}

impl ThreadNode {
    pub fn leaf(post: Post) -> Self {
        Self {
            post,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.post.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Output of the thread assembler.
///
/// Nodes live in one flat list with the root at position 0, so dropping,
/// cloning or serializing a thread never recurses, however deep the reply
/// chain. A node is only ever added below an existing one, which keeps the
/// list a tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledThread {
    nodes: Vec<ThreadNode>,
    /// Set when the conversation root was missing and the earliest post was
    /// used in its place
    pub root_fallback: bool,
    /// Posts that could not be attached to the tree
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub detached: Vec<String>,
}

impl AssembledThread {
    pub fn new(root: Post, root_fallback: bool) -> Self {
        Self {
            nodes: vec![ThreadNode::leaf(root)],
            root_fallback,
            detached: Vec::new(),
        }
    }

    /// Add `post` as the last reply of the node at `parent`. Returns the new
    /// node's position, or `None` if `parent` does not exist.
    pub fn attach(&mut self, parent: usize, post: Post) -> Option<usize> {
        let index = self.nodes.len();
        self.nodes.get_mut(parent)?.children.push(index);
        self.nodes.push(ThreadNode::leaf(post));
        Some(index)
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            thread: self,
            index: 0,
        }
    }

    pub fn node(&self, index: usize) -> Option<NodeRef<'_>> {
        (index < self.nodes.len()).then_some(NodeRef {
            thread: self,
            index,
        })
    }

    /// All nodes in attachment order
    pub fn nodes(&self) -> &[ThreadNode] {
        &self.nodes
    }
}

/// Borrowed view of one node and the subtree below it
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    thread: &'a AssembledThread,
    index: usize,
}

impl<'a> NodeRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn node(&self) -> &'a ThreadNode {
        // Only built from positions that exist in the thread
        &self.thread.nodes[self.index]
    }

    pub fn post(&self) -> &'a Post {
        &self.node().post
    }

    pub fn id(&self) -> &'a str {
        self.node().id()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + 'a {
        let thread = self.thread;
        self.node()
            .children
            .iter()
            .filter_map(move |&index| thread.node(index))
    }

    pub fn child_ids(&self) -> Vec<&'a str> {
        self.children().map(|c| c.id()).collect()
    }

    /// This node and its descendants in depth-first pre-order
    pub fn preorder(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().rev());
        }
        out
    }

    pub fn preorder_ids(&self) -> Vec<&'a str> {
        self.preorder().iter().map(|n| n.id()).collect()
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// Length of the longest reply chain, counting `self` as 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(*self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children().map(|c| (c, depth + 1)));
        }
        deepest
    }

    pub fn find(&self, id: &str) -> Option<NodeRef<'a>> {
        self.preorder().into_iter().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}
