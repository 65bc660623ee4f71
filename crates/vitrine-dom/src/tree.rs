//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: detached nodes stay in the arena until the tree
//! is dropped, which matches a page whose markup is fixed for its lifetime.

use crate::{DomError, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data for `id`
    pub fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.get(id)
            .ok_or(DomError::InvalidNode(id))?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Mutable element data for `id`
    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::InvalidNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::InvalidNode(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::InvalidNode(child));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Ancestors from parent up to the root (excluding `id`)
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// All descendants in tree order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[start..].reverse();
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match self.get_mut(id).map(|n| &mut n.data) {
            None => return Err(DomError::InvalidNode(id)),
            Some(NodeData::Text(content)) | Some(NodeData::Comment(content)) => {
                *content = text.to_string();
                return Ok(());
            }
            Some(_) => {}
        }

        let children: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();

        // A lone text child is rewritten in place so repeated updates don't grow the arena
        if let [only] = children[..] {
            if !text.is_empty() {
                if let NodeData::Text(content) = &mut self.nodes[only.index()].data {
                    *content = text.to_string();
                    return Ok(());
                }
            }
        }

        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        (tree, div, a, b)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, div, a, b) = sample();
        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.parent(a), Some(div));
    }

    #[test]
    fn test_append_moves_attached_node() {
        let (mut tree, div, a, b) = sample();
        tree.append_child(b, a).unwrap();
        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![b]);
        assert_eq!(tree.parent(a), Some(b));
    }

    #[test]
    fn test_append_rejects_cycle() {
        let (mut tree, div, a, _) = sample();
        let err = tree.append_child(a, div).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: a, child: div });
    }

    #[test]
    fn test_descendants_tree_order() {
        let (mut tree, div, a, b) = sample();
        let inner = tree.create_element("span");
        tree.append_child(a, inner).unwrap();
        assert_eq!(tree.descendants(tree.root()), vec![div, a, inner, b]);
    }

    #[test]
    fn test_text_content_roundtrip() {
        let (mut tree, div, a, _) = sample();
        let t = tree.create_text("250");
        tree.append_child(a, t).unwrap();
        assert_eq!(tree.text_content(div), "250");

        tree.set_text_content(a, "98%").unwrap();
        assert_eq!(tree.text_content(a), "98%");
        assert_eq!(tree.children(a).count(), 1);
    }

    #[test]
    fn test_set_text_content_reuses_lone_text_child() {
        let (mut tree, _, a, _) = sample();
        tree.set_text_content(a, "0+").unwrap();
        let before = tree.len();
        for i in 1..=125 {
            tree.set_text_content(a, &format!("{i}+")).unwrap();
        }
        assert_eq!(tree.len(), before);
        assert_eq!(tree.text_content(a), "125+");

        // Clearing still drops the child
        tree.set_text_content(a, "").unwrap();
        assert_eq!(tree.children(a).count(), 0);
    }

    #[test]
    fn test_element_on_text_node_errors() {
        let mut tree = DomTree::new();
        let t = tree.create_text("x");
        assert_eq!(tree.element(t).unwrap_err(), DomError::NotAnElement(t));
        assert_eq!(
            tree.element(NodeId(99)).unwrap_err(),
            DomError::InvalidNode(NodeId(99))
        );
    }
}
