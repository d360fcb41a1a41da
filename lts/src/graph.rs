use crate::label::Label;
use crate::{new_id, Map, Set};

new_id!(pub NodeId);
new_id!(pub EdgeId);

/// Allocates node and edge identifiers for one compile.
///
/// Every graph built with the same allocator gets identifiers that are fresh
/// across operations, so clones and products never alias. The driver creates
/// a new allocator at the start of each compile.
#[derive(Debug, Default)]
pub struct IdAlloc {
    next_node: usize,
    next_edge: usize,
}

impl IdAlloc {
    pub fn new() -> IdAlloc {
        IdAlloc::default()
    }

    pub fn node(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn edge(&mut self) -> EdgeId {
        let id = EdgeId::new(self.next_edge);
        self.next_edge += 1;
        id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terminal {
    Stop,
    Error,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetaData {
    pub start: bool,
    pub terminal: Option<Terminal>,
    pub parallel: bool,
}

impl MetaData {
    /// Union used by node merging: booleans are ORed, a later terminal tag
    /// overwrites an earlier one.
    pub fn union(&mut self, other: &MetaData) {
        self.start |= other.start;
        self.parallel |= other.parallel;
        if other.terminal.is_some() {
            self.terminal = other.terminal;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub label: Option<String>,
    pub meta: MetaData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: Label,
}

/// A labelled transition system: a rooted directed multigraph whose edges
/// carry labels. Nodes and edges are stored in insertion order, which keeps
/// every operation over them deterministic.
#[derive(Clone, Debug, Default)]
pub struct Lts {
    nodes: Map<NodeId, Node>,
    edges: Map<EdgeId, Edge>,
    root: Option<NodeId>,
}

impl Lts {
    pub fn new() -> Lts {
        Lts::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The root may only be reassigned to a node already in the graph;
    /// clearing it is allowed.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        if let Some(id) = root {
            assert!(self.nodes.contains_key(&id), "root must be a node of the graph");
        }
        self.root = root;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[&id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(&id, node)| (id, node))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(&id, edge)| (id, edge))
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges().filter(move |(_, e)| e.from == id)
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges().filter(move |(_, e)| e.to == id)
    }

    /// The set of labels appearing on edges.
    pub fn alphabet(&self) -> Set<Label> {
        self.edges.values().map(|e| e.label.clone()).collect()
    }

    pub fn add_node(&mut self, alloc: &mut IdAlloc) -> NodeId {
        let id = alloc.node();
        self.nodes.insert(id, Node::default());
        id
    }

    pub fn insert_node(&mut self, id: NodeId, node: Node) {
        let prev = self.nodes.insert(id, node);
        debug_assert!(prev.is_none(), "node id inserted twice");
    }

    pub fn add_edge(
        &mut self,
        alloc: &mut IdAlloc,
        from: NodeId,
        to: NodeId,
        label: Label,
    ) -> EdgeId {
        assert!(
            self.nodes.contains_key(&from) && self.nodes.contains_key(&to),
            "edge endpoints must be nodes of the graph"
        );
        let id = alloc.edge();
        self.edges.insert(id, Edge { from, to, label });
        id
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        self.edges.shift_remove(&id)
    }

    pub fn relabel_edge(&mut self, id: EdgeId, label: Label) {
        self.edges[&id].label = label;
    }

    /// Removes a node together with its incident edges. A removed root is
    /// cleared.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&id)?;
        self.edges.retain(|_, e| e.from != id && e.to != id);
        if self.root == Some(id) {
            self.root = None;
        }
        Some(node)
    }

    /// Merges `ids` into `ids[0]`. In- and out-edges of the merged nodes are
    /// retargeted onto the survivor, metadata bags are unioned in order, and
    /// the root follows if it was merged away.
    pub fn merge_nodes(&mut self, ids: &[NodeId]) {
        let (&survivor, rest) = match ids.split_first() {
            Some(split) => split,
            None => return,
        };
        for &id in rest {
            if id == survivor {
                continue;
            }
            let node = match self.nodes.shift_remove(&id) {
                Some(node) => node,
                None => continue,
            };
            self.nodes[&survivor].meta.union(&node.meta);
            for edge in self.edges.values_mut() {
                if edge.from == id {
                    edge.from = survivor;
                }
                if edge.to == id {
                    edge.to = survivor;
                }
            }
            if self.root == Some(id) {
                self.root = Some(survivor);
            }
        }
    }

    /// Collapses edges with identical endpoints and label, keeping the
    /// earliest-inserted one.
    pub fn remove_duplicate_edges(&mut self) {
        let mut seen = Set::default();
        self.edges.retain(|_, e| seen.insert((e.from, e.to, e.label.clone())));
    }

    /// Removes every node not reachable from the root. With no root the
    /// whole graph is unreachable.
    pub fn trim(&mut self) {
        let root = match self.root {
            Some(root) => root,
            None => {
                self.nodes.clear();
                self.edges.clear();
                return;
            }
        };

        let mut reached = Set::default();
        reached.insert(root);
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            for edge in self.edges.values() {
                if edge.from == n && reached.insert(edge.to) {
                    stack.push(edge.to);
                }
            }
        }

        self.nodes.retain(|id, _| reached.contains(id));
        self.edges.retain(|_, e| reached.contains(&e.from) && reached.contains(&e.to));
    }

    /// Unions the nodes and edges of `other` into `self`, keyed by id.
    /// Entries whose id is already present are silently skipped. The root is
    /// left untouched.
    pub fn combine_with(&mut self, other: &Lts) {
        for (&id, node) in other.nodes.iter() {
            self.nodes.entry(id).or_insert_with(|| node.clone());
        }
        for (&id, edge) in other.edges.iter() {
            self.edges.entry(id).or_insert_with(|| edge.clone());
        }
    }

    /// Restores the terminal invariants after operations that add or remove
    /// edges: a node with no outgoing edges and no terminal tag becomes a
    /// stop node, a stop node that gained outgoing edges loses the tag.
    pub fn refresh_terminals(&mut self) {
        let mut has_out = Set::default();
        for edge in self.edges.values() {
            has_out.insert(edge.from);
        }
        for (id, node) in self.nodes.iter_mut() {
            match node.meta.terminal {
                None if !has_out.contains(id) => node.meta.terminal = Some(Terminal::Stop),
                Some(Terminal::Stop) if has_out.contains(id) => node.meta.terminal = None,
                _ => {}
            }
        }
    }

    /// Deep clone with fresh identifiers. Each `Name` reference resolved by
    /// the interpreter goes through this, so later mutations never alias the
    /// referenced definition.
    pub fn clone_with(&self, alloc: &mut IdAlloc) -> Lts {
        let mut ids: Map<NodeId, NodeId> = Map::default();
        let mut out = Lts::new();
        for (&id, node) in self.nodes.iter() {
            let fresh = alloc.node();
            ids.insert(id, fresh);
            out.nodes.insert(fresh, node.clone());
        }
        for edge in self.edges.values() {
            let fresh = alloc.edge();
            let edge = Edge { from: ids[&edge.from], to: ids[&edge.to], label: edge.label.clone() };
            out.edges.insert(fresh, edge);
        }
        out.root = self.root.map(|root| ids[&root]);
        out
    }
}
