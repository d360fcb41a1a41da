use lts::index::Id as _;
use lts::{Edge, EdgeId, IdAlloc, Label, Lts, Map, MetaData, Node, NodeId, Set, Terminal};

/// Synchronisation key of a label. User-visible actions synchronise on their
/// bare name; the broadcast/listen modes are orthogonal and only carried on
/// the emitted edges.
#[derive(Clone, PartialEq, Eq, Hash)]
enum SyncKey {
    Tau,
    Delta,
    Name(String),
}

fn sync_key(label: &Label) -> SyncKey {
    match label {
        Label::Tau => SyncKey::Tau,
        Label::Delta => SyncKey::Delta,
        Label::Act(act) => SyncKey::Name(act.name.clone()),
    }
}

fn component_label(id: NodeId, node: &Node) -> String {
    match &node.label {
        Some(label) if !label.is_empty() => label.clone(),
        _ => id.to_usize().to_string(),
    }
}

/// The product of two LTSs, synchronising on the shared alphabet and
/// interleaving the rest. Nondeterministic moves are enumerated pairwise and
/// no edges are deduplicated during construction; nodes unreachable from the
/// product root are trimmed at the end.
pub fn parallel(alloc: &mut IdAlloc, left: &Lts, right: &Lts) -> Lts {
    let mut out = Lts::new();
    let mut pairs: Map<(NodeId, NodeId), NodeId> = Map::default();

    for (l_id, l) in left.nodes() {
        for (r_id, r) in right.nodes() {
            let id = alloc.node();
            let label = format!("{}.{}", component_label(l_id, l), component_label(r_id, r));
            let terminal = match (l.meta.terminal, r.meta.terminal) {
                (Some(Terminal::Stop), Some(Terminal::Stop)) => Some(Terminal::Stop),
                _ => None,
            };
            let meta = MetaData {
                start: l.meta.start && r.meta.start,
                terminal,
                parallel: false,
            };
            out.insert_node(id, Node { label: Some(label), meta });
            pairs.insert((l_id, r_id), id);
        }
    }

    if let (Some(l_root), Some(r_root)) = (left.root(), right.root()) {
        let root = pairs[&(l_root, r_root)];
        out.node_mut(root).meta.parallel = true;
        out.set_root(Some(root));
    }

    let left_alpha: Set<SyncKey> = left.edges().map(|(_, e)| sync_key(&e.label)).collect();
    let right_alpha: Set<SyncKey> = right.edges().map(|(_, e)| sync_key(&e.label)).collect();

    for key in left_alpha.iter().chain(right_alpha.iter().filter(|k| !left_alpha.contains(*k))) {
        let l_edges = || left.edges().filter(|(_, e)| sync_key(&e.label) == *key);
        let r_edges = || right.edges().filter(|(_, e)| sync_key(&e.label) == *key);

        match (left_alpha.contains(key), right_alpha.contains(key)) {
            (true, true) => {
                // Synchronised move: both components step together, pairing
                // every combination of same-key edges. τ only synchronises
                // with τ, so the emitted label is the left component's; it
                // can differ from the right one in mode alone.
                for (_, le) in l_edges() {
                    for (_, re) in r_edges() {
                        let from = pairs[&(le.from, re.from)];
                        let to = pairs[&(le.to, re.to)];
                        out.add_edge(alloc, from, to, le.label.clone());
                    }
                }
            }
            (true, false) => independent(&mut out, alloc, &pairs, l_edges(), right, true),
            (false, true) => independent(&mut out, alloc, &pairs, r_edges(), left, false),
            (false, false) => unreachable!(),
        }
    }

    out.trim();
    out
}

/// Independent move of one component: the stepping component's edge is
/// replayed against every node of the other component.
fn independent<'a>(
    out: &mut Lts,
    alloc: &mut IdAlloc,
    pairs: &Map<(NodeId, NodeId), NodeId>,
    edges: impl Iterator<Item = (EdgeId, &'a Edge)>,
    other: &Lts,
    stepping_is_left: bool,
) {
    for (_, edge) in edges {
        for (o_id, _) in other.nodes() {
            let (from, to) = match stepping_is_left {
                true => ((edge.from, o_id), (edge.to, o_id)),
                false => ((o_id, edge.from), (o_id, edge.to)),
            };
            out.add_edge(alloc, pairs[&from], pairs[&to], edge.label.clone());
        }
    }
}
