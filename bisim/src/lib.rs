use lts::index::{Id as _, Interner};
use lts::{new_id, Label, Lts, Map, NodeId, Set};


new_id!(LabelId);
new_id!(SigId);

/// Colour of a node during partition refinement. `DEAD` is the distinguished
/// initial colour of δ-targets.
type Color = usize;

const DEAD: Color = usize::MAX;

/// One signature item: the node's own colour plus one outgoing transition,
/// or one of the two marker items (no outgoing edges, incoming δ).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SigItem {
    own: Color,
    target: Option<Color>,
    label: Option<LabelId>,
}

/// Partition refinement over the disjoint union of `ltss`: nodes are keyed
/// by (lts index, node id) so identifier collisions between independently
/// built graphs are harmless. Refinement stops when the number of distinct
/// signatures stops growing.
fn color_nodes(ltss: &[&Lts]) -> Map<(usize, NodeId), Color> {
    let mut labels: Interner<LabelId, Label> = Interner::default();

    let mut colors: Map<(usize, NodeId), Color> = Map::default();
    for (i, lts) in ltss.iter().enumerate() {
        let dead: Set<NodeId> =
            lts.edges().filter(|(_, e)| e.label.is_deadlock()).map(|(_, e)| e.to).collect();
        for (id, _) in lts.nodes() {
            colors.insert((i, id), if dead.contains(&id) { DEAD } else { 0 });
        }
    }
    let mut count = colors.values().collect::<Set<_>>().len();

    loop {
        let mut sigs: Interner<SigId, Vec<SigItem>> = Interner::default();
        let mut next: Map<(usize, NodeId), Color> = Map::default();

        for (i, lts) in ltss.iter().enumerate() {
            for (id, _) in lts.nodes() {
                let own = colors[&(i, id)];
                let mut items = Vec::new();
                for (_, e) in lts.outgoing(id) {
                    let label = labels.intern(e.label.clone());
                    let target = Some(colors[&(i, e.to)]);
                    items.push(SigItem { own, target, label: Some(label) });
                }
                if items.is_empty() {
                    items.push(SigItem { own, target: None, label: None });
                }
                if lts.incoming(id).any(|(_, e)| e.label.is_deadlock()) {
                    items.push(SigItem { own: DEAD, target: None, label: None });
                }
                // Each node contributes a set of items, not a multiset.
                items.sort_unstable();
                items.dedup();

                let sig = sigs.intern(items);
                next.insert((i, id), sig.to_usize());
            }
        }

        let grown = sigs.len() > count;
        count = sigs.len();
        colors = next;
        if !grown {
            return colors;
        }
    }
}

/// Quotient by strong bisimulation: nodes sharing a final colour are merged
/// onto the lowest-numbered id, then duplicate edges are collapsed. The
/// input is left untouched.
pub fn minimize(lts: &Lts) -> Lts {
    let mut out = lts.clone();
    let colors = color_nodes(&[&out]);

    let mut classes: Map<Color, Vec<NodeId>> = Map::default();
    for (id, _) in out.nodes() {
        classes.entry(colors[&(0, id)]).or_default().push(id);
    }
    for (_, mut ids) in classes {
        ids.sort_unstable();
        out.merge_nodes(&ids);
    }

    out.remove_duplicate_edges();
    out
}

/// Strong bisimilarity of two or more LTSs: colour the disjoint union, then
/// compare root colours. Rootless LTSs are only equivalent to each other.
pub fn equivalent(ltss: &[&Lts]) -> bool {
    let colors = color_nodes(ltss);
    let mut roots = ltss.iter().enumerate().map(|(i, lts)| lts.root().map(|r| colors[&(i, r)]));
    match roots.next() {
        Some(first) => roots.all(|color| color == first),
        None => true,
    }
}
