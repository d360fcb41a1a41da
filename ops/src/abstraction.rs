use lts::{EdgeId, IdAlloc, Label, Lts, NodeId, Set, Terminal};

/// Weak abstraction: removes hidden τ transitions while preserving
/// observable behaviour.
///
/// For every τ edge `u -τ-> v` of the input, the observable in-edges of `u`
/// are copied onto every node in the forward τ-closure of `v`, and the
/// observable out-edges of `v` are copied onto every node in the backward
/// τ-closure of `u`. A τ cycle found during either walk records a τ
/// self-loop on the revisited node.
///
/// The fair variant treats τ cycles as progressing and deletes every τ edge.
/// The unfair variant deletes the enumerated τ edges, materialises the
/// recorded self-loops, and replaces every τ self-loop then present with a δ
/// edge to a fresh error sink.
pub fn abstraction(alloc: &mut IdAlloc, lts: &Lts, fair: bool) -> Lts {
    let mut out = lts.clone();

    let tau_edges: Vec<(EdgeId, NodeId, NodeId)> = out
        .edges()
        .filter(|(_, e)| e.label.is_hidden())
        .map(|(id, e)| (id, e.from, e.to))
        .collect();

    // Collected observable copies and τ self-loops; a set, so one edge is
    // recorded once no matter how many walks reach it.
    let mut collected: Set<(NodeId, Label, NodeId)> = Set::default();

    for &(_, u, v) in &tau_edges {
        let incoming: Vec<(NodeId, Label)> = out
            .incoming(u)
            .filter(|(_, e)| !e.label.is_hidden())
            .map(|(_, e)| (e.from, e.label.clone()))
            .collect();
        let outgoing: Vec<(Label, NodeId)> = out
            .outgoing(v)
            .filter(|(_, e)| !e.label.is_hidden())
            .map(|(_, e)| (e.label.clone(), e.to))
            .collect();

        // Forward τ-closure of v.
        let mut visited = Set::default();
        visited.insert(v);
        let mut stack = vec![v];
        while let Some(w) = stack.pop() {
            for (x, label) in &incoming {
                collected.insert((*x, label.clone(), w));
            }
            for (_, e) in out.outgoing(w).filter(|(_, e)| e.label.is_hidden()) {
                if visited.insert(e.to) {
                    stack.push(e.to);
                } else {
                    collected.insert((e.to, Label::Tau, e.to));
                }
            }
        }

        // Backward τ-closure of u.
        let mut visited = Set::default();
        visited.insert(u);
        let mut stack = vec![u];
        while let Some(w) = stack.pop() {
            for (label, x) in &outgoing {
                collected.insert((w, label.clone(), *x));
            }
            for (_, e) in out.incoming(w).filter(|(_, e)| e.label.is_hidden()) {
                if visited.insert(e.from) {
                    stack.push(e.from);
                } else {
                    collected.insert((e.from, Label::Tau, e.from));
                }
            }
        }
    }

    // Delete before materialising, so a recorded self-loop replaces a
    // deleted input self-loop instead of being dropped as a duplicate.
    for &(id, _, _) in &tau_edges {
        out.remove_edge(id);
    }

    for (from, label, to) in collected {
        if fair && label.is_hidden() {
            continue;
        }
        let present = out.edges().any(|(_, e)| e.from == from && e.to == to && e.label == label);
        if !present {
            out.add_edge(alloc, from, to, label);
        }
    }

    if !fair {
        // Any τ self-loop still present is an unescapable internal cycle:
        // make the deadlock explicit with a δ edge to a fresh error sink.
        let loops: Vec<(EdgeId, NodeId)> = out
            .edges()
            .filter(|(_, e)| e.label.is_hidden() && e.from == e.to)
            .map(|(id, e)| (id, e.from))
            .collect();
        for (id, n) in loops {
            out.remove_edge(id);
            let sink = out.add_node(alloc);
            out.node_mut(sink).meta.terminal = Some(Terminal::Error);
            out.add_edge(alloc, n, sink, Label::Delta);
        }
    }

    out.refresh_terminals();
    out.trim();
    out
}
