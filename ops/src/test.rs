use lts::{IdAlloc, Label, Lts, NodeId, Set, Terminal};

use crate::{abstraction, hide, parallel};

fn actions(names: &[&str]) -> Set<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn edge_list(lts: &Lts) -> Vec<(NodeId, Label, NodeId)> {
    lts.edges().map(|(_, e)| (e.from, e.label.clone(), e.to)).collect()
}

/// root -a-> mid -b-> stop
fn chain_ab(alloc: &mut IdAlloc) -> Lts {
    let mut lts = Lts::new();
    let root = lts.add_node(alloc);
    let mid = lts.add_node(alloc);
    let stop = lts.add_node(alloc);
    lts.node_mut(root).meta.start = true;
    lts.node_mut(stop).meta.terminal = Some(Terminal::Stop);
    lts.add_edge(alloc, root, mid, Label::act("a"));
    lts.add_edge(alloc, mid, stop, Label::act("b"));
    lts.set_root(Some(root));
    lts
}

/// root -a-> stop
fn single_action(alloc: &mut IdAlloc, name: &str) -> Lts {
    let mut lts = Lts::new();
    let root = lts.add_node(alloc);
    let stop = lts.add_node(alloc);
    lts.node_mut(root).meta.start = true;
    lts.node_mut(stop).meta.terminal = Some(Terminal::Stop);
    lts.add_edge(alloc, root, stop, Label::act(name));
    lts.set_root(Some(root));
    lts
}

/// A single start node over the empty alphabet.
fn unit(alloc: &mut IdAlloc) -> Lts {
    let mut lts = Lts::new();
    let root = lts.add_node(alloc);
    lts.node_mut(root).meta.start = true;
    lts.node_mut(root).meta.terminal = Some(Terminal::Stop);
    lts.set_root(Some(root));
    lts
}

#[test]
fn hide_relabels_and_strips_prefixes() {
    let mut alloc = IdAlloc::new();
    let mut lts = Lts::new();
    let a = lts.add_node(&mut alloc);
    let b = lts.add_node(&mut alloc);
    lts.add_edge(&mut alloc, a, b, Label::act("x"));
    lts.add_edge(&mut alloc, a, b, Label::Act(lts::Act { name: "y".to_string(), mode: lts::Mode::Broadcast }));
    lts.add_edge(&mut alloc, a, b, Label::act("z"));
    lts.set_root(Some(a));

    let hidden = hide(&lts, &actions(&["x", "y"]));

    let labels: Vec<_> = hidden.edges().map(|(_, e)| e.label.clone()).collect();
    assert_eq!(labels, vec![Label::Tau, Label::Tau, Label::act("z")]);
    // The input is untouched.
    assert!(lts.edges().all(|(_, e)| !e.label.is_hidden()));
}

#[test]
fn hide_is_monotone() {
    let mut alloc = IdAlloc::new();
    let mut lts = Lts::new();
    let n = lts.add_node(&mut alloc);
    let m = lts.add_node(&mut alloc);
    lts.add_edge(&mut alloc, n, m, Label::act("a"));
    lts.add_edge(&mut alloc, n, m, Label::act("b"));
    lts.add_edge(&mut alloc, n, m, Label::act("c"));
    lts.set_root(Some(n));

    let twice = hide(&hide(&lts, &actions(&["a"])), &actions(&["b"]));
    let once = hide(&lts, &actions(&["a", "b"]));

    assert_eq!(edge_list(&twice), edge_list(&once));
}

#[test]
fn parallel_synchronises_shared_actions() {
    let mut alloc = IdAlloc::new();
    let left = single_action(&mut alloc, "a");
    let right = single_action(&mut alloc, "a");

    let prod = parallel(&mut alloc, &left, &right);

    assert_eq!(prod.node_count(), 2);
    assert_eq!(prod.edge_count(), 1);
    let root = prod.root().unwrap();
    assert!(prod.node(root).meta.parallel);
    assert!(prod.node(root).meta.start);
    let (_, edge) = prod.edges().next().unwrap();
    assert_eq!(edge.label, Label::act("a"));
    assert_eq!(edge.from, root);
    assert_eq!(prod.node(edge.to).meta.terminal, Some(Terminal::Stop));
}

#[test]
fn parallel_interleaves_independent_actions() {
    let mut alloc = IdAlloc::new();
    let left = single_action(&mut alloc, "a");
    let right = single_action(&mut alloc, "b");

    let prod = parallel(&mut alloc, &left, &right);

    assert_eq!(prod.node_count(), 4);
    assert_eq!(prod.edge_count(), 4);
    let alphabet = prod.alphabet();
    assert!(alphabet.contains(&Label::act("a")) && alphabet.contains(&Label::act("b")));
}

#[test]
fn parallel_identity() {
    let mut alloc = IdAlloc::new();
    let g = chain_ab(&mut alloc);
    let one = unit(&mut alloc);

    let prod = parallel(&mut alloc, &g, &one);

    assert!(bisim::equivalent(&[&g, &prod]));
}

#[test]
fn parallel_commutes_up_to_bisimilarity() {
    let mut alloc = IdAlloc::new();
    let g1 = chain_ab(&mut alloc);
    let g2 = single_action(&mut alloc, "a");

    let p12 = parallel(&mut alloc, &g1, &g2);
    let p21 = parallel(&mut alloc, &g2, &g1);

    assert!(bisim::equivalent(&[&p12, &p21]));
}

#[test]
fn parallel_does_not_mutate_inputs() {
    let mut alloc = IdAlloc::new();
    let g1 = chain_ab(&mut alloc);
    let g2 = single_action(&mut alloc, "a");
    let before1 = edge_list(&g1);
    let before2 = edge_list(&g2);

    let mut prod = parallel(&mut alloc, &g1, &g2);
    let sink = prod.add_node(&mut alloc);
    let root = prod.root().unwrap();
    prod.add_edge(&mut alloc, root, sink, Label::act("fresh"));

    assert_eq!(edge_list(&g1), before1);
    assert_eq!(edge_list(&g2), before2);
}

#[test]
fn fair_abstraction_removes_all_tau_edges() {
    let mut alloc = IdAlloc::new();
    let mut lts = single_action(&mut alloc, "tick");
    let extra = lts.add_node(&mut alloc);
    let root = lts.root().unwrap();
    lts.add_edge(&mut alloc, root, extra, Label::Tau);
    lts.add_edge(&mut alloc, extra, root, Label::Tau);

    let out = abstraction(&mut alloc, &lts, true);

    assert!(out.edges().all(|(_, e)| !e.label.is_hidden()));
    assert!(lts.edges().any(|(_, e)| e.label.is_hidden()));
}

#[test]
fn fair_abstraction_of_single_tau_step() {
    let mut alloc = IdAlloc::new();
    let mut lts = Lts::new();
    let root = lts.add_node(&mut alloc);
    let stop = lts.add_node(&mut alloc);
    lts.node_mut(root).meta.start = true;
    lts.node_mut(stop).meta.terminal = Some(Terminal::Stop);
    lts.add_edge(&mut alloc, root, stop, Label::Tau);
    lts.set_root(Some(root));

    let out = abstraction(&mut alloc, &lts, true);

    assert_eq!(out.node_count(), 1);
    assert_eq!(out.edge_count(), 0);
    let root = out.root().unwrap();
    assert_eq!(out.node(root).meta.terminal, Some(Terminal::Stop));
}

#[test]
fn fair_abstraction_preserves_observable_behaviour() {
    let mut alloc = IdAlloc::new();
    let mut lts = Lts::new();
    let r = lts.add_node(&mut alloc);
    let u = lts.add_node(&mut alloc);
    let v = lts.add_node(&mut alloc);
    let s = lts.add_node(&mut alloc);
    lts.add_edge(&mut alloc, r, u, Label::act("a"));
    lts.add_edge(&mut alloc, u, v, Label::Tau);
    lts.add_edge(&mut alloc, v, s, Label::act("b"));
    lts.set_root(Some(r));

    let out = abstraction(&mut alloc, &lts, true);

    let edges = edge_list(&out);
    assert!(edges.contains(&(r, Label::act("a"), u)));
    assert!(edges.contains(&(r, Label::act("a"), v)));
    assert!(edges.contains(&(u, Label::act("b"), s)));
    assert!(edges.contains(&(v, Label::act("b"), s)));
    assert!(out.edges().all(|(_, e)| !e.label.is_hidden()));
}

#[test]
fn unfair_abstraction_turns_self_loop_into_deadlock() {
    let mut alloc = IdAlloc::new();
    let mut lts = single_action(&mut alloc, "a");
    let root = lts.root().unwrap();
    lts.add_edge(&mut alloc, root, root, Label::Tau);

    let out = abstraction(&mut alloc, &lts, false);

    assert!(out.edges().all(|(_, e)| !e.label.is_hidden()));
    let (_, delta) = out.edges().find(|(_, e)| e.label.is_deadlock()).unwrap();
    assert_eq!(delta.from, out.root().unwrap());
    assert_eq!(out.node(delta.to).meta.terminal, Some(Terminal::Error));
    // The observable edge is still there.
    assert!(out.edges().any(|(_, e)| e.label == Label::act("a")));
}

#[test]
fn unfair_abstraction_detects_longer_tau_cycles() {
    let mut alloc = IdAlloc::new();
    let mut lts = Lts::new();
    let u = lts.add_node(&mut alloc);
    let v = lts.add_node(&mut alloc);
    let s = lts.add_node(&mut alloc);
    lts.node_mut(s).meta.terminal = Some(Terminal::Stop);
    lts.add_edge(&mut alloc, u, v, Label::Tau);
    lts.add_edge(&mut alloc, v, u, Label::Tau);
    lts.add_edge(&mut alloc, u, s, Label::act("a"));
    lts.set_root(Some(u));

    let out = abstraction(&mut alloc, &lts, false);

    assert!(out.edges().all(|(_, e)| !e.label.is_hidden()));
    assert!(out.edges().any(|(_, e)| e.label.is_deadlock()));
    assert!(out
        .nodes()
        .any(|(_, n)| n.meta.terminal == Some(Terminal::Error)));
}
