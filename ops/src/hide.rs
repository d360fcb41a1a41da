use lts::{Label, Lts, Set};

/// Returns a clone in which every edge whose action is in `actions` is
/// relabelled τ. Broadcast/listen prefixes are stripped before the
/// comparison, so hiding `a` hides `!a` and `?a` as well.
pub fn hide(lts: &Lts, actions: &Set<String>) -> Lts {
    let mut out = lts.clone();

    let hidden: Vec<_> = out
        .edges()
        .filter(|(_, e)| e.label.bare_name().is_some_and(|name| actions.contains(name)))
        .map(|(id, _)| id)
        .collect();
    for id in hidden {
        out.relabel_edge(id, Label::Tau);
    }

    out
}
