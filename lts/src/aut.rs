use std::fmt::{self, Write as _};

use anyhow::{bail, Context, Result};

use crate::graph::{IdAlloc, Lts, NodeId, Terminal};
use crate::label::{Act, Label, Mode, DELTA, TAU};
use crate::Map;

// aut_header        ::=  'des (' first_state ',' nr_of_transitions ',' nr_of_states ')'
// aut_edge          ::=  '(' start_state ',' '"' label '"' ',' end_state ')'
//
// States are numbered densely in insertion order with the root first, so the
// first state is always 0. Hidden and deadlock labels render as τ and δ.
pub fn write_aut(lts: &Lts, out: &mut impl fmt::Write) -> fmt::Result {
    let mut numbers: Map<NodeId, usize> = Map::default();
    if let Some(root) = lts.root() {
        numbers.insert(root, 0);
    }
    for (id, _) in lts.nodes() {
        let next = numbers.len();
        numbers.entry(id).or_insert(next);
    }

    writeln!(out, "des (0,{},{})", lts.edge_count(), lts.node_count())?;
    for (_, edge) in lts.edges() {
        writeln!(out, "({},\"{}\",{})", numbers[&edge.from], edge.label, numbers[&edge.to])?;
    }

    Ok(())
}

pub fn to_aut(lts: &Lts) -> String {
    let mut out = String::new();
    let _ = write_aut(lts, &mut out);
    out
}

/// Reads an LTS back from the `.aut` format, allocating fresh identifiers.
/// The first state of the header becomes the root and is tagged as start;
/// terminal tags are recovered from the edge structure.
pub fn parse_aut(alloc: &mut IdAlloc, source: &str) -> Result<Lts> {
    let mut lines = source.lines();

    let header = lines.next().context("File is empty")?;
    let header = header.strip_prefix("des").context("Expected 'des'")?;
    let header = header.trim().strip_prefix('(').context("Expected '('")?;
    let (first, header) = header.split_once(',').context("Expected first state")?;
    let (trans_count, header) = header.split_once(',').context("Expected transition count")?;
    let state_count = header.strip_suffix(')').context("Expected state count")?;

    let first = number(first, "first state")?;
    let trans_count = number(trans_count, "transition count")?;
    let state_count = number(state_count, "state count")?;

    let mut lts = Lts::new();
    let states: Vec<NodeId> = (0..state_count).map(|_| lts.add_node(alloc)).collect();
    let root = *states.get(first).with_context(|| format!("First state {first} doesn't exist"))?;
    lts.node_mut(root).meta.start = true;
    lts.set_root(Some(root));

    let mut parsed = 0usize;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let line = line.strip_prefix('(').context("Expected '('")?;
        let (from, line) = line.split_once(',').context("Expected start state")?;
        let (label, line) = match line.trim_start().strip_prefix('"') {
            Some(quoted) => {
                let (label, rest) = quoted.split_once('"').context("Expected closing '\"'")?;
                (label, rest.trim_start().strip_prefix(',').context("Expected ','")?)
            }
            None => line.split_once(',').context("Expected label")?,
        };
        let to = line.strip_suffix(')').context("Expected end state")?;

        let from = number(from, "start state")?;
        let to = number(to, "end state")?;
        let from = *states.get(from).with_context(|| format!("Start state {from} doesn't exist"))?;
        let to = *states.get(to).with_context(|| format!("End state {to} doesn't exist"))?;

        lts.add_edge(alloc, from, to, parse_label(label.trim()));
        parsed += 1;
    }

    if parsed != trans_count {
        bail!("Wrong number of transitions: got {parsed}, expected {trans_count}");
    }

    // δ destinations are deadlock sinks, the rest of the terminal tags
    // follow from the edge structure.
    let dead: Vec<NodeId> =
        lts.edges().filter(|(_, e)| e.label.is_deadlock()).map(|(_, e)| e.to).collect();
    for id in dead {
        lts.node_mut(id).meta.terminal = Some(Terminal::Error);
    }
    lts.refresh_terminals();

    Ok(lts)
}

fn number(text: &str, what: &str) -> Result<usize> {
    text.trim().parse().with_context(|| format!("Expected {what} to be a number"))
}

fn parse_label(label: &str) -> Label {
    if label == TAU {
        Label::Tau
    } else if label == DELTA {
        Label::Delta
    } else if let Some(name) = label.strip_prefix('!') {
        Label::Act(Act { name: name.to_string(), mode: Mode::Broadcast })
    } else if let Some(name) = label.strip_prefix('?') {
        Label::Act(Act { name: name.to_string(), mode: Mode::Listen })
    } else {
        Label::act(label)
    }
}
