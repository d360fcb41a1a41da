use lts::{IdAlloc, Label, Lts, Map, Terminal};
use thiserror::Error;

use crate::ast::{Model, Process, ProcessKind, Span};

/// Interpreter failure, distinct from a syntax error. Carries the source
/// span of the offending construct; the driver resolves it to line/column.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterpError {
    #[error("unknown definition {name}")]
    UnknownDefinition { name: String, span: Span },
    #[error("definition {name} refers to itself; recursive processes are not supported")]
    RecursiveDefinition { name: String, span: Span },
    #[error("duplicate definition {name}")]
    DuplicateDefinition { name: String, span: Span },
}

impl InterpError {
    pub fn span(&self) -> &Span {
        match self {
            InterpError::UnknownDefinition { span, .. } => span,
            InterpError::RecursiveDefinition { span, .. } => span,
            InterpError::DuplicateDefinition { span, .. } => span,
        }
    }
}

/// Expands the definitions of one model into concrete LTSs, left to right,
/// resolving name references to the definitions built before them.
pub fn interpret(alloc: &mut IdAlloc, model: &Model) -> Result<Map<String, Lts>, InterpError> {
    let mut interp = Interp { alloc, defs: Map::default() };

    for def in &model.definitions {
        if interp.defs.contains_key(&def.name) {
            return Err(InterpError::DuplicateDefinition {
                name: def.name.clone(),
                span: def.span.clone(),
            });
        }

        let mut lts = interp.eval(&def.name, &def.body)?;
        if let Some(hide) = &model.hide {
            let actions = hide.actions.iter().map(|act| act.name.clone()).collect();
            lts = ops::hide(&lts, &actions);
        }
        lts.refresh_terminals();

        interp.defs.insert(def.name.clone(), lts);
    }

    Ok(interp.defs)
}

struct Interp<'a> {
    alloc: &'a mut IdAlloc,
    defs: Map<String, Lts>,
}

impl Interp<'_> {
    /// Builds the LTS of one process body. Every constructed LTS has a root
    /// tagged as start node.
    fn eval(&mut self, current: &str, proc: &Process) -> Result<Lts, InterpError> {
        match &proc.kind {
            ProcessKind::Stop => Ok(self.terminal(Terminal::Stop)),
            ProcessKind::Error => {
                let mut lts = self.terminal(Terminal::Error);
                // The deadlock is recorded as a δ self-loop.
                let root = lts.root().expect("terminal process has a root");
                lts.add_edge(self.alloc, root, root, Label::Delta);
                Ok(lts)
            }
            ProcessKind::Sequence(act, cont) => {
                let mut lts = self.eval(current, cont)?;
                let old_root = lts.root().expect("constructed process has a root");
                let root = lts.add_node(self.alloc);
                lts.node_mut(root).meta.start = true;
                lts.node_mut(old_root).meta.start = false;
                lts.add_edge(self.alloc, root, old_root, Label::Act(act.clone()));
                lts.set_root(Some(root));
                Ok(lts)
            }
            ProcessKind::Choice(p, q) => {
                let mut lts = self.eval(current, p)?;
                let other = self.eval(current, q)?;
                let root = lts.root().expect("constructed process has a root");
                let other_root = other.root().expect("constructed process has a root");
                lts.combine_with(&other);
                lts.merge_nodes(&[root, other_root]);
                Ok(lts)
            }
            ProcessKind::Parallel(p, q) => {
                let left = self.eval(current, p)?;
                let right = self.eval(current, q)?;
                Ok(ops::parallel(self.alloc, &left, &right))
            }
            ProcessKind::Name(name) => {
                if name == current {
                    return Err(InterpError::RecursiveDefinition {
                        name: name.clone(),
                        span: proc.span.clone(),
                    });
                }
                match self.defs.get(name) {
                    // Each reference is an independent copy with fresh ids.
                    Some(lts) => Ok(lts.clone_with(self.alloc)),
                    None => Err(InterpError::UnknownDefinition {
                        name: name.clone(),
                        span: proc.span.clone(),
                    }),
                }
            }
        }
    }

    fn terminal(&mut self, terminal: Terminal) -> Lts {
        let mut lts = Lts::new();
        let node = lts.add_node(self.alloc);
        lts.node_mut(node).meta.start = true;
        lts.node_mut(node).meta.terminal = Some(terminal);
        lts.set_root(Some(node));
        lts
    }
}
