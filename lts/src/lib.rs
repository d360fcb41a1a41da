pub mod aut;
pub mod graph;
pub mod index;
pub mod label;


pub use graph::{Edge, EdgeId, IdAlloc, Lts, MetaData, Node, NodeId, Terminal};
pub use label::{Act, Label, Mode};

pub type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
pub type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
