//! View Engine - Records and the arena that owns them.
//!
//! The engine manages the core data structures:
//! - Records: View, Container, Decoration, Node Descriptor, Template, Context
//! - Tree: arena allocation plus the mutation surface the renderer drives
//! - Scheduler: the capability root contexts run deferred work through
//!
//! # Architecture
//!
//! Views are NOT object graphs. They are handles into arenas:
//!
//! ```text
//! view#0: Root       (parent=-,           slots=[node#1, container#0])
//! view#1: Embedded   (parent=container#0, decl=view#0, slots=[node#7])
//! view#2: Embedded   (parent=container#0, decl=view#0, slots=[node#8])
//! ```
//!
//! Every cross-record reference is a `Copy` handle, so walking the tree never
//! fights the borrow checker and detached records stay addressable.

mod records;
mod scheduler;
mod tree;

pub use records::*;
pub use scheduler::*;
pub use tree::ViewTree;
pub(crate) use tree::HopGuard;
