//! Editing core for Steam Input layout files: runtime-ID indexing,
//! structural graph mutation, command-string rewriting, and safe file I/O.
//!
//! The pieces are coupled by contract, not shared state: a mutation
//! invalidates every runtime ID, so callers rebuild the index and run the
//! rewriter with the mutation's returned mapping before serializing.

pub mod index;
pub mod io;
pub mod mutate;
pub mod rewrite;

pub use index::{EntryKind, IndexEntry, RuntimeIndex};
pub use io::{load_layout, save_layout, write_backup};
pub use mutate::{
    DeleteReport, DuplicateReport, GroupCopy, delete_action_set, delete_layer, duplicate_layer,
};
pub use rewrite::{Command, IdMapping, RefToken, Verb, ids_to_titles, remap_ids, shift_layer_ids,
    titles_to_ids};
