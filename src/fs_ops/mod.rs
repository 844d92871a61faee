//! Filesystem operations: single-file moves, the tree walk and empty-directory cleanup.

mod atomic;
mod cleanup;
mod copy;
mod file_move;
mod helpers;
mod meta;
mod plan;
mod tree;
mod util;

pub use cleanup::{is_effectively_empty, remove_empty_tree};
pub use copy::safe_copy_and_rename;
pub use file_move::{MoveKind, MoveOutcome, classify, move_file};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use tree::{TraversalResult, TreeWalker};
