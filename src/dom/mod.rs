pub mod document;
pub mod snapshot;
pub mod tree;
