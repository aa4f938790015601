pub mod classes;
pub mod extractor;
pub mod role;
pub mod text;
