// Similarity spaces — the two movie × movie matrices the scorer blends.

pub mod collaborative;
pub mod content;
pub mod matrix;
