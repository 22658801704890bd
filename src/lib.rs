// Cinematch: hybrid movie recommendations
//
// This is the library root. The catalog and similarity spaces are built once
// (artifacts, cache); the hybrid scorer then answers each query from them.

pub mod artifacts;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod output;
pub mod scoring;
pub mod session;
pub mod similarity;
pub mod status;
