//! Dependency contexts for word embeddings
//!
//! Turns dependency-parsed sentences (CoNLL) into the `word<TAB>context` pairs and the word and
//! context vocabularies that word2vecf trains on. The binaries in `src/bin` each run one stage;
//! `dc-pipeline` runs them all.

#[macro_use] extern crate log;

pub mod errors;
pub mod counts;
pub mod conll;
pub mod tree;
pub mod contexts;
pub mod vocab;
pub mod config;
pub mod trainer;
pub mod numpy;
pub mod vectors;
pub mod pipeline;
