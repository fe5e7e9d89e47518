//! Edge-list ingestion and clustering output formats.

pub mod edgelist;
pub mod output;

pub use edgelist::{load_edges_from_path, parse_edges};
pub use output::{write_csv, write_tsv};
