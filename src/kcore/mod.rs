//! Linear-time k-core decomposition (Batagelj–Zaveršnik bucket peeling).

mod decompose;

pub use decompose::{decompose, decompose_with, KCoreDecomposition};
