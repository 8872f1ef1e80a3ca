//! Contact-to-roster matching engine.
//!
//! Names are normalized, the roster is indexed by word, and each contact is
//! scored against the roster rows it shares words with. Nothing here touches
//! files; see `crate::io` for reading and writing tables.

pub mod assemble;
pub mod enrich;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod records;
pub mod run;
pub mod score;
pub mod similarity;

pub use run::run_matching;
