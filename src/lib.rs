#[cfg(not(target_endian = "little"))]
compile_error!("wakachi requires a little-endian platform");

pub mod config;
pub mod cost;
pub mod dict;
pub mod lattice;
#[cfg(test)]
pub(crate) mod testutil;
pub mod token;
pub mod tokenizer;
pub mod unicode;
pub mod viterbi;

pub use config::TokenizerConfig;
pub use token::Token;
pub use tokenizer::{Tokenizer, TokenizeError};
