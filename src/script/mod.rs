//! Brace-structured script front end: text → tokens → concrete node tree.
//!
//! The tree is handed to the material/overlay/compositor translators,
//! which walk it to pull out object declarations, `:` inheritance clauses
//! and property argument lists.
pub mod concrete;
pub mod error;
pub mod lexer;
pub mod parser;

pub use concrete::{ConcreteNode, ConcreteNodeKind, ConcreteTree, NodeId};
pub use error::ScriptError;
pub use lexer::{Token, TokenKind};

use log::debug;

/// Tokenizes and parses one script file.
pub fn compile(source: &str, file: &str) -> Result<ConcreteTree, ScriptError> {
    let tokens = lexer::tokenize(source, file);
    debug!("{file}: {} tokens", tokens.len());

    let tree = parser::parse(&tokens)?;
    debug!("{file}: {} nodes, {} roots", tree.len(), tree.roots().len());
    Ok(tree)
}
