//! Errors raised while turning script text into a concrete node tree.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// `import` clause is missing its target, `from` slot or source.
    #[error("{file}({line}): expected import {expected}")]
    MalformedImport {
        file: String,
        line: u32,
        expected: &'static str,
    },

    /// A token that is not allowed where it appeared.
    #[error("{file}({line}): unexpected token `{lexeme}`")]
    UnexpectedToken {
        file: String,
        line: u32,
        lexeme: String,
    },
}

impl ScriptError {
    pub fn line(&self) -> u32 {
        match self {
            ScriptError::MalformedImport { line, .. } | ScriptError::UnexpectedToken { line, .. } => {
                *line
            }
        }
    }
}
