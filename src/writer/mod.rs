//! Output emitters for the command line tool.
pub mod json;
