//! Parser that consumes lexer tokens and builds a `ConcreteTree`.
//!
//! A two-state machine.  In `Ready` we expect the start of a statement:
//! an `import`, the `set` keyword, a closing brace or the word that opens
//! an object/property.  In `Object` we collect the rest of that statement;
//! a newline that is not followed by `{` ends it as a property, a `{`
//! turns it into a block.

use log::trace;

use super::concrete::{ConcreteNode, ConcreteNodeKind, ConcreteTree, NodeId};
use super::error::ScriptError;
use super::lexer::{Token, TokenKind};

/// Builds the concrete node tree for a full script.
pub fn parse(tokens: &[Token]) -> Result<ConcreteTree, ScriptError> {
    let mut p = Parser::new(tokens);
    p.parse()?;
    Ok(p.tree)
}

/// Parses a flat parameter list: every word, quote and variable becomes a
/// root node.  Any other token is an error.
pub fn parse_chunk(tokens: &[Token]) -> Result<ConcreteTree, ScriptError> {
    let mut tree = ConcreteTree::new();

    for token in tokens {
        match token.kind {
            TokenKind::Variable | TokenKind::Word | TokenKind::Quote => {
                let kind = node_kind(token);
                tree.insert(ConcreteNode::from_token(token, kind), None);
            }
            TokenKind::End => break,
            _ => return Err(unexpected(token)),
        }
    }

    Ok(tree)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Ready,
    Object,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    tree: ConcreteTree,
    parent: Option<NodeId>,
    state: ParserState,
}

fn node_kind(token: &Token) -> ConcreteNodeKind {
    match token.kind {
        TokenKind::Variable => ConcreteNodeKind::Variable,
        TokenKind::Quote => ConcreteNodeKind::Quote,
        _ => ConcreteNodeKind::Word,
    }
}

fn unexpected(token: &Token) -> ScriptError {
    ScriptError::UnexpectedToken {
        file: token.file.clone(),
        line: token.line,
        lexeme: token.lexeme.clone(),
    }
}

fn malformed_import(at: &Token, expected: &'static str) -> ScriptError {
    ScriptError::MalformedImport {
        file: at.file.clone(),
        line: at.line,
        expected,
    }
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: ConcreteTree::new(),
            parent: None,
            state: ParserState::Ready,
        }
    }

    fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn peek_kind(&self, at: usize) -> Option<TokenKind> {
        self.tokens.get(at).map(|t| t.kind)
    }

    /// Index of the first token at or after `from` that is not a newline.
    fn past_newlines(&self, from: usize) -> usize {
        let mut at = from;
        while self.peek_kind(at) == Some(TokenKind::Newline) {
            at += 1;
        }
        at
    }

    fn insert(&mut self, token: &Token, kind: ConcreteNodeKind) -> NodeId {
        self.tree
            .insert(ConcreteNode::from_token(token, kind), self.parent)
    }

    fn ascend(&mut self) {
        if let Some(p) = self.parent {
            self.parent = self.tree[p].parent;
        }
    }

    /// Leaves the block (or statement) the parser is currently inside.
    fn pop_scope(&mut self) {
        self.ascend();
    }

    /// Leaves the object that declared the block just closed.
    fn pop_object(&mut self) {
        self.ascend();
    }

    fn parent_is_nested_brace(&self) -> bool {
        self.parent
            .map(|p| &self.tree[p])
            .is_some_and(|n| n.kind == ConcreteNodeKind::LeftBrace && n.parent.is_some())
    }

    fn parse(&mut self) -> Result<(), ScriptError> {
        while let Some(token) = self.next_token() {
            trace!(
                "{:?}: {:?} `{}` at {}:{}",
                self.state, token.kind, token.lexeme, token.file, token.line
            );

            if token.kind == TokenKind::End {
                break;
            }

            match self.state {
                ParserState::Ready => self.parse_ready(token)?,
                ParserState::Object => self.parse_object(token)?,
            }
        }
        Ok(())
    }

    fn parse_ready(&mut self, token: &'a Token) -> Result<(), ScriptError> {
        match token.kind {
            TokenKind::Word if token.lexeme == "import" => self.parse_import(token)?,
            // recognised keyword, no node
            TokenKind::Word if token.lexeme == "set" => {}
            TokenKind::Word | TokenKind::Quote | TokenKind::Variable => {
                let id = self.insert(token, node_kind(token));
                self.parent = Some(id);
                self.state = ParserState::Object;
            }
            TokenKind::RightBrace => {
                self.pop_scope();
                self.insert(token, ConcreteNodeKind::RightBrace);
                self.pop_object();
            }
            TokenKind::Unknown => return Err(unexpected(token)),
            TokenKind::Newline | TokenKind::LeftBrace | TokenKind::Colon | TokenKind::End => {}
        }
        Ok(())
    }

    fn parse_object(&mut self, token: &'a Token) -> Result<(), ScriptError> {
        match token.kind {
            TokenKind::Newline => {
                // a property unless the statement continues with a block
                let next = self.past_newlines(self.pos);
                if self.peek_kind(next) != Some(TokenKind::LeftBrace) {
                    self.pop_object();
                    self.state = ParserState::Ready;
                }
            }
            TokenKind::Colon => {
                let colon = self.insert(token, ConcreteNodeKind::Colon);
                let next = self.past_newlines(self.pos);
                if let Some(base) = self
                    .tokens
                    .get(next)
                    .filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Quote))
                {
                    self.pos = next + 1;
                    self.tree
                        .insert(ConcreteNode::from_token(base, node_kind(base)), Some(colon));
                }
            }
            TokenKind::LeftBrace => {
                let id = self.insert(token, ConcreteNodeKind::LeftBrace);
                self.parent = Some(id);
                self.state = ParserState::Ready;
            }
            TokenKind::RightBrace => {
                self.pop_scope();
                if self.parent_is_nested_brace() {
                    self.pop_scope();
                }
                self.insert(token, ConcreteNodeKind::RightBrace);
                self.pop_object();
                self.state = ParserState::Ready;
            }
            TokenKind::Variable | TokenKind::Quote | TokenKind::Word => {
                self.insert(token, node_kind(token));
            }
            TokenKind::Unknown => return Err(unexpected(token)),
            TokenKind::End => {}
        }
        Ok(())
    }

    /// `import <target> from <source>`.  The `from` slot is skipped
    /// without looking at its text.
    fn parse_import(&mut self, keyword: &'a Token) -> Result<(), ScriptError> {
        let target = self.expect_identifier(keyword, "target")?;

        match self.next_token() {
            Some(t) if t.kind != TokenKind::End => {}
            Some(t) => return Err(malformed_import(t, "`from`")),
            None => return Err(malformed_import(keyword, "`from`")),
        }

        let source = self.expect_identifier(keyword, "source")?;

        let import = self
            .tree
            .insert(ConcreteNode::from_token(keyword, ConcreteNodeKind::Import), self.parent);
        self.tree
            .insert(ConcreteNode::from_token(target, node_kind(target)), Some(import));
        self.tree
            .insert(ConcreteNode::from_token(source, node_kind(source)), Some(import));

        self.pos = self.past_newlines(self.pos);
        Ok(())
    }

    fn expect_identifier(
        &mut self,
        keyword: &'a Token,
        expected: &'static str,
    ) -> Result<&'a Token, ScriptError> {
        match self.next_token() {
            Some(t) if matches!(t.kind, TokenKind::Word | TokenKind::Quote) => Ok(t),
            Some(t) => Err(malformed_import(t, expected)),
            None => Err(malformed_import(keyword, expected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::lexer::tokenize;

    /// `token(child child …)` in document order, roots separated by `;`.
    fn render(tree: &ConcreteTree) -> String {
        fn node(tree: &ConcreteTree, id: NodeId) -> String {
            let n = &tree[id];
            if n.children.is_empty() {
                n.token.clone()
            } else {
                let kids: Vec<_> = n.children.iter().map(|c| node(tree, *c)).collect();
                format!("{}({})", n.token, kids.join(" "))
            }
        }
        tree.roots()
            .iter()
            .map(|r| node(tree, *r))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn run(src: &str) -> Parser<'static> {
        let tokens: &'static [Token] = Box::leak(tokenize(src, "test.material").into_boxed_slice());
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap();
        parser
    }

    #[test]
    fn test_parse_trees() {
        let test_cases = vec![
            ("Foo { bar 1 2 3 }", "Foo({(bar(1 2 3)) })"),
            (
                "material Foo : Base\n{\n  technique\n  {\n  }\n}\n",
                "material(Foo :(Base) {(technique({ })) })",
            ),
            (
                "pass\n{\n  ambient 1 1 1\n  diffuse $d\n}",
                "pass({(ambient(1 1 1) diffuse($d)) })",
            ),
            (
                "texture_unit \"my unit\"\n{\n  texture \"a b.png\"\n}",
                "texture_unit(my unit {(texture(a b.png)) })",
            ),
            ("a\nb\n", "a; b"),
            ("set $x 1\n", "$x(1)"),
        ];

        for (src, expected) in test_cases {
            let parser = run(src);
            assert_eq!(render(&parser.tree), expected, "source: {src:?}");
            assert_eq!(parser.parent, None, "source: {src:?}");
        }
    }

    #[test]
    fn test_colon_base_is_optional() {
        let parser = run("a : \n{\n}\n");
        assert_eq!(render(&parser.tree), "a(: { })");
        assert_eq!(parser.parent, None);

        let a = parser.tree.roots()[0];
        let colon = parser.tree[a].children[0];
        assert_eq!(parser.tree[colon].kind, ConcreteNodeKind::Colon);
        assert!(parser.tree[colon].children.is_empty());
    }

    #[test]
    fn test_colon_base_may_follow_newlines() {
        let test_cases = vec![
            ("x :\nfoo 1\n", "x(:(foo) 1)"),
            ("x :\n\n\"Base Mat\"\n{\n}\n", "x(:(Base Mat) { })"),
        ];

        for (src, expected) in test_cases {
            let parser = run(src);
            assert_eq!(render(&parser.tree), expected, "source: {src:?}");
            assert_eq!(parser.parent, None, "source: {src:?}");
        }
    }

    #[test]
    fn test_balanced_braces_return_to_root() {
        let sources = [
            "a { b { c { d } } }",
            "a\n{\n  b\n  {\n    c 1\n  }\n}\n",
            "a { }\nb { c\n}\n",
            "x : y\n\n\n{\n}\n",
        ];

        for src in sources {
            assert_eq!(run(src).parent, None, "source: {src:?}");
        }
    }

    #[test]
    fn test_object_right_brace_pops_twice() {
        // The inner `}` follows a property, so it exits both the inner
        // brace and the object `b` that declared it.
        let parser = run("a { b { c }");
        let parent = parser.parent.expect("still inside a");
        assert_eq!(parser.tree[parent].kind, ConcreteNodeKind::LeftBrace);

        let owner = parser.tree[parent].parent.expect("brace belongs to a");
        assert_eq!(parser.tree[owner].token, "a");

        let b = parser.tree[parent].children[0];
        let b_children: Vec<_> = parser.tree.children(b).map(|n| n.kind).collect();
        assert_eq!(
            b_children,
            vec![ConcreteNodeKind::LeftBrace, ConcreteNodeKind::RightBrace]
        );
    }

    #[test]
    fn test_ready_right_brace_pops_once_each_side() {
        let parser = run("a {\n b {\n }\n");
        let parent = parser.parent.expect("still inside a");
        assert_eq!(parser.tree[parent].kind, ConcreteNodeKind::LeftBrace);
        assert_eq!(parser.tree[parser.tree[parent].parent.unwrap()].token, "a");
    }

    #[test]
    fn test_unbalanced_input_is_not_rejected() {
        assert!(run("a {").parent.is_some());
        assert_eq!(render(&run("}").tree), "}");
    }

    #[test]
    fn test_parse_import() {
        let tree = parse(&tokenize("import \"A\" from \"B\"\n\n", "t")).unwrap();
        assert_eq!(tree.roots().len(), 1);

        let import = &tree[tree.roots()[0]];
        assert_eq!(import.kind, ConcreteNodeKind::Import);
        let children: Vec<_> = tree
            .children(tree.roots()[0])
            .map(|n| (n.kind, n.token.as_str()))
            .collect();
        assert_eq!(
            children,
            vec![
                (ConcreteNodeKind::Quote, "A"),
                (ConcreteNodeKind::Quote, "B")
            ]
        );

        // the `from` slot is not checked
        let tree = parse(&tokenize("import * whatever base.material\nm {}", "t")).unwrap();
        assert_eq!(render(&tree), "import(* base.material); m({ })");
    }

    #[test]
    fn test_malformed_import() {
        let test_cases = vec![
            ("import", 1, "target"),
            ("import\nA from B", 1, "target"),
            ("import A", 1, "`from`"),
            ("\nimport A from", 2, "source"),
            ("import A from {", 1, "source"),
        ];

        for (src, line, expected) in test_cases {
            let err = parse(&tokenize(src, "bad.material")).unwrap_err();
            assert_eq!(
                err,
                ScriptError::MalformedImport {
                    file: "bad.material".into(),
                    line,
                    expected,
                },
                "source: {src:?}"
            );
        }
    }

    #[test]
    fn test_unknown_token_is_fatal() {
        let err = parse(&tokenize("a\nb \"oops\n", "t")).unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("\"oops"), "got: {err}");
    }

    #[test]
    fn test_parse_chunk() {
        let tree = parse_chunk(&tokenize("1 \"two words\" $three", "t")).unwrap();
        let roots: Vec<_> = tree.root_nodes().map(|n| (n.kind, n.token.as_str())).collect();
        assert_eq!(
            roots,
            vec![
                (ConcreteNodeKind::Word, "1"),
                (ConcreteNodeKind::Quote, "two words"),
                (ConcreteNodeKind::Variable, "$three"),
            ]
        );

        let err = parse_chunk(&tokenize("a { b", "chunk")).unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnexpectedToken {
                file: "chunk".into(),
                line: 1,
                lexeme: "{".into(),
            }
        );
    }
}
