//! Hand-written lexer for Axiom's brace-structured script files
//! (materials, overlays, particle systems, compositors …).
//!
//! The lexer only breaks text into `Token`s.  Keywords such as `import`
//! or `material` come out as plain `Word`s; the parser decides what they
//! mean.  Newlines are significant and are emitted as tokens of their own.
//
//  Lexical items (informal):
//
//      LeftBrace  ::= '{'
//      RightBrace ::= '}'
//      Colon      ::= ':'
//      Quote      ::= '"' ( '\' any | [^"\n] )* '"'    (single line)
//      Variable   ::= '$' word-char+
//      Word       ::= word-char+
//      Newline    ::= '\n'
//
//  Spaces, tabs and carriage returns are discarded, as are `// …` line
//  comments and `/* … */` block comments.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LeftBrace,
    RightBrace,
    Colon,
    Variable,
    Word,
    Quote,
    Newline,
    /// Lexeme that matched nothing else, e.g. an unterminated quote.
    Unknown,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub file: String,
    pub line: u32,
}

/// Tokenizes a whole script.  The result always ends with one `End` token.
pub fn tokenize(source: &str, file: &str) -> Vec<Token> {
    Lexer::new(source, file).collect()
}

#[derive(Clone)]
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    file: &'a str,
    line: u32,
    finished: bool,
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | ':' | '"')
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, file: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            file,
            line: 1,
            finished: false,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// True if the upcoming characters open a `//` or `/*` comment.
    fn comment_ahead(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next() == Some('/') && matches!(ahead.next(), Some('/') | Some('*'))
    }

    fn token(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            file: self.file.to_string(),
            line: self.line,
        }
    }

    fn skip_line_comment(&mut self) {
        // the newline itself is left for the caller
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
    }

    fn skip_block_comment(&mut self) {
        while let Some(c) = self.next_char() {
            match c {
                '\n' => self.line += 1,
                '*' if self.peek_char() == Some('/') => {
                    self.next_char();
                    return;
                }
                _ => {}
            }
        }
    }

    fn read_word(&mut self, first: char) -> String {
        let mut word = String::new();
        word.push(first);
        while let Some(c) = self.peek_char() {
            if !is_word_char(c) || self.comment_ahead() {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    fn read_quote(&mut self) -> Token {
        let mut quote = String::from('"');
        while let Some(c) = self.peek_char() {
            match c {
                '\n' => break,
                '"' => {
                    self.next_char();
                    quote.push(c);
                    return self.token(TokenKind::Quote, quote);
                }
                '\\' => {
                    self.next_char();
                    quote.push(c);
                    if let Some(escaped) = self.peek_char().filter(|e| *e != '\n') {
                        self.next_char();
                        quote.push(escaped);
                    }
                }
                _ => {
                    self.next_char();
                    quote.push(c);
                }
            }
        }
        self.token(TokenKind::Unknown, quote)
    }

    fn read_variable(&mut self) -> Token {
        match self.peek_char() {
            Some(c) if is_word_char(c) && !self.comment_ahead() => {
                let name = self.read_word('$');
                self.token(TokenKind::Variable, name)
            }
            _ => self.token(TokenKind::Unknown, "$"),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            // Skip whitespace that isn't newline
            while let Some(c) = self.peek_char() {
                if c != '\n' && c.is_whitespace() {
                    self.next_char();
                } else {
                    break;
                }
            }

            if self.comment_ahead() {
                self.next_char();
                match self.next_char() {
                    Some('/') => self.skip_line_comment(),
                    _ => self.skip_block_comment(),
                }
                continue;
            }

            let ch = match self.next_char() {
                Some(c) => c,
                None => {
                    self.finished = true;
                    return Some(self.token(TokenKind::End, ""));
                }
            };

            let tok = match ch {
                '\n' => {
                    let tok = self.token(TokenKind::Newline, "\n");
                    self.line += 1;
                    tok
                }
                '{' => self.token(TokenKind::LeftBrace, "{"),
                '}' => self.token(TokenKind::RightBrace, "}"),
                ':' => self.token(TokenKind::Colon, ":"),
                '"' => self.read_quote(),
                '$' => self.read_variable(),
                c => {
                    let word = self.read_word(c);
                    self.token(TokenKind::Word, word)
                }
            };

            return Some(tok);
        }
    }
}
