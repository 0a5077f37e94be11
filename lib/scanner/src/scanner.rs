use cursor::{Cursor, Line, SourceRange};
use diagnostics::{Diagnostic, Diagnostics};

mod keywords;
pub mod token;
pub use token::{Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedComment,
    #[error("Dangling block comment end '*/'.")]
    DanglingCommentEnd,
    #[error("Numeric literal cannot be followed by an underscore or alphabetical character.")]
    NumberFollowedByIdentifier,
    #[error("Too many tokens in one input (limit is {0}).")]
    TooManyTokens(usize),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

impl From<ScanError> for Diagnostic {
    fn from(value: ScanError) -> Self {
        Diagnostic::new(value.line, value.error)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Lazily scans a source buffer.
///
/// Lexical errors are yielded in place of the offending lexeme, after which scanning resumes with
/// the next character. The stream yields exactly one `Eof` token and then ends.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,
    finished: bool,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), finished: false }
    }

    fn token(&self, data: TokenData<'a>, start: &Cursor<'a>) -> Token<'a> {
        Token::new(data, start.range_to(&self.cursor))
    }

    fn error(&self, error: ScanErrorType) -> ScanError {
        ScanError { error, line: self.cursor.line() }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.advance_while(|c| matches!(c, ' ' | '\r' | '\t' | '\n'));
    }

    fn string(&mut self, start: &Cursor<'a>) -> Result<Token<'a>, ScanError> {
        loop {
            match self.cursor.next() {
                Some('"') => break,
                Some(_) => (),
                None => return Err(self.error(ScanErrorType::UnterminatedString)),
            }
        }

        let lexeme = start.slice_until(&self.cursor);
        Ok(self.token(Str(&lexeme[1..lexeme.len() - 1]), start))
    }

    fn number(&mut self, start: &Cursor<'a>) -> Result<Token<'a>, ScanError> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next(); // '.'
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        if self.cursor.peek().is_some_and(is_identifier_start) {
            return Err(self.error(ScanErrorType::NumberFollowedByIdentifier));
        }

        let n = start
            .slice_until(&self.cursor)
            .parse::<f64>()
            .expect("Digits with an optional fraction always parse as a number");
        Ok(self.token(Number(n), start))
    }

    fn identifier(&mut self, start: &Cursor<'a>) -> Token<'a> {
        self.cursor.advance_while(is_identifier_char);
        let lexeme = start.slice_until(&self.cursor);
        self.token(keywords::keyword(lexeme).unwrap_or(Identifier), start)
    }

    // Block comments don't nest, the first `*/` closes the comment.
    fn block_comment(&mut self) -> Result<(), ScanError> {
        loop {
            match self.cursor.next() {
                Some('*') if self.cursor.advance_if('/') => return Ok(()),
                Some(_) => (),
                None => return Err(self.error(ScanErrorType::UnterminatedComment)),
            }
        }
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Result<Token<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.skip_whitespace();

            let start = self.cursor.clone();
            let Some(c) = self.cursor.next() else {
                self.finished = true;
                return Some(Ok(self.token(Eof, &start)));
            };

            let data = match c {
                '(' => LeftParen,
                ')' => RightParen,
                '{' => LeftBrace,
                '}' => RightBrace,
                ',' => Comma,
                '.' => Dot,
                '-' => Minus,
                '+' => Plus,
                ';' => Semicolon,
                '?' => Question,
                ':' => Colon,

                '*' => {
                    if self.cursor.advance_if('/') {
                        return Some(Err(self.error(ScanErrorType::DanglingCommentEnd)));
                    }
                    Star
                }

                '!' => {
                    if self.cursor.advance_if('=') {
                        BangEqual
                    } else {
                        Bang
                    }
                }

                '=' => {
                    if self.cursor.advance_if('=') {
                        EqualEqual
                    } else {
                        Equal
                    }
                }

                '<' => {
                    if self.cursor.advance_if('=') {
                        LessEqual
                    } else {
                        Less
                    }
                }

                '>' => {
                    if self.cursor.advance_if('=') {
                        GreaterEqual
                    } else {
                        Greater
                    }
                }

                '/' => {
                    if self.cursor.advance_if('/') {
                        self.cursor.advance_while(|c| c != '\n');
                        continue;
                    }
                    if self.cursor.advance_if('*') {
                        match self.block_comment() {
                            Ok(()) => continue,
                            Err(e) => return Some(Err(e)),
                        }
                    }
                    Slash
                }

                '"' => return Some(self.string(&start)),

                d if d.is_ascii_digit() => return Some(self.number(&start)),

                c if is_identifier_start(c) => return Some(Ok(self.identifier(&start))),

                c => return Some(Err(self.error(ScanErrorType::UnexpectedCharacter(c)))),
            };

            return Some(Ok(self.token(data, &start)));
        }
    }
}

/// Eagerly scans a whole source buffer into a token sequence.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    tokens: TokenStream<'a>,
    token_limit: Option<usize>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { tokens: TokenStream::new(source), token_limit: None }
    }

    /// Caps the number of tokens (not counting the `Eof` sentinel) a scan may produce.
    pub fn with_token_limit(self, token_limit: Option<usize>) -> Self {
        Self { token_limit, ..self }
    }

    /// Scans until end of input, reporting every lexical error to `diagnostics`.
    ///
    /// The returned sequence always ends with exactly one `Eof` token, even when the scan stopped
    /// early because the token limit was hit.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();

        for result in self.tokens.by_ref() {
            let token = match result {
                Ok(token) => token,
                Err(e) => {
                    log::trace!("Scan error: {:?}", e);
                    diagnostics.report(e);
                    continue;
                }
            };

            if token.ty() != TokenType::Eof {
                if let Some(limit) = self.token_limit.filter(|limit| tokens.len() >= *limit) {
                    diagnostics.report(ScanError {
                        error: ScanErrorType::TooManyTokens(limit),
                        line: token.line(),
                    });
                    tokens.push(eof_before(&token));
                    break;
                }
            }

            log::trace!("Scanned {:?} {:?}", token.ty(), token.lexeme());
            tokens.push(token);
        }

        tokens
    }
}

fn eof_before<'a>(token: &Token<'a>) -> Token<'a> {
    let range = &token.range;
    Token::new(Eof, SourceRange::new(range.source(), range.start(), range.start(), range.line()))
}
