use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use tracing::{debug, trace};

use crate::error::{CompileError, CompileResult};
use crate::ir::types::Decimal;
use crate::span::Span;

/// Terminal symbols of the ac grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    FloatDcl, // f
    IntDcl,   // i
    Print,    // p
    Id,       // a-z without f, i, p
    Assign,   // =
    Plus,     // +
    Minus,    // -
    Inum,
    Fnum,
    End, // $
}

impl TokenKind {
    /// Single-character kinds in the order they are tried against the input.
    const SINGLE_CHAR: [TokenKind; 8] = [
        TokenKind::FloatDcl,
        TokenKind::IntDcl,
        TokenKind::Print,
        TokenKind::Id,
        TokenKind::Assign,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::End,
    ];

    fn matches_char(self, ch: char) -> bool {
        match self {
            TokenKind::FloatDcl => ch == 'f',
            TokenKind::IntDcl => ch == 'i',
            TokenKind::Print => ch == 'p',
            TokenKind::Id => is_identifier(ch),
            TokenKind::Assign => ch == '=',
            TokenKind::Plus => ch == '+',
            TokenKind::Minus => ch == '-',
            TokenKind::End => ch == '$',
            TokenKind::Inum | TokenKind::Fnum => false,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::FloatDcl => "FLOATDCL",
            TokenKind::IntDcl => "INTDCL",
            TokenKind::Print => "PRINT",
            TokenKind::Id => "ID",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Inum => "INUM",
            TokenKind::Fnum => "FNUM",
            TokenKind::End => "END",
        };
        f.write_str(name)
    }
}

/// Identifiers are single lowercase letters, minus the keyword letters.
pub fn is_identifier(ch: char) -> bool {
    ch.is_ascii_lowercase() && !matches!(ch, 'f' | 'i' | 'p')
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Int(i64),
    Float(Decimal),
    Name(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<TokenValue>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: Option<TokenValue>, span: Span) -> Self {
        Self { kind, value, span }
    }

    pub fn name(&self) -> Option<char> {
        match &self.value {
            Some(TokenValue::Name(ch)) => Some(*ch),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(TokenValue::Int(n)) => write!(f, "<{}: {}>", self.kind, n),
            Some(TokenValue::Float(x)) => write!(f, "<{}: {}>", self.kind, x),
            Some(TokenValue::Name(ch)) => write!(f, "<{}: {}>", self.kind, ch),
            None => write!(f, "<{}>", self.kind),
        }
    }
}

/// Scans ac source into tokens. The result always ends with exactly one
/// trailing `End`, whether or not the source closes with `$`.
pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = scanner.next_token()? {
        trace!(token = %token, "scanned");
        tokens.push(token);
    }

    if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::End) {
        let span = scanner.here();
        tokens.push(Token::new(TokenKind::End, None, span));
    }

    debug!(count = tokens.len(), "scanning finished");
    Ok(tokens)
}

struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(offset, _)) => offset,
            None => self.source.len(),
        }
    }

    fn here(&mut self) -> Span {
        let offset = self.offset();
        Span::new(self.line, self.column, offset, offset)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self) -> CompileResult<Option<Token>> {
        self.skip_whitespace();

        let Some(&(_, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        if ch.is_ascii_digit() {
            return self.scan_number().map(Some);
        }

        let mut span = self.here();
        for kind in TokenKind::SINGLE_CHAR {
            if kind.matches_char(ch) {
                self.bump();
                span.end = self.offset();
                let value = (kind == TokenKind::Id).then_some(TokenValue::Name(ch));
                return Ok(Some(Token::new(kind, value, span)));
            }
        }

        Err(CompileError::Lexical { ch, span })
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.bump();
        }
    }

    fn scan_number(&mut self) -> CompileResult<Token> {
        let mut span = self.here();
        let mut text = String::new();
        self.take_digits(&mut text);

        if let Some(&(_, '.')) = self.chars.peek() {
            text.push('.');
            self.bump();
            self.take_digits(&mut text);
            span.end = self.offset();
            let value = Decimal::parse(&text)
                .ok_or_else(|| CompileError::FloatOverflow { text: text.clone(), span })?;
            return Ok(Token::new(TokenKind::Fnum, Some(TokenValue::Float(value)), span));
        }

        span.end = self.offset();
        let value: i64 = text
            .parse()
            .map_err(|_| CompileError::IntegerOverflow { text: text.clone(), span })?;
        Ok(Token::new(TokenKind::Inum, Some(TokenValue::Int(value)), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_declarations_and_assignment() {
        use TokenKind::*;
        assert_eq!(
            kinds("f b i a a = 5 b = a + 3.2 p b"),
            vec![FloatDcl, Id, IntDcl, Id, Id, Assign, Inum, Id, Assign, Id, Plus, Fnum, Print, Id, End]
        );
    }

    #[test]
    fn numbers_are_greedy() {
        let tokens = tokenize("123 45.67 8.").unwrap();
        assert_eq!(tokens[0].value, Some(TokenValue::Int(123)));
        assert_eq!(tokens[1].value, Some(TokenValue::Float(Decimal::parse("45.67").unwrap())));
        assert_eq!(tokens[2].kind, TokenKind::Fnum);
        assert_eq!(tokens[2].value, Some(TokenValue::Float(Decimal::parse("8.0").unwrap())));
        assert_eq!(tokens[0].span, Span::new(1, 1, 0, 3));
    }

    #[test]
    fn keyword_letters_win_over_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("f i p a"), vec![FloatDcl, IntDcl, Print, Id, End]);
    }

    #[test]
    fn single_end_token_terminates_stream() {
        use TokenKind::*;
        assert_eq!(kinds("i a$"), vec![IntDcl, Id, End]);
        assert_eq!(kinds("i a $  \n"), vec![IntDcl, Id, End]);
        assert_eq!(kinds("i a"), vec![IntDcl, Id, End]);
        assert_eq!(kinds(""), vec![End]);
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("i a\n  a = 1").unwrap();
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 3);
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("i a a = 2 * 3").unwrap_err();
        match err {
            CompileError::Lexical { ch, span } => {
                assert_eq!(ch, '*');
                assert_eq!(span.column, 11);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(tokenize("i A"), Err(CompileError::Lexical { ch: 'A', .. })));
    }

    #[test]
    fn rejects_oversized_integers() {
        assert!(matches!(
            tokenize("99999999999999999999"),
            Err(CompileError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn rejects_floats_beyond_f64_range() {
        let source = format!("f a a = {}.0 p a$", "9".repeat(400));
        match tokenize(&source).unwrap_err() {
            CompileError::FloatOverflow { text, span } => {
                assert_eq!(text.len(), 402);
                assert_eq!(span.column, 9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn float_digits_survive_scanning() {
        let tokens = tokenize("9007199254740993.5").unwrap();
        assert_eq!(tokens[0].to_string(), "<FNUM: 9007199254740993.5>");
    }
}
