use tracing::debug;

use super::lexer::{Token, TokenKind, TokenValue};
use crate::error::{CompileError, CompileResult};
use crate::ir::ast::{Ast, BinaryOperator, NodeId, NodeKind};
use crate::ir::types::{DataType, Literal};

const DECLARATION_START: [TokenKind; 2] = [TokenKind::FloatDcl, TokenKind::IntDcl];
const STATEMENT_START: [TokenKind; 2] = [TokenKind::Id, TokenKind::Print];
const VALUE_START: [TokenKind; 3] = [TokenKind::Id, TokenKind::Inum, TokenKind::Fnum];
/// Tokens that may follow a complete statement.
const STATEMENT_FOLLOW: [TokenKind; 3] = [TokenKind::Id, TokenKind::Print, TokenKind::End];

pub fn parse_tokens(tokens: Vec<Token>) -> CompileResult<Ast> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()?;
    debug!(
        top_level = parser.ast.top_level().len(),
        nodes = parser.ast.node_count(),
        "parsing finished"
    );
    Ok(parser.ast)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    ast: Ast,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            ast: Ast::new(),
        }
    }

    /// program := declarations statements END { statements END }
    fn parse_program(&mut self) -> CompileResult<()> {
        let start = [DECLARATION_START.as_slice(), STATEMENT_FOLLOW.as_slice()].concat();
        if !start.contains(&self.peek_kind()) {
            return Err(self.unexpected(&start));
        }

        self.parse_declarations()?;
        self.parse_statements()?;
        self.expect(TokenKind::End)?;

        // further `$`-terminated segments hold statements only
        while !self.is_at_end() {
            self.parse_statements()?;
            self.expect(TokenKind::End)?;
        }
        Ok(())
    }

    fn parse_declarations(&mut self) -> CompileResult<()> {
        loop {
            let kind = self.peek_kind();
            if DECLARATION_START.contains(&kind) {
                self.parse_declaration()?;
            } else if STATEMENT_FOLLOW.contains(&kind) {
                return Ok(());
            } else {
                let expected = [DECLARATION_START.as_slice(), STATEMENT_FOLLOW.as_slice()].concat();
                return Err(self.unexpected(&expected));
            }
        }
    }

    fn parse_declaration(&mut self) -> CompileResult<()> {
        let keyword = self.current();
        let declared = match keyword.kind {
            TokenKind::FloatDcl => DataType::Float,
            TokenKind::IntDcl => DataType::Int,
            _ => return Err(self.unexpected(&DECLARATION_START)),
        };
        self.advance();

        let id = self.expect(TokenKind::Id)?;
        let target = self.reference(&id)?;
        let declaration = self
            .ast
            .add_node(NodeKind::Declaration { declared, target }, keyword.span);
        self.ast.push_top_level(declaration);
        Ok(())
    }

    fn parse_statements(&mut self) -> CompileResult<()> {
        loop {
            match self.peek_kind() {
                TokenKind::Id | TokenKind::Print => self.parse_statement()?,
                TokenKind::End => return Ok(()),
                _ => return Err(self.unexpected(&STATEMENT_FOLLOW)),
            }
        }
    }

    fn parse_statement(&mut self) -> CompileResult<()> {
        let statement = match self.peek_kind() {
            TokenKind::Id => {
                let id = self.expect(TokenKind::Id)?;
                let target = self.reference(&id)?;
                self.expect(TokenKind::Assign)?;
                let first = self.parse_value()?;
                let value = self.parse_expression(first)?;
                self.ast.add_node(NodeKind::Assign { target, value }, id.span)
            }
            TokenKind::Print => {
                let print = self.expect(TokenKind::Print)?;
                let id = self.expect(TokenKind::Id)?;
                let name = self.name_of(&id)?;
                self.ast.add_node(NodeKind::Print { name }, print.span)
            }
            _ => return Err(self.unexpected(&STATEMENT_START)),
        };
        self.ast.push_top_level(statement);
        Ok(())
    }

    /// value := ID | INUM | FNUM
    fn parse_value(&mut self) -> CompileResult<NodeId> {
        let token = self.current();
        let kind = match (token.kind, token.value) {
            (TokenKind::Id, Some(TokenValue::Name(name))) => NodeKind::Reference { name },
            (TokenKind::Inum, Some(TokenValue::Int(n))) => NodeKind::Constant(Literal::Int(n)),
            (TokenKind::Fnum, Some(TokenValue::Float(x))) => NodeKind::Constant(Literal::Float(x)),
            _ => return Err(self.unexpected(&VALUE_START)),
        };
        self.advance();
        Ok(self.ast.add_node(kind, token.span))
    }

    /// expression := (PLUS | MINUS) value expression | ε
    ///
    /// Builds a left-associative chain on top of `left`.
    fn parse_expression(&mut self, mut left: NodeId) -> CompileResult<NodeId> {
        loop {
            let token = self.current();
            let op = match token.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                kind if STATEMENT_FOLLOW.contains(&kind) => return Ok(left),
                _ => {
                    let expected = [
                        TokenKind::Plus,
                        TokenKind::Minus,
                        TokenKind::Id,
                        TokenKind::Print,
                        TokenKind::End,
                    ];
                    return Err(self.unexpected(&expected));
                }
            };
            self.advance();
            let right = self.parse_value()?;
            left = self
                .ast
                .add_node(NodeKind::Compute { op, left, right }, token.span);
        }
    }

    fn reference(&mut self, id: &Token) -> CompileResult<NodeId> {
        let name = self.name_of(id)?;
        Ok(self.ast.add_node(NodeKind::Reference { name }, id.span))
    }

    fn name_of(&self, id: &Token) -> CompileResult<char> {
        id.name().ok_or_else(|| CompileError::Syntax {
            expected: vec![TokenKind::Id],
            found: id.clone(),
        })
    }

    fn current(&self) -> Token {
        match self.tokens.get(self.position) {
            Some(token) => token.clone(),
            None => {
                // ran off the end of a stream that lacked its `End`
                let span = self.tokens.last().map(|t| t.span).unwrap_or_default();
                Token::new(TokenKind::End, None, span)
            }
        }
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.position)
            .map_or(TokenKind::End, |token| token.kind)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn expect(&mut self, expected: TokenKind) -> CompileResult<Token> {
        let token = self.current();
        if token.kind == expected {
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(&[expected]))
        }
    }

    fn unexpected(&self, expected: &[TokenKind]) -> CompileError {
        CompileError::Syntax {
            expected: expected.to_vec(),
            found: self.current(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}
