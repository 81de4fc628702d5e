//! Recursive descent parser for the statement grammar.
//!
//! ```text
//! statement  := 'def' prototype expression | 'extern' prototype | expression
//! prototype  := identifier '(' identifier* ')'
//! expression := primary (binary_op primary)*
//! primary    := number | identifier | identifier '(' args ')' | '(' expression ')'
//!             | 'if' expression 'then' expression 'else' expression
//!             | 'for' identifier '=' expression ',' expression (',' expression)? 'in' expression
//!             | 'var' identifier ('=' expression)? (',' identifier ('=' expression)?)* 'in' expression
//! ```
//!
//! Statements are separated by ';'. A syntax error only discards the statement it occurred in.

use crate::compiler_frontend::ast::ast_nodes::{
    Expr, ExprKind, FunctionDef, Prototype, TopLevel, VarBinding,
};
use crate::compiler_frontend::compiler_errors::CompilerError;
use crate::compiler_frontend::tokenizer::tokenizer::tokenize;
use crate::compiler_frontend::tokenizer::tokens::{TextLocation, Token, TokenKind};
use crate::settings::STATEMENT_END_CHAR;
use crate::{ast_log, return_syntax_error};

/// Precedence of each binary operator the parser accepts.
/// Higher binds tighter, anything else ends an expression.
pub fn binary_precedence(operator: char) -> Option<u8> {
    match operator {
        '=' => Some(2),
        '<' | '>' => Some(10),
        '+' | '-' => Some(20),
        '*' => Some(40),
        _ => None,
    }
}

static END_OF_INPUT: TokenKind = TokenKind::Eof;

fn is_right_associative(operator: char) -> bool {
    operator == '='
}

/// Tokenizes and parses every statement in the source.
/// A tokenizer error fails the whole input, parse errors only fail their own statement.
pub fn parse_statements(source_code: &str) -> Vec<Result<TopLevel, CompilerError>> {
    let tokens = match tokenize(source_code) {
        Ok(tokens) => tokens,
        Err(e) => return vec![Err(e)],
    };

    let mut parser = Parser::new(tokens);
    let mut statements = Vec::new();
    while let Some(statement) = parser.next_statement() {
        statements.push(statement);
    }

    statements
}

/// Parses source that must contain exactly one statement
pub fn parse_top_level(source_code: &str) -> Result<TopLevel, CompilerError> {
    let mut statements = parse_statements(source_code);

    match statements.len() {
        1 => statements.remove(0),
        0 => return_syntax_error!("Expected a statement, found nothing", TextLocation::default()),
        count => return_syntax_error!(
            format!("Expected a single statement, found {count}"),
            TextLocation::default()
        ),
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// The token list must end with Eof, which the tokenizer guarantees
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    /// Parses the next statement, or returns None once the input is used up
    pub fn next_statement(&mut self) -> Option<Result<TopLevel, CompilerError>> {
        // Skip empty statements
        while self.current().is_char(STATEMENT_END_CHAR) {
            self.advance();
        }

        if self.current() == &TokenKind::Eof {
            return None;
        }

        let statement = self.parse_statement();
        if statement.is_err() {
            self.skip_past_statement_end();
        }

        Some(statement)
    }

    fn parse_statement(&mut self) -> Result<TopLevel, CompilerError> {
        let statement = match self.current() {
            TokenKind::Def => TopLevel::Definition(self.parse_definition()?),
            TokenKind::Extern => {
                self.advance();
                TopLevel::Extern(self.parse_prototype()?)
            }
            _ => TopLevel::Expression(self.parse_expression()?),
        };

        if self.current().is_char(STATEMENT_END_CHAR) {
            self.advance();
        } else if self.current() != &TokenKind::Eof {
            return_syntax_error!(
                format!("Expected ';' after statement, found {}", self.current()),
                self.location(),
                {
                    CompilationStage => "Parsing",
                    PrimarySuggestion => "End each statement with ';'",
                }
            )
        }

        ast_log!("Parsed statement: ", #statement);
        Ok(statement)
    }

    fn parse_definition(&mut self) -> Result<FunctionDef, CompilerError> {
        // Eat 'def'
        self.advance();
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression()?;

        Ok(FunctionDef { prototype, body })
    }

    fn parse_prototype(&mut self) -> Result<Prototype, CompilerError> {
        let location = self.location();
        let name = self.expect_identifier("function name")?;
        self.expect_char('(')?;

        let mut parameters = Vec::new();
        loop {
            match self.current() {
                TokenKind::Identifier(param) => {
                    parameters.push(param.to_owned());
                    self.advance();
                }
                // Parameters can be separated by whitespace or commas
                TokenKind::Char(',') => self.advance(),
                TokenKind::Char(')') => {
                    self.advance();
                    break;
                }
                other => return_syntax_error!(
                    format!("Expected a parameter name or ')' in prototype of '{name}', found {other}"),
                    self.location(),
                    {
                        CompilationStage => "Parsing",
                    }
                ),
            }
        }

        Ok(Prototype {
            name,
            parameters,
            location,
        })
    }

    pub fn parse_expression(&mut self) -> Result<Expr, CompilerError> {
        let lhs = self.parse_primary()?;
        self.parse_binary_rhs(0, lhs)
    }

    /// Operator-precedence climbing.
    /// Keeps folding operators into lhs while they bind at least as tight as min_precedence.
    fn parse_binary_rhs(&mut self, min_precedence: u8, mut lhs: Expr) -> Result<Expr, CompilerError> {
        loop {
            let (operator, precedence) = match self.current_operator() {
                Some(op) if op.1 >= min_precedence => op,
                _ => return Ok(lhs),
            };

            self.advance();
            let mut rhs = self.parse_primary()?;

            if let Some((next_operator, next_precedence)) = self.current_operator() {
                if next_precedence > precedence {
                    rhs = self.parse_binary_rhs(precedence + 1, rhs)?;
                } else if next_precedence == precedence && is_right_associative(next_operator) {
                    rhs = self.parse_binary_rhs(precedence, rhs)?;
                }
            }

            let location = lhs.location.span_to(&rhs.location);
            lhs = Expr::new(
                ExprKind::Binary {
                    operator,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                location,
            );
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, CompilerError> {
        let location = self.location();

        match self.current().to_owned() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(value), location))
            }

            TokenKind::Identifier(name) => {
                self.advance();
                if !self.current().is_char('(') {
                    return Ok(Expr::new(ExprKind::Variable(name), location));
                }

                self.advance();
                let mut arguments = Vec::new();
                if !self.current().is_char(')') {
                    loop {
                        arguments.push(self.parse_expression()?);

                        if self.current().is_char(')') {
                            break;
                        }
                        self.expect_char(',')?;
                    }
                }
                self.advance();

                Ok(Expr::new(
                    ExprKind::Call {
                        callee: name,
                        arguments,
                    },
                    location.span_to(&self.previous_location()),
                ))
            }

            TokenKind::Char('(') => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_char(')')?;
                Ok(expr)
            }

            TokenKind::If => self.parse_if(location),
            TokenKind::For => self.parse_for(location),
            TokenKind::Var => self.parse_var(location),

            other => return_syntax_error!(
                format!("Expected an expression, found {other}"),
                location,
                {
                    CompilationStage => "Parsing",
                }
            ),
        }
    }

    fn parse_if(&mut self, location: TextLocation) -> Result<Expr, CompilerError> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect_keyword(TokenKind::Then)?;
        let then_branch = self.parse_expression()?;
        self.expect_keyword(TokenKind::Else)?;
        let else_branch = self.parse_expression()?;

        Ok(Expr::new(
            ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            location.span_to(&self.previous_location()),
        ))
    }

    fn parse_for(&mut self, location: TextLocation) -> Result<Expr, CompilerError> {
        self.advance();
        let var_name = self.expect_identifier("loop variable")?;
        self.expect_char('=')?;

        let start = self.parse_expression()?;
        self.expect_char(',')?;
        let end = self.parse_expression()?;

        let step = if self.current().is_char(',') {
            self.advance();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect_keyword(TokenKind::In)?;
        let body = self.parse_expression()?;

        Ok(Expr::new(
            ExprKind::For {
                var_name,
                start: Box::new(start),
                end: Box::new(end),
                step,
                body: Box::new(body),
            },
            location.span_to(&self.previous_location()),
        ))
    }

    fn parse_var(&mut self, location: TextLocation) -> Result<Expr, CompilerError> {
        self.advance();

        let mut bindings = Vec::new();
        loop {
            let name = self.expect_identifier("variable name")?;

            let initializer = if self.current().is_char('=') {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };

            bindings.push(VarBinding { name, initializer });

            if !self.current().is_char(',') {
                break;
            }
            self.advance();
        }

        self.expect_keyword(TokenKind::In)?;
        let body = self.parse_expression()?;

        Ok(Expr::new(
            ExprKind::VarIn {
                bindings,
                body: Box::new(body),
            },
            location.span_to(&self.previous_location()),
        ))
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn current(&self) -> &TokenKind {
        // The last token is always Eof, so clamp to it
        let index = self.index.min(self.tokens.len().saturating_sub(1));
        self.tokens
            .get(index)
            .map(|token| &token.kind)
            .unwrap_or(&END_OF_INPUT)
    }

    fn current_operator(&self) -> Option<(char, u8)> {
        match self.current() {
            TokenKind::Char(ch) => binary_precedence(*ch).map(|precedence| (*ch, precedence)),
            _ => None,
        }
    }

    fn location(&self) -> TextLocation {
        self.tokens
            .get(self.index)
            .map(|token| token.location)
            .unwrap_or_default()
    }

    fn previous_location(&self) -> TextLocation {
        self.index
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.location)
            .unwrap_or_default()
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    fn skip_past_statement_end(&mut self) {
        while self.current() != &TokenKind::Eof {
            let at_end = self.current().is_char(STATEMENT_END_CHAR);
            self.advance();
            if at_end {
                return;
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), CompilerError> {
        if self.current().is_char(expected) {
            self.advance();
            return Ok(());
        }

        return_syntax_error!(
            format!("Expected '{expected}', found {}", self.current()),
            self.location(),
            {
                CompilationStage => "Parsing",
            }
        )
    }

    fn expect_keyword(&mut self, expected: TokenKind) -> Result<(), CompilerError> {
        if *self.current() == expected {
            self.advance();
            return Ok(());
        }

        return_syntax_error!(
            format!("Expected {expected}, found {}", self.current()),
            self.location(),
            {
                CompilationStage => "Parsing",
            }
        )
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, CompilerError> {
        if let TokenKind::Identifier(name) = self.current() {
            let name = name.to_owned();
            self.advance();
            return Ok(name);
        }

        return_syntax_error!(
            format!("Expected {what}, found {}", self.current()),
            self.location(),
            {
                CompilationStage => "Parsing",
            }
        )
    }
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
