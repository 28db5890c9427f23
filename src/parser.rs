/*!
Recursive‑descent parser for nya.

Time & Space Complexity
-----------------------
* **n** = number of tokens (including the sole EOF).

Every token is consumed once via `advance()`; error recovery
(`synchronize`) discards tokens up to the next statement boundary, so the
whole pass is **Θ(n)**.  Expression nodes are appended to the interpreter's
[`Ast`] arena, one slot per node.

Logging Policy
--------------

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| High‑level descent into grammar branches. |
| Error recovery               | `debug`| Tokens skipped while synchronizing.       |

Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → funDecl | varDecl | statement ;
funDecl        → ":D" IDENT "(" parameters? ")" block ;
varDecl        → ">.<" IDENT ( "o/" expression )? ";" ;
statement      → exprStmt | printStmt | forStmt | whileStmt
               | ifStmt | block | returnStmt ;
exprStmt       → expression ";" ;
printStmt      → "pwint" expression ";" ;
forStmt        → "^o^" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
whileStmt      → "^w^" "(" expression ")" statement ;
ifStmt         → "^u^" "(" expression ")" statement ( "^e^" statement )? ;
returnStmt     → "c:" expression? ";" ;
block          → ":>" declaration* "<:" ;
parameters     → IDENT ( "," IDENT )* ;
expression     → assignment ;
assignment     → IDENT "o/" assignment | logic_or ;
logic_or       → logic_and ( "v.v" logic_and )* ;
logic_and      → equality ( "&.&" equality )* ;
equality       → comparison ( ( "_o_" | "\o/" ) comparison )* ;
comparison     → modulo ( ( "\o\" | "\o_" | "/o/" | "_o/" ) modulo )* ;
modulo         → term ( "%.%" term )* ;
term           → factor ( ( "-.-" | "+.+" ) factor )* ;
factor         → unary ( ( "-.*" | "+.*" ) unary )* ;
unary          → ( "~" | "-.-" ) unary | call ;
call           → primary ( "(" arguments? ")" )* ;
arguments      → expression ( "," expression )* ;
primary        → NUMBER | STRING | "twue" | "fawse" | "nuww"
               | "Numbew" | "Stwing" | "Boowean"
               | IDENT | "(" expression ")" ;
```
*/

use std::rc::Rc;

use crate::ast::{Ast, Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::error::{NyaError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Maximum number of parameters / call arguments.
pub const MAX_ARGS: usize = 255;

/// Result of parsing one source text.
#[derive(Debug)]
pub struct Parsed {
    /// One slot per top‑level declaration; `None` marks a declaration that
    /// failed to parse.
    pub statements: Vec<Option<Stmt>>,

    /// Every syntax diagnostic, in source order.
    pub errors: Vec<NyaError>,
}

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    ast: &'t mut Ast,
    errors: Vec<NyaError>,
}

impl<'t> Parser<'t> {
    /// Construct a new parser.  Expression nodes are allocated in `ast`.
    ///
    /// `tokens` must end with an `EOF` token, as produced by the scanner.
    pub fn new(tokens: &'t [Token], ast: &'t mut Ast) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            ast,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  Each top‑level declaration is parsed
    /// independently so one mistake yields one diagnostic.
    pub fn parse(mut self) -> Parsed {
        info!("Beginning parse phase");

        let mut statements: Vec<Option<Stmt>> = Vec::new();

        while !self.is_at_end() {
            statements.push(self.declaration());
        }

        info!(
            "Parsed {} declaration(s) with {} error(s)",
            statements.len(),
            self.errors.len()
        );

        Parsed {
            statements,
            errors: self.errors,
        }
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Option<Stmt> {
        debug!("Entering declaration at line {}", self.peek().line);

        let result = if self.matches(TokenType::FUN) {
            self.function("function")
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn function(&mut self, kind: &str) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, &format!("Expected {} name.", kind))?
            .clone();

        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expected '(' after {} name.", kind),
        )?;

        let mut params: Vec<Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARGS {
                    let e = NyaError::parse(self.peek(), "Can't have more than 255 parameters.");
                    self.errors.push(e);
                }

                params.push(
                    self.consume(TokenType::IDENTIFIER, "Expected parameter name.")?
                        .clone(),
                );

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters.")?;

        self.consume(
            TokenType::BLOCK_START,
            &format!("Expected ':>' before {} body.", kind),
        )?;

        let body: Vec<Stmt> = self.block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, "Expected variable name.")?
            .clone();

        let initializer: Option<ExprId> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement at line {}", self.peek().line);

        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::BLOCK_START) {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    /// `^o^` is sugar: the loop becomes
    /// `:> init; ^w^ (cond) :> body; increment; <: <:`.
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after '^o^'.")?;

        let initializer: Option<Stmt> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<ExprId> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition.")?;

        let increment: Option<ExprId> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses.")?;

        let mut body: Stmt = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition: ExprId = match condition {
            Some(condition) => condition,
            None => self.ast.alloc(Expr::Literal(LiteralValue::Bool(true))),
        };

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after '^u^'.")?;
        let condition: ExprId = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after if condition.")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: ExprId = self.expression()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value.")?;

        Ok(Stmt::Print(value))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();
        let value: Option<ExprId> = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after '^w^'.")?;
        let condition: ExprId = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition.")?;
        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: ExprId = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    /// Declarations inside a block recover on their own; a failed one leaves
    /// no statement behind (its diagnostic already blocks execution).
    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::BLOCK_END) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::BLOCK_END, "Expected '<:' after block.")?;
        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<ExprId> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<ExprId> {
        let expr: ExprId = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token = self.previous().clone();
            let value: ExprId = self.assignment()?;

            if let Expr::Variable { name } = &self.ast[expr] {
                let name = name.clone();
                return Ok(self.ast.alloc(Expr::Assign { name, value }));
            }

            // Reported, but the left-hand side is still a usable expression.
            self.errors
                .push(NyaError::parse(&equals, "Invalid assignment target."));
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<ExprId> {
        let mut expr: ExprId = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: ExprId = self.logical_and()?;

            expr = self.ast.alloc(Expr::Logical {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<ExprId> {
        let mut expr: ExprId = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: ExprId = self.equality()?;

            expr = self.ast.alloc(Expr::Logical {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    /// Shared loop for every left‑associative binary level.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<ExprId>,
    ) -> Result<ExprId> {
        let mut expr: ExprId = operand(self)?;

        while operators.iter().any(|op| self.check(op.clone())) {
            let operator: Token = self.advance().clone();
            let right: ExprId = operand(self)?;

            expr = self.ast.alloc(Expr::Binary {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<ExprId> {
        self.binary(
            &[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Result<ExprId> {
        self.binary(
            &[
                TokenType::GREATER,
                TokenType::GREATER_EQUAL,
                TokenType::LESS,
                TokenType::LESS_EQUAL,
            ],
            Self::modulo,
        )
    }

    fn modulo(&mut self) -> Result<ExprId> {
        self.binary(&[TokenType::PERCENT], Self::term)
    }

    fn term(&mut self) -> Result<ExprId> {
        self.binary(&[TokenType::MINUS, TokenType::PLUS], Self::factor)
    }

    fn factor(&mut self) -> Result<ExprId> {
        self.binary(&[TokenType::SLASH, TokenType::STAR], Self::unary)
    }

    fn unary(&mut self) -> Result<ExprId> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token = self.previous().clone();
            let right: ExprId = self.unary()?;

            return Ok(self.ast.alloc(Expr::Unary { operator, right }));
        }

        self.call()
    }

    fn call(&mut self) -> Result<ExprId> {
        let mut expr: ExprId = self.primary()?;

        while self.matches(TokenType::LEFT_PAREN) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: ExprId) -> Result<ExprId> {
        let mut arguments: Vec<ExprId> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    let e = NyaError::parse(self.peek(), "Can't have more than 255 arguments.");
                    self.errors.push(e);
                }

                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token = self
            .consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments.")?
            .clone();

        Ok(self.ast.alloc(Expr::Call {
            callee,
            paren,
            arguments,
        }))
    }

    fn primary(&mut self) -> Result<ExprId> {
        let literal = match &self.peek().token_type {
            TokenType::FALSE => Some(LiteralValue::Bool(false)),
            TokenType::TRUE => Some(LiteralValue::Bool(true)),
            TokenType::NIL => Some(LiteralValue::Nil),
            TokenType::NUMBER(n) => Some(LiteralValue::Number(*n)),
            TokenType::STRING(s) => Some(LiteralValue::Str(s.clone())),
            TokenType::TYPE_NUMBER | TokenType::TYPE_STRING | TokenType::TYPE_BOOL => {
                Some(LiteralValue::Str(self.peek().lexeme.to_string()))
            }
            _ => None,
        };

        if let Some(literal) = literal {
            self.advance();
            return Ok(self.ast.alloc(Expr::Literal(literal)));
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: Token = self.previous().clone();
            return Ok(self.ast.alloc(Expr::Variable { name }));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: ExprId = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression.")?;

            return Ok(self.ast.alloc(Expr::Grouping(expr)));
        }

        Err(NyaError::parse(self.peek(), "Expected expression."))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'t Token> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(NyaError::parse(self.peek(), message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'t Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    #[inline(always)]
    fn peek(&self) -> &'t Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'t Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::FUN
                | TokenType::VAR
                | TokenType::CONST
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,
                _ => {}
            }

            debug!("Synchronize skipping '{}'", self.peek().lexeme);

            self.advance();
        }
    }
}
