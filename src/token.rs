use serde::Serialize;
use std::fmt;
use std::mem;
use std::rc::Rc;

/// The different kinds of tokens recognized by the nya scanner.
///
/// Variants without data represent operator or keyword tokens.
/// `STRING(String)` and `NUMBER(f64)` carry their literal values.
/// `IDENTIFIER` is used for user‑defined names.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// ':>'
    BLOCK_START,

    /// '<:'
    BLOCK_END,

    /// ','
    COMMA,

    /// '.'
    DOT,

    /// ';'
    SEMICOLON,

    /// '+.+'
    PLUS,

    /// '-.-'
    MINUS,

    /// '+.*'
    STAR,

    /// '-.*'
    SLASH,

    /// '%.%'
    PERCENT,

    /// '~'
    BANG,

    /// '_o_'
    BANG_EQUAL,

    /// 'o/'
    EQUAL,

    /// '\o/'
    EQUAL_EQUAL,

    /// '\o\'
    GREATER,

    /// '\o_'
    GREATER_EQUAL,

    /// '/o/'
    LESS,

    /// '_o/'
    LESS_EQUAL,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A string literal (contents without quotes)
    STRING(String),

    /// A numeric literal
    #[serde(rename = "NUMBER")]
    NUMBER(f64),

    /// '&.&'
    AND,

    /// 'v.v'
    OR,

    /// '>.<'
    VAR,

    /// '>w<' (reserved)
    CONST,

    /// ':D'
    FUN,

    /// 'c:'
    RETURN,

    /// '^u^'
    IF,

    /// '^e^'
    ELSE,

    /// '^o^'
    FOR,

    /// '^w^'
    WHILE,

    /// 'pwint'
    PRINT,

    /// 'twue'
    TRUE,

    /// 'fawse'
    FALSE,

    /// 'nuww'
    NIL,

    /// 'Numbew'
    TYPE_NUMBER,

    /// 'Stwing'
    TYPE_STRING,

    /// 'Boowean'
    TYPE_BOOL,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// Variant name without payload, as printed by the `tokenize` command.
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::BLOCK_START => "BLOCK_START",
            TokenType::BLOCK_END => "BLOCK_END",
            TokenType::COMMA => "COMMA",
            TokenType::DOT => "DOT",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::PLUS => "PLUS",
            TokenType::MINUS => "MINUS",
            TokenType::STAR => "STAR",
            TokenType::SLASH => "SLASH",
            TokenType::PERCENT => "PERCENT",
            TokenType::BANG => "BANG",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::GREATER_EQUAL => "GREATER_EQUAL",
            TokenType::LESS => "LESS",
            TokenType::LESS_EQUAL => "LESS_EQUAL",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            TokenType::AND => "AND",
            TokenType::OR => "OR",
            TokenType::VAR => "VAR",
            TokenType::CONST => "CONST",
            TokenType::FUN => "FUN",
            TokenType::RETURN => "RETURN",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::FOR => "FOR",
            TokenType::WHILE => "WHILE",
            TokenType::PRINT => "PRINT",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::NIL => "NIL",
            TokenType::TYPE_NUMBER => "TYPE_NUMBER",
            TokenType::TYPE_STRING => "TYPE_STRING",
            TokenType::TYPE_BOOL => "TYPE_BOOL",
            TokenType::EOF => "EOF",
        }
    }
}

impl PartialEq for TokenType {
    /// Two TokenTypes are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the line number where it was found.
///
/// Lexemes are reference counted so that AST nodes can keep their tokens
/// alive after the source buffer of a single REPL line is gone.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: Rc<str>,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new(token_type: TokenType, lexeme: &str, line: usize) -> Self {
        Self {
            token_type,
            lexeme: Rc::from(lexeme),
            line,
        }
    }

    /// Is this the end-of-input marker?
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::EOF)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 3 → "3.0", 3.14 → "3.14"
        let literal = match &self.token_type {
            TokenType::STRING(s) => s.clone(),
            TokenType::NUMBER(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                let mut buf = itoa::Buffer::new();
                format!("{}.0", buf.format(*n as i64))
            }
            TokenType::NUMBER(n) => n.to_string(),
            _ => "null".to_string(),
        };

        write!(
            f,
            "{} {} {}",
            self.token_type.name(),
            self.lexeme,
            literal
        )
    }
}
