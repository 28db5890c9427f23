//! Module `scanner` implements a one‑pass, streaming UTF‑8 lexer for the nya language.
//!
//! It transforms a `&str` into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a `FusedIterator`,
//! it can be chained safely with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token, NyaError>` on each `.next()`, where `Ok(token)` is a scanned token
//!   and `Err` reports a lexing error with line information.
//!
//! - `scan(src) -> (Vec<Token>, Vec<NyaError>)`
//!   Drain a scanner, splitting tokens from diagnostics.
//!
//! # Token Recognition
//!
//! - Single‑character tokens: `(`, `)`, `,`, `.`, `;`, `~`.
//! - Multi‑character operators are matched greedily and all‑or‑nothing: `+.+`, `-.-`,
//!   `+.*`, `-.*`, `%.%`, `o/`, `\o/`, `_o_`, `\o\`, `\o_`, `/o/`, `_o/`, `&.&`, `v.v`,
//!   `>.<`, `>w<`, `:D`, `c:`, `:>`, `<:`, `^u^`, `^e^`, `^o^`, `^w^`.
//!   An incomplete operator is an error for its first character only; scanning resumes at
//!   the next character.  Operators led by an identifier character (`o`, `c`, `v`, `_`)
//!   fall back to an identifier instead.
//! - String literals: `"` … `"`, allowing multi‑line and reporting unterminated errors.
//! - Numeric literals: integer and optional fractional part.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - A single leading byte‑order mark is discarded.
//!
//! # Performance
//!
//! - Bulk comment skipping via `memchr` for rapid new‑line search.
//! - `#[inline(always)]` on hot path helpers.

use crate::error::{NyaError, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"pwint"   => TokenType::PRINT,
    b"twue"    => TokenType::TRUE,
    b"fawse"   => TokenType::FALSE,
    b"nuww"    => TokenType::NIL,
    b"Numbew"  => TokenType::TYPE_NUMBER,
    b"Stwing"  => TokenType::TYPE_STRING,
    b"Boowean" => TokenType::TYPE_BOOL,
};

const BYTE_ORDER_MARK: &str = "\u{FEFF}";

/// A single pass **scanner / lexer** that converts UTF‑8 source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    src: &'a str,               // entire source text
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        let curr = if src.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len()
        } else {
            0
        };

        Self {
            src,
            start: curr,
            curr,
            line: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// Return the length of the input.
    #[inline(always)]
    fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes()[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past EOF
    /// to avoid branching at call‑site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.bytes()[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.bytes()[self.curr + 1]
        }
    }

    /// Consume `rest` **iff** the remaining input starts with all of it.
    /// Nothing is consumed on a partial match.
    #[inline(always)]
    fn match_bytes(&mut self, rest: &[u8]) -> bool {
        if self.bytes()[self.curr..].starts_with(rest) {
            self.curr += rest.len();
            true
        } else {
            false
        }
    }

    /// Pick the first operator whose tail matches, or `None` when the lead
    /// character does not start a complete operator.
    fn match_operator(&mut self, tails: &[(&[u8], TokenType)]) -> Option<TokenType> {
        tails
            .iter()
            .find(|(tail, _)| self.bytes()[self.curr..].starts_with(tail))
            .map(|(tail, tt)| {
                self.curr += tail.len();
                tt.clone()
            })
    }

    /// Report the lead character of an unrecognised lexeme.  Scanning resumes
    /// right after it.
    fn unexpected(&mut self) -> NyaError {
        let ch = self.src[self.start..].chars().next().unwrap_or('\0');
        self.curr = self.start + ch.len_utf8();

        NyaError::lex(self.line, format!("Unexpected character: {}", ch))
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        let tt = match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b';' => TokenType::SEMICOLON,
            b'~' => TokenType::BANG,

            // ── arithmetic (+.+ +.* -.- -.* %.%) ──────────────────────────
            b'+' => self
                .match_operator(&[(b".+", TokenType::PLUS), (b".*", TokenType::STAR)])
                .ok_or_else(|| self.unexpected())?,

            b'-' => self
                .match_operator(&[(b".-", TokenType::MINUS), (b".*", TokenType::SLASH)])
                .ok_or_else(|| self.unexpected())?,

            b'%' => self
                .match_operator(&[(b".%", TokenType::PERCENT)])
                .ok_or_else(|| self.unexpected())?,

            // ── comparison (\o/ \o\ \o_ /o/ _o_ _o/) ───────────────────────
            b'\\' => self
                .match_operator(&[
                    (b"o/", TokenType::EQUAL_EQUAL),
                    (b"o\\", TokenType::GREATER),
                    (b"o_", TokenType::GREATER_EQUAL),
                ])
                .ok_or_else(|| self.unexpected())?,

            // ── logic (&.& v.v) ───────────────────────────────────────────
            b'&' => self
                .match_operator(&[(b".&", TokenType::AND)])
                .ok_or_else(|| self.unexpected())?,

            // ── declarations (>.< >w< :D) and blocks (:> <:) ──────────────
            b'>' => self
                .match_operator(&[(b".<", TokenType::VAR), (b"w<", TokenType::CONST)])
                .ok_or_else(|| self.unexpected())?,

            b':' => self
                .match_operator(&[(b"D", TokenType::FUN), (b">", TokenType::BLOCK_START)])
                .ok_or_else(|| self.unexpected())?,

            b'<' => self
                .match_operator(&[(b":", TokenType::BLOCK_END)])
                .ok_or_else(|| self.unexpected())?,

            // ── control flow (^u^ ^e^ ^o^ ^w^) ────────────────────────────
            b'^' => self
                .match_operator(&[
                    (b"u^", TokenType::IF),
                    (b"e^", TokenType::ELSE),
                    (b"o^", TokenType::FOR),
                    (b"w^", TokenType::WHILE),
                ])
                .ok_or_else(|| self.unexpected())?,

            // ── comments (// … until newline) or `/o/` ────────────────────
            b'/' => {
                if self.match_bytes(b"/") {
                    // Fast‑forward to next newline using `memchr`.
                    // If none found, skip to EOF.
                    if let Some(pos) = memchr(b'\n', &self.bytes()[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                self.match_operator(&[(b"o/", TokenType::LESS)])
                    .ok_or_else(|| self.unexpected())?
            }

            // ── operators led by identifier characters ────────────────────
            b'o' if self.match_bytes(b"/") => TokenType::EQUAL,
            b'c' if self.match_bytes(b":") => TokenType::RETURN,
            b'v' if self.match_bytes(b".v") => TokenType::OR,
            b'_' if self.match_bytes(b"o_") => TokenType::BANG_EQUAL,
            b'_' if self.match_bytes(b"o/") => TokenType::LESS_EQUAL,

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(()); // skip insignificants
            }

            b'\n' => {
                self.line += 1; // track for diagnostics

                return Ok(());
            }

            // ── string literal " … " ─────────────────────────────────────
            b'"' => {
                return self.parse_string();
            }

            // ── number literal (digit‑leading) ───────────────────────────
            b'0'..=b'9' => self.parse_number(),

            // ── identifiers / keywords (alpha or underscore‑leading) ─────
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.parse_identifier(),

            // ── unexpected character ─────────────────────────────────────
            _ => return Err(self.unexpected()),
        };

        self.pending = Some(tt);

        Ok(())
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1; // multi‑line strings are allowed
            }
        }

        if self.is_at_end() {
            return Err(NyaError::lex(self.line, "Unterminated string."));
        }

        self.advance(); // consume closing quote

        // Slice excluding the surrounding quotes; both are ASCII boundaries.
        let s: &str = &self.src[self.start + 1..self.curr - 1];

        self.pending = Some(TokenType::STRING(s.to_owned()));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional and a
    /// trailing `.` without digits is left for the next token.
    fn parse_number(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume "."

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: &str = &self.src[self.start..self.curr];
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // digits only, cannot fail

        TokenType::NUMBER(n)
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) -> TokenType {
        // Operator fallbacks may already have moved past the lead character.
        self.curr = self.start + 1;

        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.bytes()[self.start..self.curr];

        KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1; // ensure fused semantics
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let lex: &str = &self.src[self.start..self.curr];
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}

/// Scan the whole of `src`, separating tokens from diagnostics.  The token
/// list always ends with a single `EOF`.
pub fn scan(src: &str) -> (Vec<Token>, Vec<NyaError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    for item in Scanner::new(src) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    info!(
        "Scanned {} token(s) with {} error(s)",
        tokens.len(),
        errors.len()
    );

    (tokens, errors)
}
