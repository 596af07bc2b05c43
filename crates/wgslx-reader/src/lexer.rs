//! Lexer: converts WGSL source text into a stream of [`Token`]s.
//!
//! A hand-written scanner working one byte at a time. Line comments and
//! nested block comments are skipped with the whitespace. Numeric literals
//! are decoded here, including hexadecimal floats and type suffixes.

use wgslx_ast::{Diagnostic, FloatSuffix, IntSuffix, Span};

use crate::token::{Token, TokenKind};

/// Lexer state over a source string.
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: u32,
    col: u32,
}

type LexResult<T> = Result<T, Diagnostic>;

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Tokenizes the entire source. The last token is always `Eof`.
    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek_at(&self, ahead: usize) -> u8 {
        self.bytes.get(self.pos + ahead).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        if let Some(&b) = self.bytes.get(self.pos) {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if b & 0xC0 != 0x80 {
                // Count characters, not UTF-8 continuation bytes.
                self.col += 1;
            }
        }
    }

    fn span_from(&self, start: usize, line: u32, col: u32) -> Span {
        Span {
            offset: start as u32,
            len: (self.pos - start) as u32,
            line,
            col,
        }
    }

    fn error_at(&self, message: impl Into<String>, start: usize, line: u32, col: u32) -> Diagnostic {
        Diagnostic::error(message, Some(self.span_from(start, line, col)))
    }

    fn skip_whitespace_and_comments(&mut self) -> LexResult<()> {
        loop {
            let b = self.peek_at(0);
            if b == 0 && self.pos >= self.bytes.len() {
                return Ok(());
            }
            if b.is_ascii_whitespace() {
                self.advance();
            } else if b == b'/' && self.peek_at(1) == b'/' {
                while self.pos < self.bytes.len() && self.peek_at(0) != b'\n' {
                    self.advance();
                }
            } else if b == b'/' && self.peek_at(1) == b'*' {
                let (start, line, col) = (self.pos, self.line, self.col);
                self.advance();
                self.advance();
                let mut depth = 1;
                while depth > 0 {
                    if self.pos >= self.bytes.len() {
                        return Err(self.error_at("unterminated block comment", start, line, col));
                    }
                    if self.peek_at(0) == b'/' && self.peek_at(1) == b'*' {
                        self.advance();
                        self.advance();
                        depth += 1;
                    } else if self.peek_at(0) == b'*' && self.peek_at(1) == b'/' {
                        self.advance();
                        self.advance();
                        depth -= 1;
                    } else {
                        self.advance();
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> LexResult<Token> {
        self.skip_whitespace_and_comments()?;

        let (start, line, col) = (self.pos, self.line, self.col);
        if self.pos >= self.bytes.len() {
            return Ok(Token::new(TokenKind::Eof, self.span_from(start, line, col)));
        }

        let b = self.peek_at(0);

        if b.is_ascii_digit() || (b == b'.' && self.peek_at(1).is_ascii_digit()) {
            let kind = self.lex_number(start, line, col)?;
            return Ok(Token::new(kind, self.span_from(start, line, col)));
        }

        if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 {
            while self.pos < self.bytes.len() {
                let c = self.peek_at(0);
                if c.is_ascii_alphanumeric() || c == b'_' || c >= 0x80 {
                    self.advance();
                } else {
                    break;
                }
            }
            let text = &self.src[start..self.pos];
            let kind = if text == "_" {
                TokenKind::Underscore
            } else {
                TokenKind::Ident(text.to_owned())
            };
            return Ok(Token::new(kind, self.span_from(start, line, col)));
        }

        let (kind, len) = match (b, self.peek_at(1), self.peek_at(2)) {
            (b'>', b'>', b'=') => (TokenKind::ShiftRightEqual, 3),
            (b'<', b'<', b'=') => (TokenKind::ShiftLeftEqual, 3),
            (b'&', b'&', _) => (TokenKind::AndAnd, 2),
            (b'&', b'=', _) => (TokenKind::AndEqual, 2),
            (b'|', b'|', _) => (TokenKind::OrOr, 2),
            (b'|', b'=', _) => (TokenKind::OrEqual, 2),
            (b'-', b'>', _) => (TokenKind::Arrow, 2),
            (b'-', b'-', _) => (TokenKind::MinusMinus, 2),
            (b'-', b'=', _) => (TokenKind::MinusEqual, 2),
            (b'+', b'+', _) => (TokenKind::PlusPlus, 2),
            (b'+', b'=', _) => (TokenKind::PlusEqual, 2),
            (b'=', b'=', _) => (TokenKind::EqualEqual, 2),
            (b'!', b'=', _) => (TokenKind::NotEqual, 2),
            (b'>', b'=', _) => (TokenKind::GreaterEqual, 2),
            (b'>', b'>', _) => (TokenKind::ShiftRight, 2),
            (b'<', b'=', _) => (TokenKind::LessEqual, 2),
            (b'<', b'<', _) => (TokenKind::ShiftLeft, 2),
            (b'*', b'=', _) => (TokenKind::StarEqual, 2),
            (b'/', b'=', _) => (TokenKind::SlashEqual, 2),
            (b'%', b'=', _) => (TokenKind::PercentEqual, 2),
            (b'^', b'=', _) => (TokenKind::XorEqual, 2),
            (b'&', _, _) => (TokenKind::And, 1),
            (b'|', _, _) => (TokenKind::Or, 1),
            (b'-', _, _) => (TokenKind::Minus, 1),
            (b'+', _, _) => (TokenKind::Plus, 1),
            (b'=', _, _) => (TokenKind::Equal, 1),
            (b'!', _, _) => (TokenKind::Bang, 1),
            (b'>', _, _) => (TokenKind::Greater, 1),
            (b'<', _, _) => (TokenKind::Less, 1),
            (b'*', _, _) => (TokenKind::Star, 1),
            (b'/', _, _) => (TokenKind::Slash, 1),
            (b'%', _, _) => (TokenKind::Percent, 1),
            (b'^', _, _) => (TokenKind::Xor, 1),
            (b'@', _, _) => (TokenKind::At, 1),
            (b'[', _, _) => (TokenKind::LBracket, 1),
            (b']', _, _) => (TokenKind::RBracket, 1),
            (b'{', _, _) => (TokenKind::LBrace, 1),
            (b'}', _, _) => (TokenKind::RBrace, 1),
            (b'(', _, _) => (TokenKind::LParen, 1),
            (b')', _, _) => (TokenKind::RParen, 1),
            (b':', _, _) => (TokenKind::Colon, 1),
            (b',', _, _) => (TokenKind::Comma, 1),
            (b'.', _, _) => (TokenKind::Period, 1),
            (b';', _, _) => (TokenKind::Semicolon, 1),
            (b'~', _, _) => (TokenKind::Tilde, 1),
            _ => {
                self.advance();
                let ch = self.src[start..].chars().next().unwrap_or('?');
                return Err(self.error_at(format!("invalid character '{ch}'"), start, line, col));
            }
        };
        for _ in 0..len {
            self.advance();
        }
        Ok(Token::new(kind, self.span_from(start, line, col)))
    }

    fn eat_digits(&mut self, hex: bool) -> usize {
        let begin = self.pos;
        loop {
            let c = self.peek_at(0);
            let ok = if hex {
                c.is_ascii_hexdigit()
            } else {
                c.is_ascii_digit()
            };
            if !ok {
                break;
            }
            self.advance();
        }
        self.pos - begin
    }

    /// Consumes `[eE][+-]?[0-9]+` (or the `p` form for hex floats) if present.
    fn eat_exponent(&mut self, marker: [u8; 2]) -> bool {
        let c = self.peek_at(0);
        if c != marker[0] && c != marker[1] {
            return false;
        }
        let sign = matches!(self.peek_at(1), b'+' | b'-');
        let digit_at = if sign { 2 } else { 1 };
        if !self.peek_at(digit_at).is_ascii_digit() {
            return false;
        }
        for _ in 0..digit_at {
            self.advance();
        }
        self.eat_digits(false);
        true
    }

    fn lex_number(&mut self, start: usize, line: u32, col: u32) -> LexResult<TokenKind> {
        if self.peek_at(0) == b'0' && matches!(self.peek_at(1), b'x' | b'X') {
            return self.lex_hex_number(start, line, col);
        }

        self.eat_digits(false);
        let mut is_float = false;
        if self.peek_at(0) == b'.' {
            self.advance();
            self.eat_digits(false);
            is_float = true;
        }
        if self.eat_exponent([b'e', b'E']) {
            is_float = true;
        }
        let text = &self.src[start..self.pos];

        match self.peek_at(0) {
            b'f' | b'h' => {
                let suffix = if self.peek_at(0) == b'f' {
                    FloatSuffix::F
                } else {
                    FloatSuffix::H
                };
                if !is_float && text.len() > 1 && text.starts_with('0') {
                    return Err(self.error_at("leading zeros are not allowed", start, line, col));
                }
                self.advance();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| self.error_at("invalid float literal", start, line, col))?;
                self.float_token(value, suffix, start, line, col)
            }
            b'i' | b'u' if !is_float => {
                let suffix = if self.peek_at(0) == b'i' {
                    IntSuffix::I
                } else {
                    IntSuffix::U
                };
                self.advance();
                let value = text.parse::<i64>().ok();
                self.int_token(value, suffix, start, line, col)
            }
            _ if is_float => {
                let value = text
                    .parse::<f64>()
                    .map_err(|_| self.error_at("invalid float literal", start, line, col))?;
                self.float_token(value, FloatSuffix::None, start, line, col)
            }
            _ => {
                let value = text.parse::<i64>().ok();
                self.int_token(value, IntSuffix::None, start, line, col)
            }
        }
    }

    fn lex_hex_number(&mut self, start: usize, line: u32, col: u32) -> LexResult<TokenKind> {
        self.advance();
        self.advance();
        let digits_start = self.pos;
        let int_digits = self.eat_digits(true);
        let int_end = self.pos;
        let mut frac = None;
        if self.peek_at(0) == b'.' {
            self.advance();
            let frac_start = self.pos;
            self.eat_digits(true);
            frac = Some(&self.src[frac_start..self.pos]);
        }
        let exp_start = self.pos;
        let has_exponent = self.eat_exponent([b'p', b'P']);

        if frac.is_none() && !has_exponent {
            if int_digits == 0 {
                return Err(self.error_at("invalid hexadecimal literal", start, line, col));
            }
            let value = i64::from_str_radix(&self.src[digits_start..int_end], 16).ok();
            let suffix = match self.peek_at(0) {
                b'i' => IntSuffix::I,
                b'u' => IntSuffix::U,
                _ => IntSuffix::None,
            };
            if suffix != IntSuffix::None {
                self.advance();
            }
            return self.int_token(value, suffix, start, line, col);
        }

        let frac = frac.unwrap_or("");
        if int_digits == 0 && frac.is_empty() {
            return Err(self.error_at("invalid hexadecimal float literal", start, line, col));
        }
        let mut mantissa = 0f64;
        for c in self.src[digits_start..int_end].chars().chain(frac.chars()) {
            mantissa = mantissa * 16.0 + f64::from(c.to_digit(16).unwrap_or(0));
        }
        let mut exponent: i64 = -4 * frac.len() as i64;
        if has_exponent {
            let text = self.src[exp_start + 1..self.pos].trim_start_matches('+');
            let exp = text
                .parse::<i64>()
                .map_err(|_| self.error_at("invalid exponent", start, line, col))?;
            exponent += exp;
        }
        let value = mantissa * 2f64.powi(exponent.clamp(-2000, 2000) as i32);
        let mut suffix = FloatSuffix::None;
        if has_exponent {
            match self.peek_at(0) {
                b'f' => suffix = FloatSuffix::F,
                b'h' => suffix = FloatSuffix::H,
                _ => {}
            }
            if suffix != FloatSuffix::None {
                self.advance();
            }
        }
        self.float_token(value, suffix, start, line, col)
    }

    fn int_token(
        &self,
        value: Option<i64>,
        suffix: IntSuffix,
        start: usize,
        line: u32,
        col: u32,
    ) -> LexResult<TokenKind> {
        let max = match suffix {
            IntSuffix::None => i64::MAX,
            IntSuffix::I => i64::from(i32::MAX),
            IntSuffix::U => i64::from(u32::MAX),
        };
        match value {
            Some(value) if value <= max => Ok(TokenKind::Int { value, suffix }),
            _ => Err(self.error_at(
                format!("value cannot be represented as '{}'", int_type_name(suffix)),
                start,
                line,
                col,
            )),
        }
    }

    fn float_token(
        &self,
        value: f64,
        suffix: FloatSuffix,
        start: usize,
        line: u32,
        col: u32,
    ) -> LexResult<TokenKind> {
        let (value, max) = match suffix {
            FloatSuffix::None => (value, f64::MAX),
            FloatSuffix::F => (f64::from(value as f32), f64::from(f32::MAX)),
            FloatSuffix::H => (f64::from(value as f32), 65504.0),
        };
        if !value.is_finite() || value > max {
            return Err(self.error_at("value cannot be represented as a float", start, line, col));
        }
        Ok(TokenKind::Float { value, suffix })
    }
}

fn int_type_name(suffix: IntSuffix) -> &'static str {
    match suffix {
        IntSuffix::None => "abstract-int",
        IntSuffix::I => "i32",
        IntSuffix::U => "u32",
    }
}

/// Tokenizes `src`.
pub fn tokenize(src: &str) -> LexResult<Vec<Token>> {
    Lexer::new(src).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("source should lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_owned())
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            kinds("let x: f32 = 1.5;"),
            vec![
                ident("let"),
                ident("x"),
                TokenKind::Colon,
                ident("f32"),
                TokenKind::Equal,
                TokenKind::Float {
                    value: 1.5,
                    suffix: FloatSuffix::None
                },
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_numeric_forms() {
        let float = |value, suffix| TokenKind::Float { value, suffix };
        let int = |value, suffix| TokenKind::Int { value, suffix };
        assert_eq!(kinds("1.")[0], float(1.0, FloatSuffix::None));
        assert_eq!(kinds(".25")[0], float(0.25, FloatSuffix::None));
        assert_eq!(kinds("1e3")[0], float(1000.0, FloatSuffix::None));
        assert_eq!(kinds("2f")[0], float(2.0, FloatSuffix::F));
        assert_eq!(kinds("0.5h")[0], float(0.5, FloatSuffix::H));
        assert_eq!(kinds("0x1p4")[0], float(16.0, FloatSuffix::None));
        assert_eq!(kinds("0x1.8p1f")[0], float(3.0, FloatSuffix::F));
        assert_eq!(kinds("0x1f")[0], int(31, IntSuffix::None));
        assert_eq!(kinds("7u")[0], int(7, IntSuffix::U));
        assert_eq!(kinds("0i")[0], int(0, IntSuffix::I));
    }

    #[test]
    fn f32_literals_are_rounded() {
        match kinds("0.1f")[0] {
            TokenKind::Float { value, .. } => assert_eq!(value, f64::from(0.1f32)),
            ref other => panic!("unexpected token {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_ints() {
        assert!(tokenize("4294967296u").is_err());
        assert!(tokenize("2147483648i").is_err());
        assert!(tokenize("2147483648").is_ok());
    }

    #[test]
    fn skips_nested_comments() {
        assert_eq!(
            kinds("a /* x /* y */ z */ // tail\nb"),
            vec![ident("a"), ident("b"), TokenKind::Eof]
        );
        assert!(tokenize("/* open").is_err());
    }

    #[test]
    fn lexes_multi_char_operators() {
        assert_eq!(
            kinds("a>>=b--;_=c&&d"),
            vec![
                ident("a"),
                TokenKind::ShiftRightEqual,
                ident("b"),
                TokenKind::MinusMinus,
                TokenKind::Semicolon,
                TokenKind::Underscore,
                TokenKind::Equal,
                ident("c"),
                TokenKind::AndAnd,
                ident("d"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_positions() {
        let tokens = tokenize("fn\n  main").expect("source should lex");
        assert_eq!((tokens[1].span.line, tokens[1].span.col), (2, 3));
        assert_eq!(tokens[1].span.offset, 5);
    }

    #[test]
    fn rejects_invalid_character() {
        let err = tokenize("let a = $;").expect_err("'$' is not WGSL");
        assert_eq!(err.message, "invalid character '$'");
    }
}
