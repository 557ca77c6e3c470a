//! Tokenizer and recursive-descent parser for selector patterns.
//!
//! Keywords (`and`, `or`, `not`, `text`, `matches`) are lexed as names and
//! only take on meaning by position, so an attribute literally called `not`
//! or `text` can still be addressed by a name test.
use regex::Regex;

use super::{Axis, CompareOp, Comparison, Expr, LocationPath, NameTest, PatternError, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Slash,
    DoubleSlash,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Pipe,
    Eq,
    Ne,
    Comma,
    At,
    Dot,
    Star,
    Name(String),
    Literal(String),
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Slash => "'/'".to_owned(),
            TokenKind::DoubleSlash => "'//'".to_owned(),
            TokenKind::LBracket => "'['".to_owned(),
            TokenKind::RBracket => "']'".to_owned(),
            TokenKind::LParen => "'('".to_owned(),
            TokenKind::RParen => "')'".to_owned(),
            TokenKind::Pipe => "'|'".to_owned(),
            TokenKind::Eq => "'='".to_owned(),
            TokenKind::Ne => "'!='".to_owned(),
            TokenKind::Comma => "','".to_owned(),
            TokenKind::At => "'@'".to_owned(),
            TokenKind::Dot => "'.'".to_owned(),
            TokenKind::Star => "'*'".to_owned(),
            TokenKind::Name(n) => format!("name '{n}'"),
            TokenKind::Literal(_) => "string literal".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn tokenize(src: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '/' => {
                if chars.next_if(|&(_, n)| n == '/').is_some() {
                    TokenKind::DoubleSlash
                } else {
                    TokenKind::Slash
                }
            }
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            '=' => TokenKind::Eq,
            ',' => TokenKind::Comma,
            '@' => TokenKind::At,
            '.' => TokenKind::Dot,
            '*' => TokenKind::Star,
            '!' => {
                if chars.next_if(|&(_, n)| n == '=').is_none() {
                    return Err(PatternError::new(offset, "expected '=' after '!'"));
                }
                TokenKind::Ne
            }
            '\'' | '"' => {
                let quote = c;
                let mut literal = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == quote {
                        closed = true;
                        break;
                    }
                    literal.push(n);
                }
                if !closed {
                    return Err(PatternError::new(offset, "unterminated string literal"));
                }
                TokenKind::Literal(literal)
            }
            c if is_name_start(c) => {
                let mut name = String::from(c);
                while let Some((_, n)) = chars.next_if(|&(_, n)| is_name_char(n)) {
                    name.push(n);
                }
                TokenKind::Name(name)
            }
            other => {
                return Err(PatternError::new(
                    offset,
                    format!("unexpected character {other:?}"),
                ));
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

/// Parses a full pattern into its union of location paths.
pub(super) fn parse(src: &str) -> Result<Vec<LocationPath>, PatternError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(PatternError::new(0, "empty pattern"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: src.len(),
    };

    let mut paths = vec![parser.location_path()?];
    while parser.eat(&TokenKind::Pipe) {
        paths.push(parser.location_path()?);
    }
    if let Some(tok) = parser.tokens.get(parser.pos) {
        return Err(PatternError::new(
            tok.offset,
            format!("unexpected {}", tok.kind.describe()),
        ));
    }
    Ok(paths)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.offset)
    }

    fn kind_at(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + ahead).map(|t| &t.kind)
    }

    fn is_at(&self, ahead: usize, kind: &TokenKind) -> bool {
        self.kind_at(ahead) == Some(kind)
    }

    fn is_keyword_at(&self, ahead: usize, keyword: &str) -> bool {
        if let Some(TokenKind::Name(n)) = self.kind_at(ahead) {
            n == keyword
        } else {
            false
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.is_at(0, kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, wanted: &str) -> PatternError {
        let found = self
            .kind_at(0)
            .map_or_else(|| "end of pattern".to_owned(), TokenKind::describe);
        PatternError::new(self.offset(), format!("expected {wanted}, found {found}"))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), PatternError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    fn location_path(&mut self) -> Result<LocationPath, PatternError> {
        let axis = if self.eat(&TokenKind::DoubleSlash) {
            Axis::Descendant
        } else {
            self.eat(&TokenKind::Slash);
            Axis::Child
        };
        Ok(LocationPath {
            steps: self.steps(axis)?,
        })
    }

    fn steps(&mut self, first_axis: Axis) -> Result<Vec<Step>, PatternError> {
        let mut steps = vec![self.step(first_axis)?];
        loop {
            let axis = if self.eat(&TokenKind::Slash) {
                Axis::Child
            } else if self.eat(&TokenKind::DoubleSlash) {
                Axis::Descendant
            } else {
                break;
            };
            steps.push(self.step(axis)?);
        }
        Ok(steps)
    }

    fn step(&mut self, axis: Axis) -> Result<Step, PatternError> {
        let name = if self.eat(&TokenKind::Star) {
            NameTest::Any
        } else if let Some(TokenKind::Name(n)) = self.kind_at(0) {
            let name = NameTest::Name(n.clone());
            self.pos += 1;
            name
        } else {
            return Err(self.unexpected("a name or '*'"));
        };

        let mut predicates = Vec::new();
        while self.eat(&TokenKind::LBracket) {
            predicates.push(self.or_expr()?);
            self.expect(&TokenKind::RBracket)?;
        }
        Ok(Step {
            axis,
            name,
            predicates,
        })
    }

    fn or_expr(&mut self) -> Result<Expr, PatternError> {
        let mut lhs = self.and_expr()?;
        while self.is_keyword_at(0, "or") {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, PatternError> {
        let mut lhs = self.unary()?;
        while self.is_keyword_at(0, "and") {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, PatternError> {
        if self.is_keyword_at(0, "not") && self.is_at(1, &TokenKind::LParen) {
            self.pos += 2;
            let inner = self.or_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.eat(&TokenKind::LParen) {
            let inner = self.or_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(inner);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, PatternError> {
        if self.is_keyword_at(0, "text") && self.is_at(1, &TokenKind::LParen) {
            self.pos += 2;
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::Text(self.comparison()?));
        }

        if self.is_keyword_at(0, "matches") && self.is_at(1, &TokenKind::LParen) {
            self.pos += 2;
            if !self.is_keyword_at(0, "text") {
                return Err(self.unexpected("text()"));
            }
            self.pos += 1;
            self.expect(&TokenKind::LParen)?;
            self.expect(&TokenKind::RParen)?;
            self.expect(&TokenKind::Comma)?;
            let regex_offset = self.offset();
            let source = self.literal()?;
            let re = Regex::new(&source).map_err(|e| {
                PatternError::new(regex_offset, format!("invalid regular expression: {e}"))
            })?;
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::Matches(re));
        }

        if self.eat(&TokenKind::At) {
            if let Some(TokenKind::Name(n)) = self.kind_at(0) {
                if n.eq_ignore_ascii_case("type") {
                    self.pos += 1;
                    return Ok(Expr::Type(self.comparison()?));
                }
            }
            return Err(self.unexpected("'Type' (the only supported attribute test)"));
        }

        if self.is_at(0, &TokenKind::Dot) {
            if self.is_at(1, &TokenKind::DoubleSlash) {
                if self.is_keyword_at(2, "text")
                    && self.is_at(3, &TokenKind::LParen)
                    && self.is_at(4, &TokenKind::RParen)
                {
                    self.pos += 5;
                    return Ok(Expr::SubtreeText);
                }
                self.pos += 2;
                return Ok(Expr::Exists(self.steps(Axis::Descendant)?));
            }
            if self.is_at(1, &TokenKind::Slash) {
                self.pos += 2;
                return Ok(Expr::Exists(self.steps(Axis::Child)?));
            }
            self.pos += 1;
            return Err(self.unexpected("'/' or '//' after '.'"));
        }

        if self.is_at(0, &TokenKind::Star) || matches!(self.kind_at(0), Some(TokenKind::Name(_)))
        {
            return Ok(Expr::Exists(self.steps(Axis::Child)?));
        }

        Err(self.unexpected("a predicate"))
    }

    fn comparison(&mut self) -> Result<Option<Comparison>, PatternError> {
        let op = if self.eat(&TokenKind::Eq) {
            CompareOp::Eq
        } else if self.eat(&TokenKind::Ne) {
            CompareOp::Ne
        } else {
            return Ok(None);
        };
        let literal = self.literal()?;
        Ok(Some(Comparison { op, literal }))
    }

    fn literal(&mut self) -> Result<String, PatternError> {
        if let Some(TokenKind::Literal(s)) = self.kind_at(0) {
            let s = s.clone();
            self.pos += 1;
            Ok(s)
        } else {
            Err(self.unexpected("a quoted string"))
        }
    }
}
