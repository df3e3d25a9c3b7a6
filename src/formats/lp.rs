//! The LP text format.
//!
//! A model is a sequence of `;` terminated statements.  The first one is
//! the objective, optionally introduced by `max:` or `min:`.  It is
//! followed by constraints, optionally labelled `name:`, and by
//! declaration sections:
//!
//! ```text
//! /* objective */
//! max: 143 x + 60 y;
//!
//! land: 120 x + 210 y <= 15000;
//! labour: 110 x + 30 y <= 4000;
//! R3: x + y <= 75;
//! R3: >= 10;              // second bound on an existing row
//! -5 <= z <= 5;           // unlabelled single variable relations are bounds
//! w >= -1e30;             // -1e30 is minus infinity
//!
//! int x;
//! sec z;
//! sos2
//! s1: x:1, y:2, z:3 <= 2;
//! ```
//!
//! Sections are `int`, `bin`, `sec` (semi-continuous), `sin`
//! (semi-continuous integer), `free` and `sos1`, `sos2`, ... whose entries
//! list `column:weight` members followed by `<= priority`.   In a plain
//! `sos` section the number after `<=` is the set type.   An `sos` section
//! runs to the next section keyword or the end of the text.

use super::{format_number, LpFormatError};
use crate::solver::core::ConstraintType;
use crate::solver::model::{Model, ModelError};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

// ---------------------------------
// tokens
// ---------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }

    fn constraint_type(self) -> ConstraintType {
        match self {
            Relation::Le => ConstraintType::Le,
            Relation::Ge => ConstraintType::Ge,
            Relation::Eq => ConstraintType::Eq,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(f64),
    Rel(Relation),
    Colon,
    Semi,
    Comma,
    Plus,
    Minus,
    Star,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    line: usize,
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c >= 0x80 || b"_[]{}!#$%&@~'".contains(&c)
}

fn is_ident_char(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == b'.'
}

fn tokenize(text: &str) -> Result<Vec<Token>, LpFormatError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    let syntax = |line: usize, message: String| LpFormatError::Syntax { line, message };

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b'\n' => {
                line += 1;
                i += 1;
                continue;
            }
            c if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let opened = line;
                i += 2;
                loop {
                    match bytes.get(i) {
                        None => return Err(syntax(opened, "unterminated comment".into())),
                        Some(b'*') if bytes.get(i + 1) == Some(&b'/') => {
                            i += 2;
                            break;
                        }
                        Some(b'\n') => line += 1,
                        Some(_) => {}
                    }
                    i += 1;
                }
                continue;
            }
            b'<' => {
                i += 1;
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                }
                TokenKind::Rel(Relation::Le)
            }
            b'>' => {
                i += 1;
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                }
                TokenKind::Rel(Relation::Ge)
            }
            b'=' => {
                i += 1;
                match bytes.get(i) {
                    Some(b'<') => {
                        i += 1;
                        TokenKind::Rel(Relation::Le)
                    }
                    Some(b'>') => {
                        i += 1;
                        TokenKind::Rel(Relation::Ge)
                    }
                    _ => TokenKind::Rel(Relation::Eq),
                }
            }
            b':' => {
                i += 1;
                TokenKind::Colon
            }
            b';' => {
                i += 1;
                TokenKind::Semi
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b'+' => {
                i += 1;
                TokenKind::Plus
            }
            b'-' => {
                i += 1;
                TokenKind::Minus
            }
            b'*' => {
                i += 1;
                TokenKind::Star
            }
            c if c.is_ascii_digit() || c == b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // an exponent only when digits follow, so that "3e" reads
                // as 3 times column "e"
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut k = i + 1;
                    if k < bytes.len() && (bytes[k] == b'+' || bytes[k] == b'-') {
                        k += 1;
                    }
                    if k < bytes.len() && bytes[k].is_ascii_digit() {
                        i = k;
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text = &text[start..i];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| syntax(line, format!("bad number \"{}\"", text)))?;
                TokenKind::Number(value)
            }
            c if is_ident_start(c) => {
                while i < bytes.len() && is_ident_char(bytes[i]) {
                    i += 1;
                }
                TokenKind::Ident(text[start..i].to_string())
            }
            c => {
                return Err(syntax(
                    line,
                    format!("unexpected character '{}'", c as char),
                ))
            }
        };
        tokens.push(Token { kind, line });
    }
    Ok(tokens)
}

// ---------------------------------
// parser
// ---------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Int,
    Bin,
    Sec,
    Sin,
    Free,
    /// `Some(type)` for `sos1`, `sos2`, ..., `None` for a plain `sos`
    Sos(Option<usize>),
}

impl Section {
    fn from_keyword(word: &str) -> Option<Self> {
        let word = word.to_ascii_lowercase();
        match word.as_str() {
            "int" => Some(Section::Int),
            "bin" => Some(Section::Bin),
            "sec" => Some(Section::Sec),
            "sin" => Some(Section::Sin),
            "free" => Some(Section::Free),
            "sos" => Some(Section::Sos(None)),
            _ => word
                .strip_prefix("sos")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .map(|n| Section::Sos(Some(n))),
        }
    }
}

fn is_infinity_word(word: &str) -> bool {
    ["inf", "infinity", "infinite"]
        .iter()
        .any(|w| word.eq_ignore_ascii_case(w))
}

/// Linear expression: 1-based `(column, coefficient)` terms plus a constant.
/// Terms with a zero coefficient are kept so that they still declare
/// their column.
#[derive(Debug, Default, Clone)]
struct LinearExpr {
    terms: Vec<(usize, f64)>,
    constant: f64,
}

impl LinearExpr {
    fn add_term(&mut self, col: usize, coef: f64) {
        match self.terms.iter_mut().find(|(c, _)| *c == col) {
            Some(term) => term.1 += coef,
            None => self.terms.push((col, coef)),
        }
    }

    fn subtract(&mut self, other: &LinearExpr) {
        for &(col, coef) in other.terms.iter() {
            self.add_term(col, -coef);
        }
        self.constant -= other.constant;
    }

    fn nonzero_terms(&self) -> Vec<(usize, f64)> {
        self.terms.iter().copied().filter(|t| t.1 != 0.0).collect()
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    model: Model,
    columns: HashMap<String, usize>,
    infinity: f64,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Result<Self, LpFormatError> {
        let model = Model::new(0, 0).ok_or(LpFormatError::Model {
            line: 0,
            source: ModelError::Allocation,
        })?;
        let infinity = model.settings().infinity;
        Ok(Self {
            tokens,
            pos: 0,
            model,
            columns: HashMap::new(),
            infinity,
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.peek_at(0)
    }

    fn peek_at(&self, k: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + k).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| &t.kind);
        self.pos += 1;
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn error(&self, message: impl Into<String>) -> LpFormatError {
        LpFormatError::Syntax {
            line: self.line(),
            message: message.into(),
        }
    }

    fn model_error(&self, source: ModelError) -> LpFormatError {
        LpFormatError::Model {
            line: self.line(),
            source,
        }
    }

    fn expect_semi(&mut self) -> Result<(), LpFormatError> {
        match self.peek() {
            Some(TokenKind::Semi) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error("expected ';'")),
        }
    }

    fn expect_ident(&mut self) -> Result<String, LpFormatError> {
        match self.peek() {
            Some(TokenKind::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.error("expected a name")),
        }
    }

    fn signed_number(&mut self) -> Result<f64, LpFormatError> {
        let mut sign = 1.0;
        loop {
            match self.peek() {
                Some(TokenKind::Plus) => self.pos += 1,
                Some(TokenKind::Minus) => {
                    sign = -sign;
                    self.pos += 1
                }
                Some(TokenKind::Number(v)) => {
                    let v = *v;
                    self.pos += 1;
                    return Ok(sign * v);
                }
                Some(TokenKind::Ident(w)) if is_infinity_word(w) => {
                    self.pos += 1;
                    return Ok(sign * self.infinity);
                }
                _ => return Err(self.error("expected a number")),
            }
        }
    }

    // 1-based index of column `name`, created on first use
    fn column(&mut self, name: &str) -> Result<usize, LpFormatError> {
        if let Some(&col) = self.columns.get(name) {
            return Ok(col);
        }
        let col = self
            .model
            .add_column_ex(&[])
            .map_err(|e| self.model_error(e))?;
        if name != format!("C{}", col) {
            self.model
                .set_col_name(col, name)
                .map_err(|e| self.model_error(e))?;
        }
        self.columns.insert(name.to_string(), col);
        Ok(col)
    }

    fn section_ahead(&self) -> Option<Section> {
        match (self.peek(), self.peek_at(1)) {
            (Some(TokenKind::Ident(word)), next) if next != Some(&TokenKind::Colon) => {
                Section::from_keyword(word)
            }
            _ => None,
        }
    }

    fn label_ahead(&self) -> Option<String> {
        match (self.peek(), self.peek_at(1)) {
            (Some(TokenKind::Ident(name)), Some(TokenKind::Colon)) => Some(name.clone()),
            _ => None,
        }
    }

    fn parse(mut self) -> Result<Model, LpFormatError> {
        if self.at_end() {
            return Ok(self.model);
        }
        self.parse_objective()?;

        while !self.at_end() {
            if self.peek() == Some(&TokenKind::Semi) {
                self.pos += 1;
            } else if let Some(section) = self.section_ahead() {
                self.pos += 1;
                match section {
                    Section::Sos(kind) => self.parse_sos_section(kind)?,
                    _ => self.parse_declarations(section)?,
                }
            } else {
                self.parse_constraint()?;
            }
        }
        Ok(self.model)
    }

    fn parse_objective(&mut self) -> Result<(), LpFormatError> {
        if let Some(word) = self.label_ahead() {
            let sense = match word.to_ascii_lowercase().as_str() {
                "max" | "maximize" | "maximise" | "maximum" => Some(true),
                "min" | "minimize" | "minimise" | "minimum" => Some(false),
                _ => None,
            };
            self.pos += 2;
            match sense {
                Some(maximize) => self.model.set_sense(maximize),
                None => self
                    .model
                    .set_row_name(0, &word)
                    .map_err(|e| self.model_error(e))?,
            }
        }
        let expr = self.parse_expression()?;
        if let Some(TokenKind::Rel(_)) = self.peek() {
            return Err(self.error("the objective can not contain a relational operator"));
        }
        self.expect_semi()?;

        self.model
            .set_obj_fn_ex(&expr.nonzero_terms())
            .map_err(|e| self.model_error(e))?;
        self.model
            .set_rh(0, expr.constant)
            .map_err(|e| self.model_error(e))?;
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<LinearExpr, LpFormatError> {
        let mut expr = LinearExpr::default();
        loop {
            let mut sign = 1.0;
            let mut signed = false;
            while let Some(TokenKind::Plus | TokenKind::Minus) = self.peek() {
                if self.peek() == Some(&TokenKind::Minus) {
                    sign = -sign;
                }
                signed = true;
                self.pos += 1;
            }

            match self.peek().cloned() {
                Some(TokenKind::Number(v)) => {
                    self.pos += 1;
                    if self.peek() == Some(&TokenKind::Star) {
                        self.pos += 1;
                    }
                    match self.peek().cloned() {
                        Some(TokenKind::Ident(name)) if !is_infinity_word(&name) => {
                            self.pos += 1;
                            let col = self.column(&name)?;
                            expr.add_term(col, sign * v);
                        }
                        _ => expr.constant += sign * v,
                    }
                }
                Some(TokenKind::Ident(name)) if is_infinity_word(&name) => {
                    self.pos += 1;
                    expr.constant += sign * self.infinity;
                }
                Some(TokenKind::Ident(name)) => {
                    self.pos += 1;
                    let col = self.column(&name)?;
                    expr.add_term(col, sign);
                }
                _ if signed => return Err(self.error("expected a term after the sign")),
                _ => return Ok(expr),
            }

            if !matches!(self.peek(), Some(TokenKind::Plus | TokenKind::Minus)) {
                return Ok(expr);
            }
        }
    }

    /// An expression that must contain at least one term or number.
    fn parse_operand(&mut self) -> Result<LinearExpr, LpFormatError> {
        let start = self.pos;
        let expr = self.parse_expression()?;
        if self.pos == start {
            return Err(self.error("expected an expression"));
        }
        Ok(expr)
    }

    fn parse_relation(&mut self) -> Result<Relation, LpFormatError> {
        match self.peek() {
            Some(TokenKind::Rel(rel)) => {
                let rel = *rel;
                self.pos += 1;
                Ok(rel)
            }
            _ => Err(self.error("expected a relational operator")),
        }
    }

    fn parse_constraint(&mut self) -> Result<(), LpFormatError> {
        let label = self.label_ahead();
        if label.is_some() {
            self.pos += 2;
        }

        // `name: <= value;` sets the second bound of an existing row
        if let (Some(name), Some(TokenKind::Rel(_))) = (&label, self.peek()) {
            let rel = self.parse_relation()?;
            let value = self.signed_number()?;
            self.expect_semi()?;
            return self.update_row_bound(name, rel, value);
        }

        let first = self.parse_operand()?;
        let rel = self.parse_relation()?;
        let second = self.parse_operand()?;
        let third = match self.peek() {
            Some(TokenKind::Rel(_)) => {
                let rel2 = self.parse_relation()?;
                Some((rel2, self.parse_operand()?))
            }
            _ => None,
        };
        self.expect_semi()?;

        match third {
            None => {
                // move everything to the form `terms rel constant`
                let mut lhs = first;
                lhs.subtract(&second);
                let rhs = -lhs.constant;
                if label.is_none() && lhs.terms.len() == 1 && lhs.terms[0].1 != 0.0 {
                    let (col, coef) = lhs.terms[0];
                    let value = self.scale_bound(rhs, coef);
                    let rel = if coef < 0.0 { rel.flipped() } else { rel };
                    return self.set_column_bound(col, rel, value);
                }
                self.add_row(label, &lhs.nonzero_terms(), rel, rhs)
            }
            Some((rel2, third)) => {
                if !first.terms.is_empty() || !third.terms.is_empty() {
                    return Err(self.error("the outer parts of a double inequality must be constants"));
                }
                if rel != rel2 || rel == Relation::Eq {
                    return Err(self.error("a double inequality needs two equal operators"));
                }
                let middle = second.constant;
                let (lo, hi) = match rel {
                    Relation::Le => (first.constant - middle, third.constant - middle),
                    _ => (third.constant - middle, first.constant - middle),
                };
                if label.is_none() && second.terms.len() == 1 && second.terms[0].1 != 0.0 {
                    let (col, coef) = second.terms[0];
                    let (mut lo, mut hi) = (self.scale_bound(lo, coef), self.scale_bound(hi, coef));
                    if coef < 0.0 {
                        std::mem::swap(&mut lo, &mut hi);
                    }
                    self.set_column_bound(col, Relation::Ge, lo)?;
                    return self.set_column_bound(col, Relation::Le, hi);
                }
                let row_rel = if rel == Relation::Le {
                    Relation::Le
                } else {
                    Relation::Ge
                };
                let rhs = if row_rel == Relation::Le { hi } else { lo };
                let row = self.add_row_index(label, &second.nonzero_terms(), row_rel, rhs)?;
                let two_sided = match row_rel {
                    Relation::Le => lo > -self.infinity,
                    _ => hi < self.infinity,
                };
                if !two_sided {
                    return Ok(());
                }
                self.model
                    .set_rh_range(row, lo, hi)
                    .map_err(|e| self.model_error(e))
            }
        }
    }

    // `value / coef`, keeping infinite values infinite
    fn scale_bound(&self, value: f64, coef: f64) -> f64 {
        if value.abs() >= self.infinity {
            value.signum() * coef.signum() * self.infinity
        } else {
            value / coef
        }
    }

    fn set_column_bound(
        &mut self,
        col: usize,
        rel: Relation,
        value: f64,
    ) -> Result<(), LpFormatError> {
        let result = match rel {
            Relation::Le => self.model.set_upbo(col, value),
            Relation::Ge => self.model.set_lowbo(col, value),
            Relation::Eq => self.model.set_bounds(col, value, value),
        };
        result.map_err(|e| self.model_error(e))
    }

    fn add_row(
        &mut self,
        label: Option<String>,
        terms: &[(usize, f64)],
        rel: Relation,
        rhs: f64,
    ) -> Result<(), LpFormatError> {
        self.add_row_index(label, terms, rel, rhs).map(|_| ())
    }

    fn add_row_index(
        &mut self,
        label: Option<String>,
        terms: &[(usize, f64)],
        rel: Relation,
        rhs: f64,
    ) -> Result<usize, LpFormatError> {
        if let Some(ref name) = label {
            if self.model.get_nameindex(name, true).is_ok() {
                return Err(self.error(format!("duplicate row name \"{}\"", name)));
            }
        }
        let row = self
            .model
            .add_constraint_ex(terms, rel.constraint_type(), rhs)
            .map_err(|e| self.model_error(e))?;

        // a `>= -infinity` or `<= infinity` row does not restrict anything
        let unbounded = match rel {
            Relation::Le => rhs >= self.infinity,
            Relation::Ge => rhs <= -self.infinity,
            Relation::Eq => false,
        };
        if unbounded {
            self.model
                .set_constr_type(row, ConstraintType::Free)
                .map_err(|e| self.model_error(e))?;
        }
        if let Some(name) = label {
            if name != format!("R{}", row) {
                self.model
                    .set_row_name(row, &name)
                    .map_err(|e| self.model_error(e))?;
            }
        }
        Ok(row)
    }

    fn update_row_bound(&mut self, name: &str, rel: Relation, value: f64) -> Result<(), LpFormatError> {
        let row = self
            .model
            .get_nameindex(name, true)
            .map_err(|e| self.model_error(e))?;
        let (mut lo, mut hi) = self
            .model
            .get_rh_range(row)
            .map_err(|e| self.model_error(e))?;
        match rel {
            Relation::Le => hi = value,
            Relation::Ge => lo = value,
            Relation::Eq => (lo, hi) = (value, value),
        }
        self.model
            .set_rh_range(row, lo, hi)
            .map_err(|e| self.model_error(e))
    }

    fn parse_declarations(&mut self, section: Section) -> Result<(), LpFormatError> {
        loop {
            match self.peek().cloned() {
                Some(TokenKind::Semi) => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(TokenKind::Comma) => self.pos += 1,
                Some(TokenKind::Ident(name)) => {
                    self.pos += 1;
                    let col = self.column(&name)?;
                    let model = &mut self.model;
                    let result = match section {
                        Section::Int => model.set_int(col, true),
                        Section::Bin => model.set_binary(col, true),
                        Section::Sec => model.set_semicont(col, true),
                        Section::Sin => model
                            .set_semicont(col, true)
                            .and_then(|_| model.set_int(col, true)),
                        Section::Free => model.set_lowbo(col, f64::NEG_INFINITY),
                        Section::Sos(_) => Ok(()),
                    };
                    result.map_err(|e| self.model_error(e))?;
                }
                _ => return Err(self.error("expected a column name or ';'")),
            }
        }
    }

    fn parse_sos_section(&mut self, kind: Option<usize>) -> Result<(), LpFormatError> {
        while !self.at_end() && self.section_ahead().is_none() {
            let name = self.expect_ident()?;
            if self.advance() != Some(&TokenKind::Colon) {
                self.pos -= 1;
                return Err(self.error("expected ':' after the set name"));
            }

            let mut members = Vec::new();
            loop {
                let column = self.expect_ident()?;
                let col = self.column(&column)?;
                let weight = if self.peek() == Some(&TokenKind::Colon) {
                    self.pos += 1;
                    self.signed_number()?
                } else {
                    (members.len() + 1) as f64
                };
                members.push((col, weight));
                if self.peek() != Some(&TokenKind::Comma) {
                    break;
                }
                self.pos += 1;
            }

            let limit = match self.peek() {
                Some(TokenKind::Rel(Relation::Le)) => {
                    self.pos += 1;
                    Some(self.signed_number()?)
                }
                _ => None,
            };
            self.expect_semi()?;

            let count = self.model.sos_sets().len();
            let (sos_type, priority) = match (kind, limit) {
                (Some(t), Some(p)) => (t, p as i32),
                (Some(t), None) => (t, count as i32 + 1),
                (None, Some(t)) if t >= 1.0 => (t as usize, count as i32 + 1),
                (None, _) => return Err(self.error("a plain sos entry needs '<= type'")),
            };
            self.model
                .add_sos(&name, sos_type, priority, &members)
                .map_err(|e| self.model_error(e))?;
        }
        Ok(())
    }
}

// ---------------------------------
// writer
// ---------------------------------

struct Writer<'a> {
    model: &'a Model,
}

impl<'a> Writer<'a> {
    fn number(&self, v: f64) -> String {
        format_number(self.model.settings().to_external(v))
    }

    fn terms(&self, terms: &[(usize, f64)]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        let mut text = Vec::with_capacity(terms.len());
        for &(j, coef) in terms {
            let name = self.model.col_name(j);
            let sign = if coef < 0.0 { '-' } else { '+' };
            if coef.abs() == 1.0 {
                text.push(format!("{}{}", sign, name));
            } else {
                text.push(format!("{}{} {}", sign, format_number(coef.abs()), name));
            }
        }
        text.join(" ")
    }

    // 0-based row entries sorted by column
    fn row_terms(&self, i: usize) -> Vec<(usize, f64)> {
        self.model.matrix.row(i)
    }

    fn objective_terms(&self) -> Vec<(usize, f64)> {
        let objective = self.model.matrix.objective();
        let nonzero: Vec<(usize, f64)> = objective
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0.0)
            .map(|(j, &c)| (j, c))
            .collect();

        // columns are numbered in order of first appearance when read
        // back; list them all in the objective if that order would differ
        let mut seen = vec![false; self.model.columns()];
        let mut order = Vec::with_capacity(seen.len());
        let mut visit = |j: usize| {
            if !seen[j] {
                seen[j] = true;
                order.push(j);
            }
        };
        nonzero.iter().for_each(|&(j, _)| visit(j));
        for i in 0..self.model.rows() {
            self.row_terms(i).iter().for_each(|&(j, _)| visit(j));
        }
        for (j, col) in self.model.cols.iter().enumerate() {
            let declared = col.integer || col.semicont;
            if col.lower != 0.0 || col.upper != f64::INFINITY || declared {
                visit(j);
            }
        }
        for sos in self.model.sos_sets() {
            sos.columns.iter().for_each(|&j| visit(j));
        }

        if order.iter().copied().eq(0..self.model.columns()) {
            nonzero
        } else {
            objective.iter().copied().enumerate().collect()
        }
    }

    fn write(&self, out: &mut dyn Write) -> io::Result<()> {
        let model = self.model;

        writeln!(out, "/* {} */", model.get_lp_name())?;
        writeln!(out)?;
        writeln!(out, "/* Objective function */")?;
        let sense = if model.is_maxim() { "max" } else { "min" };
        let objective = self.objective_terms();
        let mut parts = Vec::new();
        if !objective.is_empty() {
            parts.push(self.terms(&objective));
        }
        let constant = model.obj_const;
        if constant != 0.0 {
            let sign = if constant < 0.0 { '-' } else { '+' };
            parts.push(format!("{}{}", sign, format_number(constant.abs())));
        }
        let line = format!("{}: {}", sense, parts.join(" "));
        writeln!(out, "{};", line.trim_end())?;

        if model.rows() > 0 {
            writeln!(out)?;
            writeln!(out, "/* Constraints */")?;
        }
        for (i, row) in model.rows.iter().enumerate() {
            let terms = self.row_terms(i);
            let name = model.row_name(i);
            let ranged = match row.kind {
                ConstraintType::Le | ConstraintType::Ge => row.range.is_finite(),
                _ => false,
            };
            let label = if row.name.is_some() || terms.len() <= 1 || ranged {
                format!("{}: ", name)
            } else {
                String::new()
            };
            let expr = self.terms(&terms);
            match row.kind {
                ConstraintType::Free => {
                    writeln!(out, "{}{} >= {};", label, expr, self.number(f64::NEG_INFINITY))?
                }
                ConstraintType::Eq => writeln!(out, "{}{} = {};", label, expr, self.number(row.rhs))?,
                ConstraintType::Le => {
                    writeln!(out, "{}{} <= {};", label, expr, self.number(row.rhs))?;
                    if ranged {
                        writeln!(out, "{}>= {};", label, self.number(row.range))?;
                    }
                }
                ConstraintType::Ge => {
                    writeln!(out, "{}{} >= {};", label, expr, self.number(row.rhs))?;
                    if ranged {
                        writeln!(out, "{}<= {};", label, self.number(row.range))?;
                    }
                }
            }
        }

        let mut bounds = Vec::new();
        let mut free = Vec::new();
        for (j, col) in model.cols.iter().enumerate() {
            let name = model.col_name(j);
            let (lo, hi) = (col.lower, col.upper);
            if lo == f64::NEG_INFINITY && hi == f64::INFINITY {
                free.push(name);
            } else if lo == hi {
                bounds.push(format!("{} = {};", name, self.number(lo)));
            } else if lo != 0.0 && hi != f64::INFINITY {
                bounds.push(format!("{} <= {} <= {};", self.number(lo), name, self.number(hi)));
            } else if lo != 0.0 {
                bounds.push(format!("{} >= {};", name, self.number(lo)));
            } else if hi != f64::INFINITY {
                bounds.push(format!("{} <= {};", name, self.number(hi)));
            }
        }
        if !bounds.is_empty() {
            writeln!(out)?;
            for line in bounds {
                writeln!(out, "{}", line)?;
            }
        }

        let names = |f: &dyn Fn(usize) -> bool| -> Vec<String> {
            (0..model.columns())
                .filter(|&j| f(j))
                .map(|j| model.col_name(j))
                .collect()
        };
        let sections = [
            ("free", free),
            (
                "int",
                names(&|j| model.cols[j].integer && !model.cols[j].semicont),
            ),
            (
                "sec",
                names(&|j| model.cols[j].semicont && !model.cols[j].integer),
            ),
            (
                "sin",
                names(&|j| model.cols[j].semicont && model.cols[j].integer),
            ),
        ];
        for (keyword, list) in sections.iter() {
            if !list.is_empty() {
                writeln!(out)?;
                writeln!(out, "{} {};", keyword, list.join(","))?;
            }
        }

        let mut types: Vec<usize> = model.sos_sets().iter().map(|s| s.sos_type).collect();
        types.sort_unstable();
        types.dedup();
        for sos_type in types {
            writeln!(out)?;
            writeln!(out, "sos{}", sos_type)?;
            for (k, sos) in model.sos_sets().iter().enumerate() {
                if sos.sos_type != sos_type {
                    continue;
                }
                let name = if sos.name.is_empty() {
                    format!("SOS{}", k + 1)
                } else {
                    sos.name.clone()
                };
                let members: Vec<String> = sos
                    .columns
                    .iter()
                    .zip(sos.weights.iter())
                    .map(|(&j, &w)| format!("{}:{}", model.col_name(j), format_number(w)))
                    .collect();
                writeln!(out, "{}: {} <= {};", name, members.join(","), sos.priority)?;
            }
        }
        out.flush()
    }
}

impl Model {
    /// Read a model in LP format.
    pub fn read_lp<R: Read>(mut reader: R) -> Result<Model, LpFormatError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let tokens = tokenize(&text)?;
        Parser::new(&tokens)?.parse()
    }

    /// Read a model from an LP format file.
    pub fn read_lp_file<P: AsRef<Path>>(path: P) -> Result<Model, LpFormatError> {
        let file = File::open(path)?;
        Self::read_lp(BufReader::new(file))
    }

    /// Write the model in LP format.   Reading the text back gives a model
    /// with the same rows, columns, bounds, objective, column types and
    /// special ordered sets.   Branching weights and directions are not
    /// part of the format.
    pub fn write_lp<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        Writer { model: self }.write(writer)
    }

    /// Write the model to an LP format file.
    pub fn write_lp_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_lp(&mut out)
    }
}
