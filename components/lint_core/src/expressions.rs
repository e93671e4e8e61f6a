//! Pratt expression engine
//!
//! Expressions are parsed for their effects: scope references, inline
//! checks and complexity. What comes back is an [`Expr`] summary that the
//! enclosing operator or statement inspects (was it an assignment, a call,
//! a literal `null`, ...).
//!
//! Binding powers, loosest first: comma, assignment (right), ternary,
//! `||`/`??`, `&&`, `|`, `^`, `&`, equality, relational, shift, additive,
//! multiplicative, `**` (right), prefix/postfix, then member access and calls.

use crate::error::{expected_identifier, expected_token, ParseAbort, ParseResult};
use crate::lexer::{Keyword, Punctuator, TemplatePart, Token, TokenKind};
use crate::messages::Message;
use crate::parser::{FunctionKind, Parser};
use crate::patterns;

const COMMA_BP: u8 = 1;
pub(crate) const ASSIGN_BP: u8 = 20;
const TERNARY_BP: u8 = 30;
const PREFIX_BP: u8 = 150;

/// Constructors that may be called without `new`
const CALLABLE_CONSTRUCTORS: &[&str] = &[
    "Array", "Boolean", "Date", "Error", "Number", "Object", "String", "Symbol",
];

/// Built-ins that are not meant to be constructed
const NOT_CONSTRUCTORS: &[&str] = &["Boolean", "JSON", "Math", "Number", "String"];

/// What an expression turned out to be
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExprKind {
    Identifier(String),
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Regex,
    Template,
    This,
    Array,
    Object,
    Function,
    /// Property access; the name when it is statically known
    Member(Option<String>),
    Call,
    New,
    Unary { operand_call: bool },
    Delete,
    Await,
    Update,
    Binary(Punctuator),
    Logical,
    Conditional,
    Assignment(Punctuator),
    Sequence { effects: bool },
    Other,
}

/// Summary of a parsed expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expr {
    pub kind: ExprKind,
    pub line: u32,
    pub character: u32,
    pub parenthesized: bool,
}

impl Expr {
    fn at(kind: ExprKind, token: &Token) -> Self {
        Self {
            kind,
            line: token.line,
            character: token.character,
            parenthesized: false,
        }
    }

    fn with_kind(&self, kind: ExprKind) -> Self {
        Self {
            kind,
            line: self.line,
            character: self.character,
            parenthesized: false,
        }
    }

    /// Whether the expression is worth evaluating as a statement
    pub fn has_effect(&self) -> bool {
        match &self.kind {
            ExprKind::Assignment(_)
            | ExprKind::Call
            | ExprKind::New
            | ExprKind::Delete
            | ExprKind::Update
            | ExprKind::Await => true,
            ExprKind::Unary { operand_call } => *operand_call,
            ExprKind::Sequence { effects } => *effects,
            _ => false,
        }
    }

    fn is_simple_target(&self) -> bool {
        matches!(self.kind, ExprKind::Identifier(_) | ExprKind::Member(_))
    }

    fn is_nan(&self) -> bool {
        match &self.kind {
            ExprKind::Identifier(name) => name == "NaN",
            ExprKind::Member(Some(name)) => name == "NaN",
            _ => false,
        }
    }

    /// Text of a value that `==` coerces surprisingly
    fn loose_literal(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Null => Some("null".to_string()),
            ExprKind::Number(value) if *value == 0.0 => Some("0".to_string()),
            ExprKind::String(value) if value.is_empty() => Some(String::new()),
            ExprKind::Boolean(value) => Some(value.to_string()),
            ExprKind::Identifier(name) if name == "undefined" => Some(name.clone()),
            _ => None,
        }
    }
}

fn infix_power(token: &Token, no_in: bool) -> Option<(u8, u8)> {
    use Punctuator::*;
    match &token.kind {
        TokenKind::Punctuator(p) => match p {
            Comma => Some((COMMA_BP, COMMA_BP + 1)),
            Question => Some((TERNARY_BP, TERNARY_BP)),
            OrOr | NullishCoalesce => Some((40, 41)),
            AndAnd => Some((50, 51)),
            Or => Some((60, 61)),
            Xor => Some((70, 71)),
            And => Some((80, 81)),
            EqEq | NotEq | EqEqEq | NotEqEq => Some((90, 91)),
            Lt | Gt | LtEq | GtEq => Some((100, 101)),
            LtLt | GtGt | GtGtGt => Some((110, 111)),
            Plus | Minus => Some((120, 121)),
            Star | Slash | Percent => Some((130, 131)),
            StarStar => Some((140, 140)),
            PlusPlus | MinusMinus => Some((PREFIX_BP, PREFIX_BP)),
            p if p.is_assignment() => Some((ASSIGN_BP, ASSIGN_BP)),
            _ => None,
        },
        TokenKind::Keyword(Keyword::In) if !no_in => Some((100, 101)),
        TokenKind::Keyword(Keyword::Instanceof) => Some((100, 101)),
        _ => None,
    }
}

/// Whether `token` can begin an operand (used for `await`/`yield`)
fn starts_operand(token: &Token) -> bool {
    if token.newline_before {
        return false;
    }
    match &token.kind {
        TokenKind::Identifier(_)
        | TokenKind::String(_)
        | TokenKind::Number(_)
        | TokenKind::RegExp { .. }
        | TokenKind::Template {
            part: TemplatePart::Whole | TemplatePart::Head,
            ..
        } => true,
        TokenKind::Keyword(k) => matches!(
            k,
            Keyword::This
                | Keyword::Function
                | Keyword::New
                | Keyword::True
                | Keyword::False
                | Keyword::Null
                | Keyword::Typeof
                | Keyword::Void
                | Keyword::Delete
                | Keyword::Class
                | Keyword::Super
        ),
        TokenKind::Punctuator(p) => matches!(
            p,
            Punctuator::LParen
                | Punctuator::LBracket
                | Punctuator::LBrace
                | Punctuator::Not
                | Punctuator::Tilde
                | Punctuator::Minus
                | Punctuator::Plus
                | Punctuator::PlusPlus
                | Punctuator::MinusMinus
                | Punctuator::Star
        ),
        _ => false,
    }
}

/// Whether `token` can begin a property key
fn starts_key(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier(_)
            | TokenKind::Keyword(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::Punctuator(Punctuator::LBracket)
            | TokenKind::Punctuator(Punctuator::Star)
    )
}

impl Parser {
    /// Full expression, comma operator included
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_expression_bp(0)
    }

    /// Single assignment expression (no top-level comma)
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Expr> {
        self.parse_expression_bp(ASSIGN_BP)
    }

    /// Callee of `new` or an `extends` clause
    pub(crate) fn parse_left_hand_side(&mut self) -> ParseResult<Expr> {
        let primary = self.parse_primary()?;
        self.parse_call_chain(primary, true)
    }

    fn parse_expression_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        self.descend()?;
        let expr = self.parse_operators(min_bp);
        self.ascend();
        expr
    }

    fn parse_operators(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let Some((l_bp, r_bp)) = infix_power(&self.token, self.no_in) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op_token = self.token.clone();
            left = match op_token.kind {
                TokenKind::Punctuator(Punctuator::PlusPlus | Punctuator::MinusMinus)
                    if op_token.newline_before =>
                {
                    break;
                }
                TokenKind::Punctuator(op) => self.parse_infix(left, op, &op_token, r_bp)?,
                _ => {
                    self.advance()?;
                    self.parse_expression_bp(r_bp)?;
                    left.with_kind(ExprKind::Other)
                }
            };
        }
        Ok(left)
    }

    fn parse_infix(&mut self, left: Expr, op: Punctuator, op_token: &Token, r_bp: u8) -> ParseResult<Expr> {
        use Punctuator::*;
        match op {
            Comma => {
                self.advance()?;
                let right = self.parse_expression_bp(r_bp)?;
                let effects = left.has_effect() && right.has_effect();
                Ok(left.with_kind(ExprKind::Sequence { effects }))
            }
            Question => {
                self.advance()?;
                self.metrics.add_branch();
                let saved = std::mem::replace(&mut self.no_in, false);
                let consequent = self.parse_assignment();
                self.no_in = saved;
                consequent?;
                self.expect_punctuator(Colon)?;
                self.parse_assignment()?;
                Ok(left.with_kind(ExprKind::Conditional))
            }
            PlusPlus | MinusMinus => {
                self.check_update(&left, op, op_token)?;
                self.advance()?;
                Ok(left.with_kind(ExprKind::Update))
            }
            AndAnd | OrOr => {
                self.advance()?;
                self.metrics.add_branch();
                self.parse_expression_bp(r_bp)?;
                Ok(left.with_kind(ExprKind::Logical))
            }
            NullishCoalesce => {
                self.advance()?;
                self.parse_expression_bp(r_bp)?;
                Ok(left.with_kind(ExprKind::Logical))
            }
            EqEq | NotEq | EqEqEq | NotEqEq | Lt | Gt | LtEq | GtEq => {
                self.advance()?;
                let right = self.parse_expression_bp(r_bp)?;
                self.check_comparison(&left, &right, op, op_token)?;
                Ok(left.with_kind(ExprKind::Binary(op)))
            }
            Plus => {
                self.advance()?;
                let right = self.parse_expression_bp(r_bp)?;
                if let (ExprKind::String(a), ExprKind::String(b)) = (&left.kind, &right.kind) {
                    let folded = format!("{}{}", a, b);
                    if folded.trim_start().to_ascii_lowercase().starts_with("javascript:")
                        && !self.options.enabled("scripturl")
                    {
                        self.warn_at(Message::JavascriptUrl, left.line, left.character)?;
                    }
                    return Ok(left.with_kind(ExprKind::String(folded)));
                }
                Ok(left.with_kind(ExprKind::Binary(op)))
            }
            op if op.is_assignment() => self.parse_assignment_rest(left, op, op_token),
            _ => {
                if op.is_bitwise() && self.options.enabled("bitwise") {
                    self.warn(Message::UnexpectedUse(op.as_str().to_string()), op_token)?;
                }
                self.advance()?;
                self.parse_expression_bp(r_bp)?;
                Ok(left.with_kind(ExprKind::Binary(op)))
            }
        }
    }

    fn parse_assignment_rest(&mut self, left: Expr, op: Punctuator, op_token: &Token) -> ParseResult<Expr> {
        let valid = match left.kind {
            ExprKind::Identifier(_) | ExprKind::Member(_) => true,
            ExprKind::Array | ExprKind::Object => op == Punctuator::Assign && !left.parenthesized,
            _ => false,
        };
        if !valid {
            self.warn(Message::BadAssignment, op_token)?;
            return Err(ParseAbort::Syntax);
        }
        if op.is_bitwise() && self.options.enabled("bitwise") {
            self.warn(Message::UnexpectedUse(op.as_str().to_string()), op_token)?;
        }
        self.advance()?;

        if op == Punctuator::Assign && self.check_keyword(Keyword::Function) {
            self.name_hint = match &left.kind {
                ExprKind::Identifier(name) => Some(name.clone()),
                ExprKind::Member(Some(name)) => Some(name.clone()),
                _ => None,
            };
        }
        let right = self.parse_expression_bp(ASSIGN_BP);
        self.name_hint = None;
        right?;
        Ok(left.with_kind(ExprKind::Assignment(op)))
    }

    fn check_update(&mut self, target: &Expr, op: Punctuator, op_token: &Token) -> ParseResult<()> {
        if !target.is_simple_target() {
            self.warn(Message::BadAssignment, op_token)?;
            return Err(ParseAbort::Syntax);
        }
        if self.options.enabled("plusplus") {
            self.warn(Message::UnexpectedUse(op.as_str().to_string()), op_token)?;
        }
        Ok(())
    }

    fn check_comparison(&mut self, left: &Expr, right: &Expr, op: Punctuator, op_token: &Token) -> ParseResult<()> {
        if left.is_nan() || right.is_nan() {
            return self.warn(Message::NanComparison, op_token);
        }
        if !matches!(op, Punctuator::EqEq | Punctuator::NotEq) {
            return Ok(());
        }
        let strict_op = if op == Punctuator::EqEq { "===" } else { "!==" };
        let eqnull = self.options.enabled("eqnull");
        let null_side = left.kind == ExprKind::Null || right.kind == ExprKind::Null;

        if self.options.enabled("eqeqeq") {
            if !(eqnull && null_side) {
                let message = Message::ExpectedInstead(strict_op.to_string(), op.as_str().to_string());
                self.warn(message, op_token)?;
            }
            return Ok(());
        }
        if let Some(text) = left.loose_literal().or_else(|| right.loose_literal()) {
            if !(eqnull && text == "null") {
                self.warn(Message::UseStrictCompare(strict_op.to_string(), text), op_token)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Prefix operators
    // ========================================================================

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let token = self.token.clone();
        match &token.kind {
            TokenKind::Punctuator(p @ (Punctuator::Not | Punctuator::Tilde | Punctuator::Plus | Punctuator::Minus)) => {
                if *p == Punctuator::Tilde && self.options.enabled("bitwise") {
                    self.warn(Message::UnexpectedUse("~".to_string()), &token)?;
                }
                self.advance()?;
                let operand = self.parse_expression_bp(PREFIX_BP)?;
                let operand_call = operand.kind == ExprKind::Call;
                Ok(Expr::at(ExprKind::Unary { operand_call }, &token))
            }
            TokenKind::Punctuator(op @ (Punctuator::PlusPlus | Punctuator::MinusMinus)) => {
                self.advance()?;
                let operand = self.parse_expression_bp(PREFIX_BP)?;
                self.check_update(&operand, *op, &token)?;
                Ok(Expr::at(ExprKind::Update, &token))
            }
            TokenKind::Keyword(Keyword::Typeof) => {
                self.advance()?;
                self.parse_typeof_operand()?;
                Ok(Expr::at(ExprKind::Unary { operand_call: false }, &token))
            }
            TokenKind::Keyword(Keyword::Void) => {
                self.advance()?;
                let operand = self.parse_expression_bp(PREFIX_BP)?;
                let operand_call = operand.kind == ExprKind::Call;
                Ok(Expr::at(ExprKind::Unary { operand_call }, &token))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                self.advance()?;
                let operand = self.parse_expression_bp(PREFIX_BP)?;
                if matches!(operand.kind, ExprKind::Identifier(_)) {
                    self.warn_at(Message::DeleteVariable, operand.line, operand.character)?;
                }
                Ok(Expr::at(ExprKind::Delete, &token))
            }
            TokenKind::Identifier(word) if word == "await" || word == "yield" => {
                let is_operator = self.peek_ahead(0).map_or(false, starts_operand);
                if !is_operator {
                    self.advance()?;
                    return Ok(Expr::at(ExprKind::Await, &token));
                }
                let power = if word == "yield" { ASSIGN_BP } else { PREFIX_BP };
                self.advance()?;
                self.eat_punctuator(Punctuator::Star)?;
                self.parse_expression_bp(power)?;
                Ok(Expr::at(ExprKind::Await, &token))
            }
            _ => {
                let primary = self.parse_primary()?;
                self.parse_call_chain(primary, true)
            }
        }
    }

    /// `typeof name` never reports an undefined name
    fn parse_typeof_operand(&mut self) -> ParseResult<()> {
        if let Some(name) = self.token.identifier() {
            let name = name.to_string();
            let plain = self.peek_ahead(0).map_or(true, |next| {
                !matches!(
                    next.kind,
                    TokenKind::Punctuator(
                        Punctuator::Dot
                            | Punctuator::OptionalChain
                            | Punctuator::LBracket
                            | Punctuator::LParen
                            | Punctuator::Arrow
                    ) | TokenKind::Template { .. }
                )
            });
            if plain {
                let line = self.token.line;
                self.advance()?;
                self.scope.reference_guarded(&name, line);
                return Ok(());
            }
        }
        self.parse_expression_bp(PREFIX_BP).map(|_| ())
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.token.clone();
        match &token.kind {
            TokenKind::Identifier(name) => self.parse_identifier_expression(name, &token),
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::This => {
                    self.check_this(&token)?;
                    self.advance()?;
                    Ok(Expr::at(ExprKind::This, &token))
                }
                Keyword::Super => {
                    self.advance()?;
                    Ok(Expr::at(ExprKind::This, &token))
                }
                Keyword::Function => self.parse_function_expression(),
                Keyword::Class => {
                    self.parse_class(false)?;
                    Ok(Expr::at(ExprKind::Function, &token))
                }
                Keyword::New => {
                    // `new new ...` chains
                    self.descend()?;
                    let expr = self.parse_new_expression();
                    self.ascend();
                    expr
                }
                Keyword::True | Keyword::False => {
                    self.advance()?;
                    Ok(Expr::at(ExprKind::Boolean(*keyword == Keyword::True), &token))
                }
                Keyword::Null => {
                    self.advance()?;
                    Ok(Expr::at(ExprKind::Null, &token))
                }
                Keyword::Import => {
                    self.advance()?;
                    Ok(Expr::at(ExprKind::Other, &token))
                }
                _ => {
                    let message = expected_identifier(&token);
                    self.error_here(message)
                }
            },
            TokenKind::Number(number) => {
                let value = number.value;
                self.advance()?;
                Ok(Expr::at(ExprKind::Number(value), &token))
            }
            TokenKind::String(literal) => {
                let value = literal.value.clone();
                self.advance()?;
                Ok(Expr::at(ExprKind::String(value), &token))
            }
            TokenKind::RegExp { .. } => {
                self.advance()?;
                Ok(Expr::at(ExprKind::Regex, &token))
            }
            TokenKind::Template { part: TemplatePart::Head, .. } => {
                self.parse_template()?;
                Ok(Expr::at(ExprKind::Template, &token))
            }
            TokenKind::Template { part: TemplatePart::Whole, .. } => {
                self.advance()?;
                Ok(Expr::at(ExprKind::Template, &token))
            }
            TokenKind::Punctuator(Punctuator::LParen) => {
                if self.paren_starts_arrow() {
                    self.parse_function(FunctionKind::Arrow, None, (token.line, token.character))?;
                    return Ok(Expr::at(ExprKind::Function, &token));
                }
                self.parse_parenthesized()
            }
            TokenKind::Punctuator(Punctuator::LBracket) => self.parse_array_literal(),
            TokenKind::Punctuator(Punctuator::LBrace) => self.parse_object_literal(),
            _ => {
                let message = expected_identifier(&token);
                self.error_here(message)
            }
        }
    }

    fn parse_identifier_expression(&mut self, name: &str, token: &Token) -> ParseResult<Expr> {
        let at = (token.line, token.character);
        if self.next_is_punctuator(Punctuator::Arrow) {
            self.parse_function(FunctionKind::Arrow, None, at)?;
            return Ok(Expr::at(ExprKind::Function, token));
        }
        if name == "async" {
            if let Some(expr) = self.parse_async_prefix(token)? {
                return Ok(expr);
            }
        }

        self.advance()?;
        let write = self.check_punctuator(Punctuator::Assign);
        let modifies = match self.token.kind {
            TokenKind::Punctuator(p) => {
                p.is_assignment()
                    || (matches!(p, Punctuator::PlusPlus | Punctuator::MinusMinus)
                        && !self.token.newline_before)
            }
            _ => false,
        };
        if modifies && self.context().strict && (name == "eval" || name == "arguments") {
            self.warn(Message::StrictViolation, token)?;
        }

        if write {
            self.assign(name, at.0, at.1)?;
        } else {
            self.reference(name, at.0, at.1)?;
        }
        Ok(Expr::at(ExprKind::Identifier(name.to_string()), token))
    }

    /// `async function`, `async x => ...` and `async (...) => ...`
    fn parse_async_prefix(&mut self, token: &Token) -> ParseResult<Option<Expr>> {
        let (function, arrow_param, paren) = match self.peek_ahead(0) {
            Some(next) if !next.newline_before => (
                next.is_keyword(Keyword::Function),
                next.identifier().is_some(),
                next.is_punctuator(Punctuator::LParen),
            ),
            _ => return Ok(None),
        };
        let at = (token.line, token.character);

        if function {
            self.advance()?;
            return self.parse_function_expression().map(Some);
        }
        if arrow_param && self.peek_ahead(1).map_or(false, |t| t.is_punctuator(Punctuator::Arrow)) {
            self.advance()?;
            self.parse_function(FunctionKind::Arrow, None, at)?;
            return Ok(Some(Expr::at(ExprKind::Function, token)));
        }
        if paren {
            self.advance()?;
            if self.paren_starts_arrow() {
                self.parse_function(FunctionKind::Arrow, None, at)?;
                return Ok(Some(Expr::at(ExprKind::Function, token)));
            }
            // a call of something named `async`
            self.reference("async", at.0, at.1)?;
            return Ok(Some(Expr::at(ExprKind::Identifier("async".to_string()), token)));
        }
        Ok(None)
    }

    /// With the current token on `(`, whether its matching `)` is followed
    /// by `=>`
    fn paren_starts_arrow(&mut self) -> bool {
        let mut depth = 1usize;
        let mut n = 0;
        loop {
            let step: i32 = match self.peek_ahead(n) {
                None => return false,
                Some(t) if t.is_eof() => return false,
                Some(t) => match t.kind {
                    TokenKind::Punctuator(Punctuator::LParen | Punctuator::LBracket | Punctuator::LBrace) => 1,
                    TokenKind::Punctuator(Punctuator::RParen | Punctuator::RBracket | Punctuator::RBrace) => -1,
                    _ => 0,
                },
            };
            if step > 0 {
                depth += 1;
            } else if step < 0 {
                depth -= 1;
                if depth == 0 {
                    return self
                        .peek_ahead(n + 1)
                        .map_or(false, |t| t.is_punctuator(Punctuator::Arrow));
                }
            }
            n += 1;
        }
    }

    fn check_this(&mut self, token: &Token) -> ParseResult<()> {
        if !self.context().strict || self.options.enabled("validthis") {
            return Ok(());
        }
        let violation = match self.this_context() {
            None => true,
            Some(function) => {
                function.is_declaration
                    && function
                        .name
                        .as_deref()
                        .and_then(|n| n.chars().next())
                        .map_or(false, |c| c.is_lowercase())
            }
        };
        if violation {
            self.warn(Message::PossibleStrictViolation, token)?;
        }
        Ok(())
    }

    fn parse_function_expression(&mut self) -> ParseResult<Expr> {
        let function = self.token.clone();
        self.expect_keyword(Keyword::Function)?;
        self.eat_punctuator(Punctuator::Star)?;
        let hint = self.name_hint.take();
        let at = (function.line, function.character);

        match self.token.identifier() {
            Some(name) => {
                let name = name.to_string();
                self.advance()?;
                self.parse_function(FunctionKind::NamedExpression, Some(name), at)?;
            }
            None => self.parse_function(FunctionKind::Expression, hint, at)?,
        }
        Ok(Expr::at(ExprKind::Function, &function))
    }

    fn parse_new_expression(&mut self) -> ParseResult<Expr> {
        let new_token = self.token.clone();
        self.advance()?;
        if self.eat_punctuator(Punctuator::Dot)? {
            // new.target
            self.expect_identifier()?;
            return Ok(Expr::at(ExprKind::Member(Some("target".to_string())), &new_token));
        }
        if self.check_keyword(Keyword::Function) && !self.options.enabled("supernew") {
            self.warn(Message::WeirdNew, &new_token)?;
        }

        let callee_token = self.token.clone();
        let callee = self.parse_primary()?;
        let callee = self.parse_call_chain(callee, false)?;
        if let ExprKind::Identifier(name) = &callee.kind {
            self.check_constructor(name, &new_token, &callee_token)?;
        }
        if self.check_punctuator(Punctuator::LParen) {
            self.parse_arguments()?;
        }
        Ok(Expr::at(ExprKind::New, &new_token))
    }

    fn check_constructor(&mut self, name: &str, new_token: &Token, callee: &Token) -> ParseResult<()> {
        if name == "Function" {
            if !self.options.enabled("evil") {
                self.warn(Message::FunctionConstructor, new_token)?;
            }
            return Ok(());
        }
        if NOT_CONSTRUCTORS.contains(&name) {
            return self.warn(Message::NotAConstructor(name.to_string()), callee);
        }
        let lowercase = name.chars().next().map_or(false, |c| !c.is_ascii_uppercase());
        if lowercase && self.options.enabled("newcap") && !self.scope.predefined().contains(name) {
            self.warn(Message::LowercaseConstructor, callee)?;
        }
        Ok(())
    }

    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        let open = self.token.clone();
        self.advance()?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let inner = self.parse_expression();
        self.no_in = saved;
        let mut inner = inner?;
        self.expect_closing(Punctuator::RParen, &open)?;
        inner.parenthesized = true;
        Ok(inner)
    }

    fn parse_template(&mut self) -> ParseResult<()> {
        self.advance()?;
        loop {
            let saved = std::mem::replace(&mut self.no_in, false);
            let part = self.parse_expression();
            self.no_in = saved;
            part?;
            match self.token.kind {
                TokenKind::Template { part: TemplatePart::Middle, .. } => self.advance()?,
                TokenKind::Template { part: TemplatePart::Tail, .. } => return self.advance(),
                _ => {
                    let message = expected_token("}", &self.token);
                    return self.error_here(message);
                }
            }
        }
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let open = self.token.clone();
        self.advance()?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let elements = self.parse_array_elements();
        self.no_in = saved;
        elements?;
        self.expect_closing(Punctuator::RBracket, &open)?;
        Ok(Expr::at(ExprKind::Array, &open))
    }

    fn parse_array_elements(&mut self) -> ParseResult<()> {
        while !self.check_punctuator(Punctuator::RBracket) {
            if self.eat_punctuator(Punctuator::Comma)? {
                continue;
            }
            self.eat_punctuator(Punctuator::Spread)?;
            self.parse_assignment()?;
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        Ok(())
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expr> {
        let open = self.token.clone();
        self.advance()?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let properties = self.parse_object_properties();
        self.no_in = saved;
        properties?;
        self.expect_closing(Punctuator::RBrace, &open)?;
        Ok(Expr::at(ExprKind::Object, &open))
    }

    fn parse_object_properties(&mut self) -> ParseResult<()> {
        while !self.check_punctuator(Punctuator::RBrace) {
            if self.eat_punctuator(Punctuator::Spread)? {
                self.parse_assignment()?;
            } else {
                self.parse_object_property()?;
            }
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        Ok(())
    }

    fn parse_object_property(&mut self) -> ParseResult<()> {
        let start = self.token.clone();
        let key = self.parse_property_key()?;
        let bare = self.prev.offset == start.offset;

        if self.check_punctuator(Punctuator::LParen) {
            return self.parse_function(FunctionKind::Method, key, (start.line, start.character));
        }
        if self.eat_punctuator(Punctuator::Colon)? {
            if self.check_keyword(Keyword::Function) {
                self.name_hint = key;
            }
            let value = self.parse_assignment();
            self.name_hint = None;
            return value.map(|_| ());
        }
        match start.identifier() {
            Some(name) if bare => {
                self.reference(name, start.line, start.character)?;
                if self.eat_punctuator(Punctuator::Assign)? {
                    self.parse_assignment()?;
                }
                Ok(())
            }
            _ => {
                let message = expected_token(":", &self.token);
                self.error_here(message)
            }
        }
    }

    /// Object or class key, after any `get`/`set`/`async`/`*` modifiers;
    /// computed keys yield `None`
    pub(crate) fn parse_property_key(&mut self) -> ParseResult<Option<String>> {
        loop {
            if self.eat_punctuator(Punctuator::Star)? {
                continue;
            }
            let modifier = self.check_word("get") || self.check_word("set") || self.check_word("async");
            if modifier && self.peek_ahead(0).map_or(false, |t| starts_key(t) && !t.newline_before) {
                self.advance()?;
                continue;
            }
            break;
        }

        let token = self.token.clone();
        let key = match &token.kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::Keyword(keyword) => Some(keyword.as_str().to_string()),
            TokenKind::String(literal) => Some(literal.value.clone()),
            TokenKind::Number(_) => Some(token.raw.clone()),
            TokenKind::Punctuator(Punctuator::LBracket) => {
                self.advance()?;
                self.parse_assignment()?;
                self.expect_closing(Punctuator::RBracket, &token)?;
                return Ok(None);
            }
            _ => {
                let message = expected_identifier(&token);
                return self.error_here(message);
            }
        };
        self.advance()?;
        Ok(key)
    }

    // ========================================================================
    // Member access and calls
    // ========================================================================

    fn parse_call_chain(&mut self, mut left: Expr, allow_call: bool) -> ParseResult<Expr> {
        loop {
            let optional = self.check_punctuator(Punctuator::OptionalChain);
            if self.check_punctuator(Punctuator::Dot) || optional {
                self.advance()?;
                if optional
                    && (self.check_punctuator(Punctuator::LParen)
                        || self.check_punctuator(Punctuator::LBracket))
                {
                    continue;
                }
                let property = self.token.clone();
                let Some(name) = property.property_name().map(str::to_string) else {
                    let message = expected_identifier(&property);
                    return self.error_here(message);
                };
                self.advance()?;
                self.check_property(&left, &name, &property)?;
                left = left.with_kind(ExprKind::Member(Some(name)));
            } else if self.check_punctuator(Punctuator::LBracket) {
                let open = self.token.clone();
                self.advance()?;
                let saved = std::mem::replace(&mut self.no_in, false);
                let key = self.parse_expression();
                self.no_in = saved;
                let key = key?;
                self.expect_closing(Punctuator::RBracket, &open)?;
                let name = match &key.kind {
                    ExprKind::String(name) => {
                        self.check_subscript(name, &key)?;
                        self.check_property(&left, name, &open)?;
                        Some(name.clone())
                    }
                    _ => None,
                };
                left = left.with_kind(ExprKind::Member(name));
            } else if allow_call && self.check_punctuator(Punctuator::LParen) {
                let first = self.parse_arguments()?;
                self.check_call(&left, first.as_ref())?;
                left = left.with_kind(ExprKind::Call);
            } else if let TokenKind::Template { part, .. } = self.token.kind {
                // tagged template; Middle and Tail close an enclosing substitution
                match part {
                    TemplatePart::Head => self.parse_template()?,
                    TemplatePart::Whole => self.advance()?,
                    TemplatePart::Middle | TemplatePart::Tail => return Ok(left),
                }
                left = left.with_kind(ExprKind::Call);
            } else {
                return Ok(left);
            }
        }
    }

    /// `(args)`; returns the first argument
    fn parse_arguments(&mut self) -> ParseResult<Option<Expr>> {
        let open = self.token.clone();
        self.advance()?;
        let saved = std::mem::replace(&mut self.no_in, false);
        let arguments = self.parse_argument_list();
        self.no_in = saved;
        let first = arguments?;
        self.expect_closing(Punctuator::RParen, &open)?;
        Ok(first)
    }

    fn parse_argument_list(&mut self) -> ParseResult<Option<Expr>> {
        let mut first = None;
        while !self.check_punctuator(Punctuator::RParen) {
            self.eat_punctuator(Punctuator::Spread)?;
            let argument = self.parse_assignment()?;
            first.get_or_insert(argument);
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        Ok(first)
    }

    fn check_property(&mut self, object: &Expr, name: &str, at: &Token) -> ParseResult<()> {
        if (name == "__proto__" || name == "__iterator__") && !self.options.enabled("proto") {
            self.warn(Message::Deprecated(name.to_string()), at)?;
        }
        if object.kind == ExprKind::Identifier("arguments".to_string())
            && (name == "callee" || name == "caller")
            && self.options.enabled("noarg")
        {
            self.warn(Message::AvoidArguments(name.to_string()), at)?;
        }
        Ok(())
    }

    fn check_subscript(&mut self, name: &str, key: &Expr) -> ParseResult<()> {
        if !self.options.enabled("sub")
            && patterns::is_identifier_name(name)
            && Keyword::from_word(name).is_none()
        {
            self.warn_at(Message::DotNotation(name.to_string()), key.line, key.character)?;
        }
        Ok(())
    }

    fn check_call(&mut self, callee: &Expr, first: Option<&Expr>) -> ParseResult<()> {
        let (name, at) = match &callee.kind {
            ExprKind::Identifier(name) => (name.as_str(), (callee.line, callee.character)),
            ExprKind::Member(Some(name)) => {
                if matches!(name.as_str(), "setTimeout" | "setInterval") {
                    return self.check_implied_eval(first);
                }
                return Ok(());
            }
            _ => return Ok(()),
        };

        match name {
            "eval" => {
                if !self.options.enabled("evil") {
                    self.warn_at(Message::EvalHarmful, at.0, at.1)?;
                }
            }
            "setTimeout" | "setInterval" => self.check_implied_eval(first)?,
            "Math" | "JSON" => {
                self.warn_at(Message::NotAFunction(name.to_string()), at.0, at.1)?;
            }
            _ if patterns::looks_like_constructor(name)
                && !CALLABLE_CONSTRUCTORS.contains(&name)
                && self.options.enabled("newcap") =>
            {
                self.warn_at(Message::MissingNew, at.0, at.1)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn check_implied_eval(&mut self, first: Option<&Expr>) -> ParseResult<()> {
        if let Some(argument) = first {
            if matches!(argument.kind, ExprKind::String(_)) && !self.options.enabled("evil") {
                self.warn_at(Message::ImpliedEval, argument.line, argument.character)?;
            }
        }
        Ok(())
    }
}
