//! Statement handlers
//!
//! Each handler consumes one statement. A syntax error abandons the
//! statement; [`Parser::parse_statement_list`] resynchronizes and carries on.

use crate::error::{expected_identifier, expected_token, unexpected_token, ParseAbort, ParseResult};
use crate::expressions::{Expr, ExprKind};
use crate::lexer::{Keyword, Punctuator, Token, TokenKind};
use crate::messages::Message;
use crate::parser::{FunctionKind, ListEnd, Parser};
use crate::scope::{BindingKind, FrameKind};

/// How control leaves a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Falls through to the next statement
    Normal,
    /// Unconditional `return`, `throw`, `break` or `continue`
    Jump(&'static str),
}

impl Parser {
    /// Parse statements until `end`; returns how many were parsed
    pub(crate) fn parse_statement_list(&mut self, end: ListEnd) -> ParseResult<u32> {
        let mut count = 0;
        let mut jumped: Option<&'static str> = None;
        let mut reported_unreachable = false;

        loop {
            if self.at_list_end(end) {
                break;
            }
            if end == ListEnd::Program && self.check_punctuator(Punctuator::RBrace) {
                let message = unexpected_token(&self.token);
                self.warn_here(message)?;
                self.advance()?;
                continue;
            }
            if let Some(keyword) = jumped {
                if !reported_unreachable && !self.check_keyword(Keyword::Function) {
                    let message = Message::Unreachable(self.token.describe(), keyword.to_string());
                    self.warn_here(message)?;
                    reported_unreachable = true;
                }
            }

            let start = self.token.offset;
            match self.parse_statement() {
                Ok(Flow::Jump(keyword)) => {
                    jumped.get_or_insert(keyword);
                }
                Ok(Flow::Normal) => {}
                Err(ParseAbort::Syntax) => self.resync(start)?,
                Err(ParseAbort::Halt) => return Err(ParseAbort::Halt),
            }
            count += 1;
        }
        Ok(count)
    }

    fn at_list_end(&self, end: ListEnd) -> bool {
        if self.token.is_eof() {
            return true;
        }
        match end {
            ListEnd::Program => false,
            ListEnd::Brace => self.check_punctuator(Punctuator::RBrace),
            ListEnd::Case => {
                self.check_punctuator(Punctuator::RBrace)
                    || self.check_keyword(Keyword::Case)
                    || self.check_keyword(Keyword::Default)
            }
        }
    }

    /// Skip to a plausible statement boundary: past a `;`, or before `}`,
    /// the end of input or a statement keyword starting a new line. At
    /// least one token is skipped when the failed statement consumed none.
    fn resync(&mut self, start: usize) -> ParseResult<()> {
        let mut moved = self.token.offset != start;
        loop {
            if self.token.is_eof() || self.check_punctuator(Punctuator::RBrace) {
                return Ok(());
            }
            if self.check_punctuator(Punctuator::Semicolon) {
                return self.advance();
            }
            if moved && self.token.newline_before {
                if let TokenKind::Keyword(keyword) = self.token.kind {
                    if keyword.starts_statement() {
                        return Ok(());
                    }
                }
            }
            self.advance()?;
            moved = true;
        }
    }

    /// Parse one statement
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Flow> {
        self.descend()?;
        let flow = self.parse_statement_form();
        self.ascend();
        flow
    }

    fn parse_statement_form(&mut self) -> ParseResult<Flow> {
        // a label and the statement it labels count once
        if matches!(self.token.kind, TokenKind::Identifier(_))
            && self.next_is_punctuator(Punctuator::Colon)
        {
            return self.parse_labeled_statement();
        }
        self.metrics.add_statement();

        let keyword = match &self.token.kind {
            TokenKind::Keyword(keyword) => Some(*keyword),
            TokenKind::Punctuator(Punctuator::LBrace) => {
                self.parse_block_statement()?;
                return Ok(Flow::Normal);
            }
            TokenKind::Punctuator(Punctuator::Semicolon) => {
                self.warn_here(Message::UnnecessarySemicolon)?;
                self.advance()?;
                return Ok(Flow::Normal);
            }
            TokenKind::Identifier(_) => {
                if self.check_word("async")
                    && self.peek_ahead(0).map_or(false, |t| {
                        t.is_keyword(Keyword::Function) && !t.newline_before
                    })
                {
                    self.advance()?;
                    self.parse_function_declaration()?;
                    return Ok(Flow::Normal);
                }
                None
            }
            _ => None,
        };

        match keyword {
            Some(Keyword::Var) => self.parse_variable_statement(BindingKind::Var),
            Some(Keyword::Let) => self.parse_variable_statement(BindingKind::Let),
            Some(Keyword::Const) => self.parse_variable_statement(BindingKind::Const),
            Some(Keyword::Function) => {
                self.parse_function_declaration()?;
                Ok(Flow::Normal)
            }
            Some(Keyword::Class) => {
                self.parse_class(true)?;
                Ok(Flow::Normal)
            }
            Some(Keyword::If) => self.parse_if_statement(),
            Some(Keyword::For) => self.parse_for_statement(),
            Some(Keyword::While) => self.parse_while_statement(),
            Some(Keyword::Do) => self.parse_do_while_statement(),
            Some(Keyword::Switch) => self.parse_switch_statement(),
            Some(Keyword::Try) => self.parse_try_statement(),
            Some(Keyword::With) => self.parse_with_statement(),
            Some(Keyword::Return) => self.parse_return_statement(),
            Some(Keyword::Throw) => self.parse_throw_statement(),
            Some(Keyword::Break) => self.parse_jump_statement("break"),
            Some(Keyword::Continue) => self.parse_jump_statement("continue"),
            Some(Keyword::Debugger) => {
                if !self.options.enabled("debug") {
                    self.warn_here(Message::Debugger)?;
                }
                self.advance()?;
                self.consume_semicolon()?;
                Ok(Flow::Normal)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Flow> {
        let expr = self.parse_expression()?;
        self.check_expression_statement(&expr)?;
        self.consume_semicolon()?;
        Ok(Flow::Normal)
    }

    fn check_expression_statement(&mut self, expr: &Expr) -> ParseResult<()> {
        if matches!(expr.kind, ExprKind::New) && !expr.parenthesized {
            if self.options.enabled("nonew") {
                self.warn_at(Message::NewSideEffects, expr.line, expr.character)?;
            }
            return Ok(());
        }
        if !expr.has_effect() && !self.options.enabled("expr") {
            self.warn_at(Message::ExpressionStatement, expr.line, expr.character)?;
        }
        Ok(())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// `{ ... }` in statement position
    pub(crate) fn parse_block_statement(&mut self) -> ParseResult<()> {
        let open = self.token.clone();
        self.advance()?;

        let depth = self.metrics.enter_block();
        if let Some(max) = self.options.limit("maxdepth") {
            if depth == max + 1 {
                self.warn(Message::NestedTooDeeply(depth), &open)?;
            }
        }
        self.scope.enter_scope(FrameKind::Block);
        let body = self.parse_statement_list(ListEnd::Brace);
        self.scope.exit_scope(&self.options);
        self.metrics.exit_block();
        let count = body?;
        self.flush_scope()?;

        if count == 0 && self.options.enabled("noempty") {
            self.warn(Message::EmptyBlock, &open)?;
        }
        self.expect_statement_closing(Punctuator::RBrace, &open)
    }

    /// Body of `if`/`for`/`while`/`do`/`with`; unbraced bodies fall under
    /// `curly`
    fn parse_body(&mut self) -> ParseResult<()> {
        if self.check_punctuator(Punctuator::LBrace) {
            return self.parse_block_statement();
        }
        if self.options.enabled("curly") {
            let message = Message::ExpectedInstead("{".to_string(), self.token.describe());
            self.warn_here(message)?;
        }
        self.parse_statement().map(|_| ())
    }

    fn parse_loop_body(&mut self) -> ParseResult<()> {
        self.context_mut().loop_depth += 1;
        let body = self.parse_body();
        self.context_mut().loop_depth -= 1;
        body
    }

    /// `( condition )` of `if`/`while`/`do`
    fn parse_condition(&mut self) -> ParseResult<()> {
        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LParen)?;
        let condition = self.parse_expression()?;
        self.check_condition(&condition)?;
        self.expect_statement_closing(Punctuator::RParen, &open)
    }

    /// An assignment where a condition belongs, parenthesized or not
    fn check_condition(&mut self, condition: &Expr) -> ParseResult<()> {
        if matches!(condition.kind, ExprKind::Assignment(Punctuator::Assign))
            && !self.options.enabled("boss")
        {
            self.warn_at(Message::AssignInCondition, condition.line, condition.character)?;
        }
        Ok(())
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_variable_statement(&mut self, kind: BindingKind) -> ParseResult<Flow> {
        self.advance()?;
        self.parse_declarations(kind)?;
        self.consume_semicolon()?;
        Ok(Flow::Normal)
    }

    /// Comma-separated declarators after `var`/`let`/`const`
    fn parse_declarations(&mut self, kind: BindingKind) -> ParseResult<()> {
        loop {
            let target = self.token.clone();
            self.parse_binding_target(kind)?;

            if self.check_punctuator(Punctuator::Assign) {
                self.advance()?;
                let name = target.identifier().map(str::to_string);
                if name.is_some() && self.check_keyword(Keyword::Function) {
                    self.name_hint = name.clone();
                }
                let init = self.parse_assignment()?;
                self.name_hint = None;
                if let (Some(name), ExprKind::Identifier(value)) = (name, &init.kind) {
                    if value == "undefined" && kind != BindingKind::Const {
                        self.warn(Message::InitUndefined(name), &target)?;
                    }
                }
            }
            if !self.eat_punctuator(Punctuator::Comma)? {
                return Ok(());
            }
        }
    }

    fn parse_function_declaration(&mut self) -> ParseResult<()> {
        let function = self.token.clone();
        self.expect_keyword(Keyword::Function)?;
        self.eat_punctuator(Punctuator::Star)?;
        let (name, line, character) = self.expect_identifier()?;
        self.declare(&name, BindingKind::Function, line, character)?;
        self.parse_function(
            FunctionKind::Declaration,
            Some(name),
            (function.line, function.character),
        )
    }

    /// `class Name extends Base { ... }`, declaration or expression
    pub(crate) fn parse_class(&mut self, declaration: bool) -> ParseResult<()> {
        self.expect_keyword(Keyword::Class)?;
        if let Some(name) = self.token.identifier() {
            let (name, line, character) = (name.to_string(), self.token.line, self.token.character);
            self.advance()?;
            if declaration {
                self.declare(&name, BindingKind::Let, line, character)?;
            }
        } else if declaration {
            let message = expected_identifier(&self.token);
            return self.error_here(message);
        }
        if self.check_keyword(Keyword::Extends) {
            self.advance()?;
            self.parse_left_hand_side()?;
        }

        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LBrace)?;
        while !self.check_punctuator(Punctuator::RBrace) && !self.token.is_eof() {
            if self.eat_punctuator(Punctuator::Semicolon)? {
                continue;
            }
            if self.check_word("static") && !self.next_is_punctuator(Punctuator::LParen) {
                self.advance()?;
            }
            self.parse_class_member()?;
        }
        if declaration {
            return self.expect_statement_closing(Punctuator::RBrace, &open);
        }
        self.expect_closing(Punctuator::RBrace, &open)
    }

    fn parse_class_member(&mut self) -> ParseResult<()> {
        let start = self.token.clone();
        let key = self.parse_property_key()?;
        if self.check_punctuator(Punctuator::LParen) {
            return self.parse_function(FunctionKind::Method, key, (start.line, start.character));
        }
        if self.eat_punctuator(Punctuator::Assign)? {
            self.parse_assignment()?;
        }
        self.consume_semicolon()
    }

    // ========================================================================
    // Control flow
    // ========================================================================

    fn parse_if_statement(&mut self) -> ParseResult<Flow> {
        // `else if` chains are walked here rather than by recursion
        loop {
            self.advance()?;
            self.metrics.add_branch();
            self.parse_condition()?;
            self.parse_body()?;
            if !self.check_keyword(Keyword::Else) {
                return Ok(Flow::Normal);
            }
            self.advance()?;
            if !self.check_keyword(Keyword::If) {
                self.parse_body()?;
                return Ok(Flow::Normal);
            }
            self.metrics.add_statement();
        }
    }

    fn parse_while_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        self.metrics.add_branch();
        self.parse_condition()?;
        self.parse_loop_body()?;
        Ok(Flow::Normal)
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        self.metrics.add_branch();
        self.parse_loop_body()?;
        self.expect_keyword(Keyword::While)?;
        self.parse_condition()?;
        self.consume_semicolon_do_while()?;
        Ok(Flow::Normal)
    }

    fn parse_for_statement(&mut self) -> ParseResult<Flow> {
        let keyword = self.token.clone();
        self.advance()?;
        self.metrics.add_branch();
        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LParen)?;

        // only lexical declarations get a frame of their own
        let lexical = self.check_keyword(Keyword::Let) || self.check_keyword(Keyword::Const);
        if lexical {
            self.scope.enter_scope(FrameKind::Block);
        }
        let result = self.parse_for_rest(&keyword, &open);
        if lexical {
            self.scope.exit_scope(&self.options);
        }
        result?;
        self.flush_scope()?;
        Ok(Flow::Normal)
    }

    fn parse_for_rest(&mut self, keyword: &Token, open: &Token) -> ParseResult<()> {
        let declaration = match self.token.kind {
            TokenKind::Keyword(Keyword::Var) => Some(BindingKind::Var),
            TokenKind::Keyword(Keyword::Let) => Some(BindingKind::Let),
            TokenKind::Keyword(Keyword::Const) => Some(BindingKind::Const),
            _ => None,
        };

        let saved = std::mem::replace(&mut self.no_in, true);
        let init = match declaration {
            Some(kind) => {
                self.advance()?;
                self.parse_declarations(kind).map(|()| None)
            }
            None if self.check_punctuator(Punctuator::Semicolon) => Ok(None),
            None => self.parse_expression().map(Some),
        };
        self.no_in = saved;
        init?;

        if self.check_keyword(Keyword::In) || self.check_word("of") {
            let filtered = self.check_keyword(Keyword::In);
            self.advance()?;
            self.parse_expression()?;
            self.expect_statement_closing(Punctuator::RParen, open)?;
            if filtered && self.options.enabled("forin") && !self.body_starts_with_if() {
                self.warn(Message::UnfilteredForIn, keyword)?;
            }
            return self.parse_loop_body();
        }

        self.expect_punctuator(Punctuator::Semicolon)?;
        if !self.check_punctuator(Punctuator::Semicolon) {
            let condition = self.parse_expression()?;
            self.check_condition(&condition)?;
        }
        self.expect_punctuator(Punctuator::Semicolon)?;
        if !self.check_punctuator(Punctuator::RParen) {
            self.parse_expression()?;
        }
        self.expect_statement_closing(Punctuator::RParen, open)?;
        self.parse_loop_body()
    }

    /// `for (k in o) if (...)` or `for (k in o) { if (...) ... }`
    fn body_starts_with_if(&mut self) -> bool {
        if self.check_keyword(Keyword::If) {
            return true;
        }
        self.check_punctuator(Punctuator::LBrace)
            && self
                .peek_ahead(0)
                .map_or(false, |t| t.is_keyword(Keyword::If))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        let open_paren = self.token.clone();
        self.expect_punctuator(Punctuator::LParen)?;
        self.parse_expression()?;
        self.expect_closing(Punctuator::RParen, &open_paren)?;

        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LBrace)?;
        loop {
            if self.check_keyword(Keyword::Case) {
                self.advance()?;
                self.metrics.add_branch();
                self.parse_expression()?;
            } else if self.check_keyword(Keyword::Default) {
                self.advance()?;
            } else {
                break;
            }
            self.expect_punctuator(Punctuator::Colon)?;
            self.parse_statement_list(ListEnd::Case)?;
        }
        self.expect_statement_closing(Punctuator::RBrace, &open)?;
        Ok(Flow::Normal)
    }

    fn parse_try_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        self.expect_block()?;

        let mut handled = false;
        if self.check_keyword(Keyword::Catch) {
            handled = true;
            self.advance()?;
            self.scope.enter_scope(FrameKind::Catch);
            let clause = self.parse_catch_clause();
            self.scope.exit_scope(&self.options);
            clause?;
            self.flush_scope()?;
        }
        if self.check_keyword(Keyword::Finally) {
            handled = true;
            self.advance()?;
            self.expect_block()?;
        }
        if !handled {
            let message = expected_token("catch", &self.token);
            return self.error_here(message);
        }
        Ok(Flow::Normal)
    }

    fn parse_catch_clause(&mut self) -> ParseResult<()> {
        if self.check_punctuator(Punctuator::LParen) {
            let open = self.token.clone();
            self.advance()?;
            self.parse_binding_target(BindingKind::Exception)?;
            self.expect_closing(Punctuator::RParen, &open)?;
        }
        self.expect_block()
    }

    fn expect_block(&mut self) -> ParseResult<()> {
        if !self.check_punctuator(Punctuator::LBrace) {
            let message = expected_token("{", &self.token);
            return self.error_here(message);
        }
        self.parse_block_statement()
    }

    fn parse_with_statement(&mut self) -> ParseResult<Flow> {
        if !self.options.enabled("withstmt") {
            self.warn_here(Message::WithStatement)?;
        }
        self.advance()?;
        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LParen)?;
        self.parse_expression()?;
        self.expect_statement_closing(Punctuator::RParen, &open)?;
        self.parse_body()?;
        Ok(Flow::Normal)
    }

    fn ends_restricted_production(&self) -> bool {
        self.token.newline_before
            || self.token.is_eof()
            || self.check_punctuator(Punctuator::Semicolon)
            || self.check_punctuator(Punctuator::RBrace)
    }

    fn parse_return_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        if !self.ends_restricted_production() {
            let value = self.parse_expression()?;
            if matches!(value.kind, ExprKind::Assignment(Punctuator::Assign))
                && !self.options.enabled("boss")
            {
                self.warn_at(Message::ReturnAssignment, value.line, value.character)?;
            }
        }
        self.consume_semicolon()?;
        Ok(Flow::Jump("return"))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Flow> {
        self.advance()?;
        self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Flow::Jump("throw"))
    }

    fn parse_jump_statement(&mut self, keyword: &'static str) -> ParseResult<Flow> {
        self.advance()?;
        if !self.ends_restricted_production() {
            if let Some(label) = self.token.identifier() {
                let label = label.to_string();
                if !self.scope.has_label(&label) {
                    self.warn_here(Message::NotALabel(label))?;
                }
                self.advance()?;
            }
        }
        self.consume_semicolon()?;
        Ok(Flow::Jump(keyword))
    }

    fn parse_labeled_statement(&mut self) -> ParseResult<Flow> {
        let (label, _, _) = self.expect_identifier()?;
        self.expect_punctuator(Punctuator::Colon)?;
        self.scope.enter_scope(FrameKind::Label);
        self.scope.add_label(&label);
        let body = self.parse_statement();
        self.scope.exit_scope(&self.options);
        body?;
        self.flush_scope()?;
        Ok(Flow::Normal)
    }
}
