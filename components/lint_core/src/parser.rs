//! Single-pass parser driving every check.
//!
//! No syntax tree is built. Statement handlers (in `statements.rs`) and the
//! Pratt expression engine (in `expressions.rs`) walk the token stream once,
//! scoring metrics, feeding the scope tracker and reporting inline checks as
//! they go. Comment tokens are filtered here; directive comments take effect
//! at the moment they are pulled, so a directive governs only what follows it.

use crate::diagnostics::DiagnosticSink;
use crate::directive::{Directive, DirectiveEntry, IgnoreMarker};
use crate::error::{expected_identifier, expected_token, ParseAbort, ParseResult};
use crate::globals::{self, GlobalChange, GlobalTable, PredefinedGlobals};
use crate::lexer::{Checkpoint, Keyword, LexError, Lexer, Punctuator, Token, TokenKind};
use crate::messages::Message;
use crate::metrics::MetricsCollector;
use crate::options::{self, ConfigError, OptionRegistry, OptionSet, QuotePolicy};
use crate::patterns;
use crate::report::LintReport;
use crate::scope::{BindingKind, FrameKind, ScopeOutcome, ScopeTracker};
use core_types::{Diagnostic, ErrorKind};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Statements, expressions and binding patterns nested deeper than this
/// stop the run with E041
pub(crate) const MAX_NESTING: u32 = 200;

/// State of the function being parsed (the bottom entry is global code)
#[derive(Debug, Clone, Default)]
pub(crate) struct FunctionContext {
    /// `"use strict"` is statically in effect
    pub strict: bool,
    /// Declared or inferred name
    pub name: Option<String>,
    /// Opened by a function declaration
    pub is_declaration: bool,
    /// Arrow functions share `this` with their parent
    pub is_arrow: bool,
    /// Loops enclosing the current position within this function
    pub loop_depth: u32,
}

/// Syntactic form of a function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionKind {
    /// `function name() {}` in statement position
    Declaration,
    /// `function () {}` as a value
    Expression,
    /// `function name() {}` as a value; the name is bound inside
    NamedExpression,
    /// `() => ...`
    Arrow,
    /// Object literal or class method
    Method,
}

/// The single-pass lint parser
pub struct Parser {
    lexer: Lexer,
    /// Raw lexer output pulled ahead by [`Parser::peek_ahead`]
    buffer: VecDeque<Lookahead>,
    pub(crate) token: Token,
    pub(crate) prev: Token,
    consumed: usize,
    source_len: usize,
    line_lengths: Vec<usize>,
    checked_lines: usize,
    pub(crate) options: OptionRegistry,
    pub(crate) scope: ScopeTracker,
    pub(crate) metrics: MetricsCollector,
    sink: DiagnosticSink,
    base_problems: Vec<ConfigError>,
    contexts: Vec<FunctionContext>,
    /// Name for the function expression about to be parsed
    pub(crate) name_hint: Option<String>,
    /// Inside a `for (...;` head, where `in` ends the expression
    pub(crate) no_in: bool,
    /// Open recursive parses, see [`Parser::descend`]
    nesting: u32,
    first_quote: Option<char>,
}

/// A token lexed ahead, with the lexer state from before it
struct Lookahead {
    before: Checkpoint,
    raw: Result<Token, LexError>,
}

fn start_token() -> Token {
    Token {
        kind: TokenKind::EOF,
        raw: String::new(),
        line: 1,
        character: 1,
        end: 1,
        offset: 0,
        newline_before: false,
    }
}

impl Parser {
    /// Prepare a run over `source`
    pub fn new(source: &str, options: &OptionSet, predefined: Option<&PredefinedGlobals>) -> Self {
        let (registry, base_problems) = OptionRegistry::new(options);

        let mut table = GlobalTable::standard();
        for name in registry.enabled_names() {
            if let Some(set) = globals::environment(name) {
                table.add_set(set);
            }
        }
        if let Some(predefined) = predefined {
            for change in predefined.changes() {
                table.apply(change);
            }
        }

        let lexer = Lexer::new(source);
        let source_len = lexer.source_len();
        let line_lengths = source
            .split('\n')
            .map(|line| line.trim_end_matches('\r').chars().count())
            .collect();

        Self {
            lexer,
            buffer: VecDeque::new(),
            token: start_token(),
            prev: start_token(),
            consumed: 0,
            source_len,
            line_lengths,
            checked_lines: 0,
            options: registry,
            scope: ScopeTracker::new(table),
            metrics: MetricsCollector::new(),
            sink: DiagnosticSink::new(options.ignore_codes()),
            base_problems,
            contexts: vec![FunctionContext::default()],
            name_hint: None,
            no_in: false,
            nesting: 0,
            first_quote: None,
        }
    }

    /// Parse the whole program and assemble the report
    pub fn run(mut self) -> LintReport {
        match self.parse_program() {
            Ok(()) => {}
            Err(ParseAbort::Halt) => debug!("run halted"),
            Err(ParseAbort::Syntax) => trace!("syntax error escaped the program level"),
        }

        let outcome = self.finish_program();
        let ScopeOutcome {
            implieds,
            unused,
            globals,
        } = outcome;
        let diagnostics = self.sink.into_diagnostics();
        LintReport {
            success: diagnostics.is_empty(),
            diagnostics,
            implieds,
            unused,
            globals,
            functions: self.metrics.into_records(),
        }
    }

    fn parse_program(&mut self) -> ParseResult<()> {
        for problem in std::mem::take(&mut self.base_problems) {
            self.report_config(&problem, 0, 0)?;
        }
        self.advance()?;
        self.parse_directive_prologue()?;
        self.parse_statement_list(ListEnd::Program)?;
        Ok(())
    }

    fn finish_program(&mut self) -> ScopeOutcome {
        let last_line = self.line_lengths.len() + 1;
        let outcome = self.scope.finish(&self.options);
        // findings after a halt are dropped by the sink anyway
        let _ = self
            .check_line_lengths(last_line)
            .and_then(|()| self.flush_scope());
        outcome
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    fn emit(
        &mut self,
        code: &str,
        text: String,
        kind: ErrorKind,
        line: u32,
        character: u32,
    ) -> ParseResult<()> {
        let kept = self
            .sink
            .record(Diagnostic::new(line, character, code, text, kind));
        if kept && self.options.enabled("passfail") {
            let percent = self.consumed * 100 / self.source_len.max(1);
            let stop = Message::Stopping(percent);
            debug!(line, percent, "passfail stop");
            self.sink.halt(Diagnostic::new(
                line,
                character,
                stop.code(),
                stop.to_string(),
                stop.kind(),
            ));
            return Err(ParseAbort::Halt);
        }
        Ok(())
    }

    /// Enter one more level of recursive parsing. Past [`MAX_NESTING`] the
    /// run stops with E041; every `Ok` must be paired with [`Parser::ascend`].
    pub(crate) fn descend(&mut self) -> ParseResult<()> {
        if self.nesting < MAX_NESTING {
            self.nesting += 1;
            return Ok(());
        }
        let percent = self.consumed * 100 / self.source_len.max(1);
        let fatal = Message::Unrecoverable(percent);
        let (line, character) = (self.token.line, self.token.character);
        debug!(line, percent, "nesting limit reached");
        self.sink.halt(Diagnostic::new(
            line,
            character,
            fatal.code(),
            fatal.to_string(),
            fatal.kind(),
        ));
        Err(ParseAbort::Halt)
    }

    pub(crate) fn ascend(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Report a finding at an explicit position
    pub(crate) fn warn_at(&mut self, message: Message, line: u32, character: u32) -> ParseResult<()> {
        self.emit(message.code(), message.to_string(), message.kind(), line, character)
    }

    /// Report a finding at `token`
    pub(crate) fn warn(&mut self, message: Message, token: &Token) -> ParseResult<()> {
        self.warn_at(message, token.line, token.character)
    }

    /// Report a finding at the current token
    pub(crate) fn warn_here(&mut self, message: Message) -> ParseResult<()> {
        let (line, character) = (self.token.line, self.token.character);
        self.warn_at(message, line, character)
    }

    /// Report a syntax error at the current token and abandon the statement
    pub(crate) fn error_here<T>(&mut self, message: Message) -> ParseResult<T> {
        self.warn_here(message)?;
        Err(ParseAbort::Syntax)
    }

    fn report_config(&mut self, problem: &ConfigError, line: u32, character: u32) -> ParseResult<()> {
        self.emit(
            problem.code(),
            problem.to_string(),
            ErrorKind::Configuration,
            line,
            character,
        )
    }

    fn report_lex(&mut self, error: &LexError) -> ParseResult<()> {
        self.emit(
            error.kind.code(),
            error.kind.to_string(),
            ErrorKind::Lex,
            error.line,
            error.character,
        )
    }

    /// Forward whatever the scope tracker found since the last call
    pub(crate) fn flush_scope(&mut self) -> ParseResult<()> {
        for finding in self.scope.take_findings() {
            self.warn_at(finding.message, finding.line, finding.character)?;
        }
        Ok(())
    }

    // ========================================================================
    // Token stream
    // ========================================================================

    fn pull(&mut self) -> Result<Token, LexError> {
        match self.buffer.pop_front() {
            Some(entry) => entry.raw,
            None => self.lexer.next_token(),
        }
    }

    /// The current token ends a statement head or a block, so a `/` after
    /// it opens a regular expression. A `/` already lexed ahead as division
    /// is lexed again.
    pub(crate) fn allow_regex(&mut self) {
        let first = self.buffer.iter().position(|entry| match &entry.raw {
            Ok(token) => !token.is_trivia(),
            Err(_) => true,
        });
        let Some(index) = first else {
            self.lexer.allow_regex();
            return;
        };
        let relex = matches!(
            &self.buffer[index].raw,
            Ok(token) if token.is_punctuator(Punctuator::Slash)
                || token.is_punctuator(Punctuator::SlashEq)
        );
        if !relex {
            return;
        }
        let entry = self.buffer.drain(index..).next();
        if let Some(entry) = entry {
            self.lexer.restore(entry.before);
            self.lexer.allow_regex();
        }
    }

    /// Next significant token, applying directives and reporting lexing
    /// failures on the way
    fn next_significant(&mut self) -> ParseResult<Token> {
        loop {
            match self.pull() {
                Ok(token) => match token.kind {
                    TokenKind::Comment(_) => {}
                    TokenKind::Directive(directive) => {
                        self.apply_directive(directive, token.line, token.character)?;
                    }
                    _ => return Ok(token),
                },
                Err(error) => {
                    self.report_lex(&error)?;
                    if let Some(token) = error.recovered {
                        return Ok(*token);
                    }
                }
            }
        }
    }

    /// Consume the current token
    pub(crate) fn advance(&mut self) -> ParseResult<()> {
        self.check_consumed_token()?;
        self.consumed = self.token.offset + self.token.raw.chars().count();
        let next = self.next_significant()?;
        self.prev = std::mem::replace(&mut self.token, next);
        let line = self.token.line as usize;
        self.check_line_lengths(line)
    }

    fn ahead_index(&mut self, n: usize) -> usize {
        let mut seen = 0;
        let mut index = 0;
        loop {
            if index == self.buffer.len() {
                let before = self.lexer.checkpoint();
                let raw = self.lexer.next_token();
                self.buffer.push_back(Lookahead { before, raw });
            }
            let (significant, eof) = match &self.buffer[index].raw {
                Ok(token) => (!token.is_trivia(), token.is_eof()),
                Err(error) => (error.recovered.is_some(), false),
            };
            if significant {
                if seen == n || eof {
                    return index;
                }
                seen += 1;
            }
            index += 1;
        }
    }

    /// The `n`-th significant token after the current one. Nothing is
    /// consumed and no directive is applied.
    pub(crate) fn peek_ahead(&mut self, n: usize) -> Option<&Token> {
        let index = self.ahead_index(n);
        match &self.buffer.get(index)?.raw {
            Ok(token) => Some(token),
            Err(error) => error.recovered.as_deref(),
        }
    }

    /// Whether the token after the current one is `punctuator`
    pub(crate) fn next_is_punctuator(&mut self, punctuator: Punctuator) -> bool {
        self.peek_ahead(0)
            .map_or(false, |t| t.is_punctuator(punctuator))
    }

    pub(crate) fn check_punctuator(&self, punctuator: Punctuator) -> bool {
        self.token.is_punctuator(punctuator)
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.token.is_keyword(keyword)
    }

    /// Whether the current token is the contextual word `word`
    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.token.identifier() == Some(word)
    }

    /// Consume `punctuator` if it is next
    pub(crate) fn eat_punctuator(&mut self, punctuator: Punctuator) -> ParseResult<bool> {
        if self.check_punctuator(punctuator) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub(crate) fn expect_punctuator(&mut self, punctuator: Punctuator) -> ParseResult<()> {
        if self.check_punctuator(punctuator) {
            return self.advance();
        }
        let message = expected_token(punctuator.as_str(), &self.token);
        self.error_here(message)
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        if self.check_keyword(keyword) {
            return self.advance();
        }
        let message = expected_token(keyword.as_str(), &self.token);
        self.error_here(message)
    }

    /// Expect the bracket closing `opener`; end of input reports the opener
    /// as unmatched
    pub(crate) fn expect_closing(&mut self, closing: Punctuator, opener: &Token) -> ParseResult<()> {
        if self.check_punctuator(closing) {
            return self.advance();
        }
        if self.token.is_eof() {
            self.warn(Message::Unmatched(opener.raw.clone()), opener)?;
            return Err(ParseAbort::Syntax);
        }
        let message = expected_token(closing.as_str(), &self.token);
        self.error_here(message)
    }

    /// [`Parser::expect_closing`] for the `)` of a statement head or the `}`
    /// of a block, where a regular expression may follow
    pub(crate) fn expect_statement_closing(
        &mut self,
        closing: Punctuator,
        opener: &Token,
    ) -> ParseResult<()> {
        if self.check_punctuator(closing) {
            self.allow_regex();
        }
        self.expect_closing(closing, opener)
    }

    /// Consume an identifier and return it with its position
    pub(crate) fn expect_identifier(&mut self) -> ParseResult<(String, u32, u32)> {
        match self.token.identifier() {
            Some(name) => {
                let found = (name.to_string(), self.token.line, self.token.character);
                self.advance()?;
                Ok(found)
            }
            None => {
                let message = expected_identifier(&self.token);
                self.error_here(message)
            }
        }
    }

    /// Statement terminator. An explicit `;` is consumed; otherwise
    /// automatic insertion applies before a line break, `}` or the end of
    /// input, and anything else is a missing semicolon that cannot be
    /// inserted.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        self.finish_statement(false)
    }

    /// After `do ... while (cond)` a semicolon may always be inserted
    pub(crate) fn consume_semicolon_do_while(&mut self) -> ParseResult<()> {
        self.finish_statement(true)
    }

    fn finish_statement(&mut self, always_insertable: bool) -> ParseResult<()> {
        if self.eat_punctuator(Punctuator::Semicolon)? {
            return Ok(());
        }
        let (line, character) = (self.prev.line, self.prev.end);
        let closes_block = self.check_punctuator(Punctuator::RBrace);
        let insertable =
            always_insertable || self.token.newline_before || self.token.is_eof() || closes_block;

        if !insertable {
            return self.warn_at(Message::MissingSemicolonNoAsi, line, character);
        }
        let tolerated = closes_block
            && !self.token.newline_before
            && self.options.enabled("lastsemic");
        if !tolerated && !self.options.enabled("asi") {
            self.warn_at(Message::MissingSemicolon, line, character)?;
        }
        Ok(())
    }

    // ========================================================================
    // Per-token checks
    // ========================================================================

    fn check_consumed_token(&mut self) -> ParseResult<()> {
        let (line, character) = (self.token.line, self.token.character);
        match &self.token.kind {
            TokenKind::String(literal) => {
                let quote = literal.quote;
                let continuation = literal.has_line_continuation;
                let script = patterns::is_script_url(&literal.value);
                let octal = literal.has_octal_escape;
                self.check_quote(quote, line, character)?;
                if octal && self.context().strict {
                    self.warn_at(Message::StrictOctal, line, character)?;
                }
                if continuation && !self.options.enabled("multistr") {
                    self.warn_at(Message::MultilineString, line, character)?;
                }
                if script && !self.options.enabled("scripturl") {
                    self.warn_at(Message::ScriptUrl, line, character)?;
                }
            }
            TokenKind::Number(number) if number.legacy_octal && self.context().strict => {
                self.warn_at(Message::StrictOctal, line, character)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn check_quote(&mut self, quote: char, line: u32, character: u32) -> ParseResult<()> {
        match self.options.quote_policy() {
            QuotePolicy::Off => Ok(()),
            QuotePolicy::Single if quote != '\'' => {
                self.warn_at(Message::UseSingleQuote, line, character)
            }
            QuotePolicy::Double if quote != '"' => {
                self.warn_at(Message::UseDoubleQuote, line, character)
            }
            QuotePolicy::Consistent => match self.first_quote {
                None => {
                    self.first_quote = Some(quote);
                    Ok(())
                }
                Some(first) if first != quote => self.warn_at(Message::MixedQuotes, line, character),
                Some(_) => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Check every line before `up_to` that has not been checked yet
    fn check_line_lengths(&mut self, up_to: usize) -> ParseResult<()> {
        let last = up_to.saturating_sub(1).min(self.line_lengths.len());
        if last <= self.checked_lines {
            return Ok(());
        }
        let limit = self.options.limit("maxlen");
        let first = self.checked_lines + 1;
        self.checked_lines = last;
        let Some(limit) = limit else {
            return Ok(());
        };
        for line in first..=last {
            let length = self.line_lengths[line - 1];
            if length > limit as usize {
                self.warn_at(Message::LineTooLong, line as u32, length as u32)?;
            }
        }
        Ok(())
    }

    /// Camel-case check for a declared name
    pub(crate) fn check_camelcase(&mut self, name: &str, line: u32, character: u32) -> ParseResult<()> {
        if self.options.enabled("camelcase") && patterns::breaks_camel_case(name) {
            self.warn_at(Message::NotCamelCase(name.to_string()), line, character)?;
        }
        Ok(())
    }

    // ========================================================================
    // Directives
    // ========================================================================

    fn apply_directive(&mut self, directive: Directive, line: u32, character: u32) -> ParseResult<()> {
        debug!(line, kind = ?directive.kind, entries = directive.entries.len(), "directive");
        for problem in &directive.problems {
            self.report_config(problem, line, character)?;
        }
        let at_global = self.in_global_context();

        for entry in directive.entries {
            match entry {
                DirectiveEntry::SetOption { name, value } => {
                    let enables = value.is_truthy();
                    match self.options.apply(&name, value, at_global) {
                        Ok(()) => {
                            if enables && options::is_environment(&name) {
                                if let Some(set) = globals::environment(&name) {
                                    self.scope.predefined_mut().add_set(set);
                                }
                            }
                        }
                        Err(problem) => self.report_config(&problem, line, character)?,
                    }
                }
                DirectiveEntry::IgnoreCode(code) => self.sink.ignore_code(code),
                DirectiveEntry::Ignore(IgnoreMarker::Start) => self.sink.start_region(line),
                DirectiveEntry::Ignore(IgnoreMarker::End) => self.sink.end_region(line),
                DirectiveEntry::Ignore(IgnoreMarker::Line) => self.sink.ignore_line(line),
                DirectiveEntry::DeclareGlobal { name, writable } => {
                    self.scope
                        .declare_directive_global(&name, writable, line, character);
                }
                DirectiveEntry::RemoveGlobal(name) => {
                    self.scope.predefined_mut().apply(GlobalChange::Remove(name));
                }
                DirectiveEntry::Export(name) => self.scope.export(&name),
            }
        }
        Ok(())
    }

    /// Leading string-literal statements of a program or function body
    pub(crate) fn parse_directive_prologue(&mut self) -> ParseResult<()> {
        loop {
            let TokenKind::String(literal) = &self.token.kind else {
                return Ok(());
            };
            // escapes or line continuations do not count
            let inner = self.token.raw.get(1..self.token.raw.len().saturating_sub(1));
            let is_use_strict = literal.value == "use strict" && inner == Some("use strict");
            let ends_statement = match self.peek_ahead(0) {
                Some(next) => {
                    next.newline_before
                        || next.is_eof()
                        || next.is_punctuator(Punctuator::Semicolon)
                        || next.is_punctuator(Punctuator::RBrace)
                }
                None => true,
            };
            if !ends_statement {
                return Ok(());
            }

            self.metrics.add_statement();
            if is_use_strict {
                if self.context().strict {
                    self.warn_here(Message::UnnecessaryDirective("use strict".to_string()))?;
                } else {
                    self.context_mut().strict = true;
                    let global = self.in_global_context();
                    if global
                        && !self.options.enabled("globalstrict")
                        && !self.options.enabled("node")
                    {
                        self.warn_here(Message::GlobalUseStrict)?;
                    }
                }
            }
            self.advance()?;
            self.consume_semicolon()?;
        }
    }

    // ========================================================================
    // Context and scope helpers
    // ========================================================================

    pub(crate) fn context(&self) -> &FunctionContext {
        // the global context is never popped
        &self.contexts[self.contexts.len() - 1]
    }

    pub(crate) fn context_mut(&mut self) -> &mut FunctionContext {
        let last = self.contexts.len() - 1;
        &mut self.contexts[last]
    }

    /// Nearest function that binds `this` (arrows are skipped); `None` in
    /// global code
    pub(crate) fn this_context(&self) -> Option<&FunctionContext> {
        self.contexts.iter().skip(1).rev().find(|c| !c.is_arrow)
    }

    pub(crate) fn in_global_context(&self) -> bool {
        self.contexts.len() == 1
    }

    /// Declare a name in the current scope
    pub(crate) fn declare(&mut self, name: &str, kind: BindingKind, line: u32, character: u32) -> ParseResult<()> {
        if !matches!(kind, BindingKind::Exception | BindingKind::FunctionName) {
            self.check_camelcase(name, line, character)?;
        }
        self.scope.declare(name, kind, line, character, &self.options);
        self.flush_scope()
    }

    /// Read of an identifier
    pub(crate) fn reference(&mut self, name: &str, line: u32, character: u32) -> ParseResult<()> {
        self.scope.reference(name, line, character, &self.options);
        self.flush_scope()
    }

    /// Write to an identifier
    pub(crate) fn assign(&mut self, name: &str, line: u32, character: u32) -> ParseResult<()> {
        self.scope.assign(name, line, character, &self.options);
        self.flush_scope()
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parse parameters and body of a function. The current token is the
    /// opening `(` (or, for a one-parameter arrow, the parameter itself).
    /// `at` is the function's declaration position.
    pub(crate) fn parse_function(
        &mut self,
        kind: FunctionKind,
        name: Option<String>,
        at: (u32, u32),
    ) -> ParseResult<()> {
        if self.context().loop_depth > 0 && !self.options.enabled("loopfunc") {
            self.warn_at(Message::LoopFunction, at.0, at.1)?;
        }
        let shown = name.clone().unwrap_or_else(|| "(anonymous)".to_string());
        trace!(name = %shown, line = at.0, "enter function");

        let strict = self.context().strict;
        self.metrics.open(shown, at.0, at.1);
        self.scope.enter_scope(FrameKind::Function);
        self.contexts.push(FunctionContext {
            strict,
            name: name.clone(),
            is_declaration: kind == FunctionKind::Declaration,
            is_arrow: kind == FunctionKind::Arrow,
            loop_depth: 0,
        });

        let mut overlay_open = false;
        let body = self.parse_function_rest(kind, name.as_deref(), at, &mut overlay_open);
        let closed = self.close_function(at, overlay_open);
        let braced = body?;
        closed?;
        if braced {
            if kind == FunctionKind::Declaration && self.check_punctuator(Punctuator::RBrace) {
                self.allow_regex();
            }
            self.expect_punctuator(Punctuator::RBrace)?;
        }
        Ok(())
    }

    /// Everything up to (not including) the closing `}`; returns whether the
    /// body was braced
    fn parse_function_rest(
        &mut self,
        kind: FunctionKind,
        name: Option<&str>,
        at: (u32, u32),
        overlay_open: &mut bool,
    ) -> ParseResult<bool> {
        if kind == FunctionKind::NamedExpression {
            if let Some(name) = name {
                self.declare(name, BindingKind::FunctionName, at.0, at.1)?;
            }
        }

        let parameters = if kind == FunctionKind::Arrow && !self.check_punctuator(Punctuator::LParen) {
            let (param, line, character) = self.expect_identifier()?;
            self.declare(&param, BindingKind::Param, line, character)?;
            1
        } else {
            self.parse_parameters()?
        };
        self.metrics.set_parameters(parameters);

        if kind == FunctionKind::Arrow {
            self.expect_punctuator(Punctuator::Arrow)?;
            if !self.check_punctuator(Punctuator::LBrace) {
                self.options.push_overlay();
                *overlay_open = true;
                let saved = std::mem::replace(&mut self.no_in, false);
                let body = self.parse_assignment();
                self.no_in = saved;
                body?;
                return Ok(false);
            }
        }

        if !self.check_punctuator(Punctuator::LBrace) {
            let message = expected_token("{", &self.token);
            return self.error_here(message);
        }
        // a directive right after `{` belongs to this function
        self.options.push_overlay();
        *overlay_open = true;
        self.advance()?;

        let saved = std::mem::replace(&mut self.no_in, false);
        let body = self.parse_function_body(kind);
        self.no_in = saved;
        body?;
        Ok(true)
    }

    fn parse_function_body(&mut self, kind: FunctionKind) -> ParseResult<()> {
        self.parse_directive_prologue()?;
        if kind != FunctionKind::Arrow && self.options.enabled("strict") && !self.context().strict {
            self.warn_here(Message::MissingUseStrict)?;
        }
        self.parse_statement_list(ListEnd::Brace)?;
        Ok(())
    }

    fn parse_parameters(&mut self) -> ParseResult<u32> {
        let open = self.token.clone();
        self.expect_punctuator(Punctuator::LParen)?;
        let mut count = 0;
        while !self.check_punctuator(Punctuator::RParen) {
            self.eat_punctuator(Punctuator::Spread)?;
            self.parse_binding_target(BindingKind::Param)?;
            if self.eat_punctuator(Punctuator::Assign)? {
                self.parse_assignment()?;
            }
            count += 1;
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_closing(Punctuator::RParen, &open)?;
        Ok(count)
    }

    /// Metric limits, then scope and overlay teardown. Runs before the
    /// closing `}` is consumed so a directive after the function is not
    /// applied inside it.
    fn close_function(&mut self, at: (u32, u32), overlay_open: bool) -> ParseResult<()> {
        let metrics = self.metrics.current();
        let mut findings = Vec::new();
        if let Some(max) = self.options.limit("maxstatements") {
            if metrics.statements > max {
                findings.push(Message::TooManyStatements(metrics.statements));
            }
        }
        if let Some(max) = self.options.limit("maxparams") {
            if metrics.parameters > max {
                findings.push(Message::TooManyParameters(metrics.parameters));
            }
        }
        if let Some(max) = self.options.limit("maxcomplexity") {
            if metrics.complexity > max {
                findings.push(Message::TooComplex(metrics.complexity));
            }
        }

        self.scope.exit_scope(&self.options);
        if overlay_open {
            self.options.pop_overlay();
        }
        self.metrics.close();
        self.contexts.pop();
        trace!(line = at.0, "exit function");

        for finding in findings {
            self.warn_at(finding, at.0, at.1)?;
        }
        self.flush_scope()
    }

    /// Binding position: an identifier or a destructuring pattern
    pub(crate) fn parse_binding_target(&mut self, kind: BindingKind) -> ParseResult<()> {
        self.descend()?;
        let target = self.parse_binding_form(kind);
        self.ascend();
        target
    }

    fn parse_binding_form(&mut self, kind: BindingKind) -> ParseResult<()> {
        if let Some(name) = self.token.identifier() {
            let (name, line, character) = (name.to_string(), self.token.line, self.token.character);
            self.advance()?;
            return self.declare(&name, kind, line, character);
        }
        if self.check_punctuator(Punctuator::LBracket) {
            return self.parse_array_pattern(kind);
        }
        if self.check_punctuator(Punctuator::LBrace) {
            return self.parse_object_pattern(kind);
        }
        let message = expected_identifier(&self.token);
        self.error_here(message)
    }

    fn parse_array_pattern(&mut self, kind: BindingKind) -> ParseResult<()> {
        let open = self.token.clone();
        self.advance()?;
        while !self.check_punctuator(Punctuator::RBracket) {
            if self.eat_punctuator(Punctuator::Comma)? {
                continue;
            }
            self.eat_punctuator(Punctuator::Spread)?;
            self.parse_binding_target(kind)?;
            if self.eat_punctuator(Punctuator::Assign)? {
                self.parse_assignment()?;
            }
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_closing(Punctuator::RBracket, &open)
    }

    fn parse_object_pattern(&mut self, kind: BindingKind) -> ParseResult<()> {
        let open = self.token.clone();
        self.advance()?;
        while !self.check_punctuator(Punctuator::RBrace) {
            if self.eat_punctuator(Punctuator::Spread)? {
                self.parse_binding_target(kind)?;
            } else {
                let key = self.token.clone();
                let shorthand = key.identifier().map(str::to_string);
                match &key.kind {
                    TokenKind::Identifier(_)
                    | TokenKind::Keyword(_)
                    | TokenKind::String(_)
                    | TokenKind::Number(_) => self.advance()?,
                    TokenKind::Punctuator(Punctuator::LBracket) => {
                        self.advance()?;
                        self.parse_assignment()?;
                        self.expect_closing(Punctuator::RBracket, &key)?;
                    }
                    _ => {
                        let message = expected_identifier(&key);
                        return self.error_here(message);
                    }
                }
                if self.eat_punctuator(Punctuator::Colon)? {
                    self.parse_binding_target(kind)?;
                } else if let Some(name) = shorthand {
                    self.declare(&name, kind, key.line, key.character)?;
                } else {
                    let message = expected_token(":", &self.token);
                    return self.error_here(message);
                }
            }
            if self.eat_punctuator(Punctuator::Assign)? {
                self.parse_assignment()?;
            }
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        self.expect_closing(Punctuator::RBrace, &open)
    }
}

/// Where a statement list stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListEnd {
    /// End of input; a stray `}` is reported and skipped
    Program,
    /// Closing `}`
    Brace,
    /// `case`, `default` or the closing `}` of a switch
    Case,
}
