//! JavaScript Lexer - tokenizes source code into tokens
//!
//! Comments are not skipped: they come out as [`TokenKind::Comment`] or, when
//! their body holds a directive, as [`TokenKind::Directive`]. Whether `/`
//! starts a regular expression is decided from the previous significant token.

use crate::directive::{self, Directive};
use thiserror::Error;

/// JavaScript keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Keyword {
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("break", Keyword::Break),
    ("case", Keyword::Case),
    ("catch", Keyword::Catch),
    ("class", Keyword::Class),
    ("const", Keyword::Const),
    ("continue", Keyword::Continue),
    ("debugger", Keyword::Debugger),
    ("default", Keyword::Default),
    ("delete", Keyword::Delete),
    ("do", Keyword::Do),
    ("else", Keyword::Else),
    ("export", Keyword::Export),
    ("extends", Keyword::Extends),
    ("false", Keyword::False),
    ("finally", Keyword::Finally),
    ("for", Keyword::For),
    ("function", Keyword::Function),
    ("if", Keyword::If),
    ("import", Keyword::Import),
    ("in", Keyword::In),
    ("instanceof", Keyword::Instanceof),
    ("let", Keyword::Let),
    ("new", Keyword::New),
    ("null", Keyword::Null),
    ("return", Keyword::Return),
    ("super", Keyword::Super),
    ("switch", Keyword::Switch),
    ("this", Keyword::This),
    ("throw", Keyword::Throw),
    ("true", Keyword::True),
    ("try", Keyword::Try),
    ("typeof", Keyword::Typeof),
    ("var", Keyword::Var),
    ("void", Keyword::Void),
    ("while", Keyword::While),
    ("with", Keyword::With),
];

impl Keyword {
    /// Look a reserved word up
    pub fn from_word(word: &str) -> Option<Self> {
        KEYWORDS.iter().find(|(w, _)| *w == word).map(|(_, k)| *k)
    }

    /// Source spelling
    pub fn as_str(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, k)| *k == self)
            .map_or("", |(w, _)| *w)
    }

    /// Keywords that produce a value (a following `/` divides)
    pub fn is_value(self) -> bool {
        matches!(
            self,
            Keyword::This | Keyword::Super | Keyword::True | Keyword::False | Keyword::Null
        )
    }

    /// Keywords that can only begin a statement
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Var
                | Keyword::Let
                | Keyword::Const
                | Keyword::Function
                | Keyword::If
                | Keyword::For
                | Keyword::While
                | Keyword::Do
                | Keyword::Switch
                | Keyword::Return
                | Keyword::Break
                | Keyword::Continue
                | Keyword::Throw
                | Keyword::Try
                | Keyword::With
                | Keyword::Debugger
                | Keyword::Class
        )
    }
}

/// JavaScript punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Punctuator {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Spread,
    OptionalChain,
    Colon,
    Question,
    Assign,
    Arrow,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    NullishCoalesce,
    Not,
    And,
    Or,
    Xor,
    Tilde,
    LtLt,
    GtGt,
    GtGtGt,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    StarStarEq,
    AndEq,
    OrEq,
    XorEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,
    AndAndEq,
    OrOrEq,
    NullishCoalesceEq,
    PlusPlus,
    MinusMinus,
}

/// Longest spellings first so a prefix scan finds the maximal munch.
const PUNCTUATORS: &[(&str, Punctuator)] = &[
    (">>>=", Punctuator::GtGtGtEq),
    ("...", Punctuator::Spread),
    ("===", Punctuator::EqEqEq),
    ("!==", Punctuator::NotEqEq),
    ("**=", Punctuator::StarStarEq),
    ("<<=", Punctuator::LtLtEq),
    (">>=", Punctuator::GtGtEq),
    (">>>", Punctuator::GtGtGt),
    ("&&=", Punctuator::AndAndEq),
    ("||=", Punctuator::OrOrEq),
    ("??=", Punctuator::NullishCoalesceEq),
    ("=>", Punctuator::Arrow),
    ("==", Punctuator::EqEq),
    ("!=", Punctuator::NotEq),
    ("<=", Punctuator::LtEq),
    (">=", Punctuator::GtEq),
    ("&&", Punctuator::AndAnd),
    ("||", Punctuator::OrOr),
    ("??", Punctuator::NullishCoalesce),
    ("?.", Punctuator::OptionalChain),
    ("++", Punctuator::PlusPlus),
    ("--", Punctuator::MinusMinus),
    ("+=", Punctuator::PlusEq),
    ("-=", Punctuator::MinusEq),
    ("*=", Punctuator::StarEq),
    ("/=", Punctuator::SlashEq),
    ("%=", Punctuator::PercentEq),
    ("&=", Punctuator::AndEq),
    ("|=", Punctuator::OrEq),
    ("^=", Punctuator::XorEq),
    ("<<", Punctuator::LtLt),
    (">>", Punctuator::GtGt),
    ("**", Punctuator::StarStar),
    ("{", Punctuator::LBrace),
    ("}", Punctuator::RBrace),
    ("(", Punctuator::LParen),
    (")", Punctuator::RParen),
    ("[", Punctuator::LBracket),
    ("]", Punctuator::RBracket),
    (";", Punctuator::Semicolon),
    (",", Punctuator::Comma),
    ("<", Punctuator::Lt),
    (">", Punctuator::Gt),
    ("+", Punctuator::Plus),
    ("-", Punctuator::Minus),
    ("*", Punctuator::Star),
    ("/", Punctuator::Slash),
    ("%", Punctuator::Percent),
    ("&", Punctuator::And),
    ("|", Punctuator::Or),
    ("^", Punctuator::Xor),
    ("!", Punctuator::Not),
    ("~", Punctuator::Tilde),
    ("?", Punctuator::Question),
    (":", Punctuator::Colon),
    ("=", Punctuator::Assign),
    (".", Punctuator::Dot),
];

impl Punctuator {
    /// Source spelling
    pub fn as_str(self) -> &'static str {
        PUNCTUATORS
            .iter()
            .find(|(_, p)| *p == self)
            .map_or("", |(s, _)| *s)
    }

    /// `=` and every compound assignment
    pub fn is_assignment(self) -> bool {
        self == Punctuator::Assign || self.is_compound_assignment()
    }

    /// `+=`, `>>>=`, `??=` and the rest
    pub fn is_compound_assignment(self) -> bool {
        matches!(
            self,
            Punctuator::PlusEq
                | Punctuator::MinusEq
                | Punctuator::StarEq
                | Punctuator::SlashEq
                | Punctuator::PercentEq
                | Punctuator::StarStarEq
                | Punctuator::AndEq
                | Punctuator::OrEq
                | Punctuator::XorEq
                | Punctuator::LtLtEq
                | Punctuator::GtGtEq
                | Punctuator::GtGtGtEq
                | Punctuator::AndAndEq
                | Punctuator::OrOrEq
                | Punctuator::NullishCoalesceEq
        )
    }

    /// Bitwise operators, assignment forms included
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            Punctuator::And
                | Punctuator::Or
                | Punctuator::Xor
                | Punctuator::Tilde
                | Punctuator::LtLt
                | Punctuator::GtGt
                | Punctuator::GtGtGt
                | Punctuator::AndEq
                | Punctuator::OrEq
                | Punctuator::XorEq
                | Punctuator::LtLtEq
                | Punctuator::GtGtEq
                | Punctuator::GtGtGtEq
        )
    }
}

/// Decoded string literal
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Cooked value
    pub value: String,
    /// `'` or `"`
    pub quote: char,
    /// A backslash-newline continuation occurred
    pub has_line_continuation: bool,
    /// A legacy octal escape such as `\07` occurred
    pub has_octal_escape: bool,
}

/// Decoded numeric literal
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    /// Numeric value (0 for malformed literals)
    pub value: f64,
    /// Written as a legacy octal (`017`)
    pub legacy_octal: bool,
}

/// Which piece of a template literal a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart {
    /// `` `text` `` with no substitution
    Whole,
    /// `` `text${ ``
    Head,
    /// `}text${`
    Middle,
    /// `` }text` ``
    Tail,
}

/// What a token is
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier (escapes decoded)
    Identifier(String),
    /// Reserved word
    Keyword(Keyword),
    /// Operator or delimiter
    Punctuator(Punctuator),
    /// String literal
    String(StringLiteral),
    /// Numeric literal
    Number(NumberLiteral),
    /// Regular expression literal
    RegExp {
        /// Text between the slashes
        pattern: String,
        /// Trailing flags
        flags: String,
    },
    /// Template literal piece
    Template {
        /// Which piece
        part: TemplatePart,
        /// Cooked text of the piece
        cooked: String,
    },
    /// Ordinary comment (body only)
    Comment(String),
    /// Directive comment
    Directive(Directive),
    /// End of input
    EOF,
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// Exact source text
    pub raw: String,
    /// 1-based line of the first character
    pub line: u32,
    /// 1-based column of the first character
    pub character: u32,
    /// Column just past the last character (on the token's last line)
    pub end: u32,
    /// Character offset of the first character
    pub offset: usize,
    /// A line terminator occurred since the previous significant token
    pub newline_before: bool,
}

impl Token {
    /// Whether the token is the given punctuator
    pub fn is_punctuator(&self, punctuator: Punctuator) -> bool {
        matches!(self.kind, TokenKind::Punctuator(p) if p == punctuator)
    }

    /// Whether the token is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }

    /// Whether this is the end of input
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EOF)
    }

    /// Comments and directives
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Comment(_) | TokenKind::Directive(_))
    }

    /// Identifier name, if the token is an identifier
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Name usable after `.` or as an object key (keywords allowed)
    pub fn property_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            TokenKind::Keyword(k) => Some(k.as_str()),
            _ => None,
        }
    }

    /// Text used for this token in messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::EOF => "(end)".to_string(),
            TokenKind::Identifier(name) => name.clone(),
            _ => self.raw.clone(),
        }
    }

    fn ends_value(&self) -> bool {
        match &self.kind {
            TokenKind::Identifier(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::RegExp { .. } => true,
            TokenKind::Keyword(k) => k.is_value(),
            TokenKind::Punctuator(p) => matches!(
                p,
                Punctuator::RParen | Punctuator::RBracket | Punctuator::RBrace
            ),
            TokenKind::Template { part, .. } => {
                matches!(part, TemplatePart::Whole | TemplatePart::Tail)
            }
            _ => false,
        }
    }
}

/// Lexing failure kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// String reached a line end or the input end
    #[error("Unclosed string.")]
    UnterminatedString,
    /// Template reached the input end
    #[error("Unclosed template literal.")]
    UnterminatedTemplate,
    /// Malformed `\x` / `\u` escape
    #[error("Bad or unnecessary escaping.")]
    InvalidEscape,
    /// Malformed numeric literal
    #[error("Bad number '{0}'.")]
    InvalidNumber(String),
    /// `/*` without `*/`
    #[error("Unclosed comment.")]
    UnterminatedComment,
    /// Regular expression reached a line end or the input end
    #[error("Unclosed regular expression.")]
    UnterminatedRegExp,
    /// Character that starts no token
    #[error("Unexpected '{0}'.")]
    UnexpectedCharacter(char),
}

impl LexErrorKind {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            LexErrorKind::UnterminatedString | LexErrorKind::UnterminatedTemplate => "E029",
            LexErrorKind::InvalidEscape => "W044",
            LexErrorKind::InvalidNumber(_) => "W045",
            LexErrorKind::UnterminatedComment => "E017",
            LexErrorKind::UnterminatedRegExp => "E015",
            LexErrorKind::UnexpectedCharacter(_) => "E024",
        }
    }
}

/// A lexing failure, with a substitute token when scanning could recover
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}, col {character}: {kind}")]
pub struct LexError {
    /// What went wrong
    pub kind: LexErrorKind,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub character: u32,
    /// Token to continue with, if any
    pub recovered: Option<Box<Token>>,
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    position: usize,
    line: u32,
    column: u32,
}

struct Failure {
    kind: LexErrorKind,
    at: Mark,
    recovered: Option<TokenKind>,
}

type Scan = Result<TokenKind, Failure>;

/// Lexer state between two tokens, restorable with [`Lexer::restore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    position: usize,
    line: u32,
    column: u32,
    regex_allowed: bool,
    pending_newline: bool,
    templates: Vec<u32>,
}

/// Lexer for JavaScript source code
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
    regex_allowed: bool,
    pending_newline: bool,
    /// Open `${` substitutions, each with its nested brace depth
    templates: Vec<u32>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        let mut lexer = Self {
            chars: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            regex_allowed: true,
            pending_newline: false,
            templates: Vec::new(),
        };
        lexer.skip_hashbang();
        lexer
    }

    /// Characters consumed so far
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Total source length in characters
    pub fn source_len(&self) -> usize {
        self.chars.len()
    }

    /// Let the next token be a regular expression even though the previous
    /// one ended a value (`)` of an `if` head, `}` of a block)
    pub fn allow_regex(&mut self) {
        self.regex_allowed = true;
    }

    /// Snapshot of the position and lexing mode
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            line: self.line,
            column: self.column,
            regex_allowed: self.regex_allowed,
            pending_newline: self.pending_newline,
            templates: self.templates.clone(),
        }
    }

    /// Go back to `checkpoint`; tokens lexed since are lexed again
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        let Checkpoint {
            position,
            line,
            column,
            regex_allowed,
            pending_newline,
            templates,
        } = checkpoint;
        self.position = position;
        self.line = line;
        self.column = column;
        self.regex_allowed = regex_allowed;
        self.pending_newline = pending_newline;
        self.templates = templates;
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.mark();

        if self.is_at_end() {
            return Ok(self.finish(TokenKind::EOF, start));
        }

        let scanned = self.scan(start);
        match scanned {
            Ok(kind) => Ok(self.finish(kind, start)),
            Err(failure) => {
                let recovered = failure
                    .recovered
                    .map(|kind| Box::new(self.finish(kind, start)));
                Err(LexError {
                    kind: failure.kind,
                    line: failure.at.line,
                    character: failure.at.column,
                    recovered,
                })
            }
        }
    }

    fn scan(&mut self, start: Mark) -> Scan {
        let ch = self.peek();
        match ch {
            '/' if self.peek_next() == Some('/') => Ok(self.scan_line_comment()),
            '/' if self.peek_next() == Some('*') => self.scan_block_comment(start),
            '/' if self.regex_allowed => self.scan_regexp(start),
            '`' => {
                self.advance();
                self.scan_template(start, TemplatePart::Whole, TemplatePart::Head)
            }
            '}' if self.templates.last() == Some(&0) => {
                self.templates.pop();
                self.advance();
                self.scan_template(start, TemplatePart::Tail, TemplatePart::Middle)
            }
            '"' | '\'' => {
                self.advance();
                self.scan_string(ch, start)
            }
            '.' if self.peek_next().map_or(false, |c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            _ if ch.is_ascii_digit() => self.scan_number(start),
            _ if is_id_start(ch) || ch == '\\' => self.scan_identifier(start),
            _ => match self.scan_punctuator() {
                Some(p) => {
                    self.track_braces(p);
                    Ok(TokenKind::Punctuator(p))
                }
                None => {
                    self.advance();
                    Err(Failure {
                        kind: LexErrorKind::UnexpectedCharacter(ch),
                        at: start,
                        recovered: None,
                    })
                }
            },
        }
    }

    fn finish(&mut self, kind: TokenKind, start: Mark) -> Token {
        let raw: String = self.chars[start.position..self.position].iter().collect();
        let mut token = Token {
            kind,
            raw,
            line: start.line,
            character: start.column,
            end: self.column,
            offset: start.position,
            newline_before: false,
        };
        if !token.is_trivia() {
            token.newline_before = std::mem::take(&mut self.pending_newline);
            self.regex_allowed = !token.ends_value();
        }
        token
    }

    fn track_braces(&mut self, punctuator: Punctuator) {
        if let Some(depth) = self.templates.last_mut() {
            match punctuator {
                Punctuator::LBrace => *depth += 1,
                Punctuator::RBrace => *depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    fn scan_punctuator(&mut self) -> Option<Punctuator> {
        let rest = &self.chars[self.position..];
        let (text, punctuator) = PUNCTUATORS.iter().find(|(text, _)| {
            text.chars().count() <= rest.len() && text.chars().zip(rest).all(|(a, b)| a == *b)
        })?;

        // `a ? .5 : b` is a conditional, not optional chaining
        if *punctuator == Punctuator::OptionalChain
            && rest.get(2).map_or(false, |c| c.is_ascii_digit())
        {
            self.advance();
            return Some(Punctuator::Question);
        }

        for _ in 0..text.chars().count() {
            self.advance();
        }
        Some(*punctuator)
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let body_start = self.position;
        while !self.is_at_end() && !is_line_terminator(self.peek()) {
            self.advance();
        }
        let body: String = self.chars[body_start..self.position].iter().collect();
        comment_kind(body)
    }

    fn scan_block_comment(&mut self, start: Mark) -> Scan {
        self.advance();
        self.advance();
        let body_start = self.position;
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == Some('/') {
                let body: String = self.chars[body_start..self.position].iter().collect();
                self.advance();
                self.advance();
                return Ok(comment_kind(body));
            }
            if is_line_terminator(self.peek()) {
                self.pending_newline = true;
            }
            self.advance();
        }
        Err(Failure {
            kind: LexErrorKind::UnterminatedComment,
            at: start,
            recovered: None,
        })
    }

    fn scan_string(&mut self, quote: char, start: Mark) -> Scan {
        let mut literal = StringLiteral {
            value: String::new(),
            quote,
            has_line_continuation: false,
            has_octal_escape: false,
        };
        let mut bad_escape: Option<Mark> = None;

        loop {
            if self.is_at_end() || is_line_terminator(self.peek()) {
                return Err(Failure {
                    kind: LexErrorKind::UnterminatedString,
                    at: start,
                    recovered: Some(TokenKind::String(literal)),
                });
            }
            let ch = self.advance();
            if ch == quote {
                break;
            }
            if ch != '\\' {
                literal.value.push(ch);
                continue;
            }

            let escape_at = self.mark();
            if self.is_at_end() {
                continue;
            }
            let escaped = self.advance();
            match escaped {
                'n' => literal.value.push('\n'),
                't' => literal.value.push('\t'),
                'r' => literal.value.push('\r'),
                'b' => literal.value.push('\u{0008}'),
                'f' => literal.value.push('\u{000C}'),
                'v' => literal.value.push('\u{000B}'),
                '\r' => {
                    if self.peek() == '\n' {
                        self.advance();
                    }
                    literal.has_line_continuation = true;
                }
                '\n' | '\u{2028}' | '\u{2029}' => literal.has_line_continuation = true,
                '0' if !self.peek().is_ascii_digit() => literal.value.push('\0'),
                '0'..='7' => {
                    literal.has_octal_escape = true;
                    let mut code = escaped.to_digit(8).unwrap_or(0);
                    while code < 32 && matches!(self.peek(), '0'..='7') {
                        code = code * 8 + self.advance().to_digit(8).unwrap_or(0);
                    }
                    literal.value.extend(char::from_u32(code));
                }
                'x' => match self.hex_digits(2) {
                    Some(c) => literal.value.push(c),
                    None => {
                        bad_escape.get_or_insert(escape_at);
                    }
                },
                'u' => match self.unicode_escape() {
                    Some(c) => literal.value.push(c),
                    None => {
                        bad_escape.get_or_insert(escape_at);
                    }
                },
                other => literal.value.push(other),
            }
        }

        match bad_escape {
            Some(at) => Err(Failure {
                kind: LexErrorKind::InvalidEscape,
                at,
                recovered: Some(TokenKind::String(literal)),
            }),
            None => Ok(TokenKind::String(literal)),
        }
    }

    /// Scan template text up to the closing backtick (`closed`) or the next
    /// `${` (`open`).
    fn scan_template(&mut self, start: Mark, closed: TemplatePart, open: TemplatePart) -> Scan {
        let mut cooked = String::new();
        while !self.is_at_end() {
            let ch = self.advance();
            match ch {
                '`' => return Ok(TokenKind::Template { part: closed, cooked }),
                '$' if self.peek() == '{' => {
                    self.advance();
                    self.templates.push(0);
                    return Ok(TokenKind::Template { part: open, cooked });
                }
                '\\' if !self.is_at_end() => cooked.push(self.advance()),
                _ => {
                    if is_line_terminator(ch) {
                        self.pending_newline = true;
                    }
                    cooked.push(ch)
                }
            }
        }
        Err(Failure {
            kind: LexErrorKind::UnterminatedTemplate,
            at: start,
            recovered: Some(TokenKind::Template { part: closed, cooked }),
        })
    }

    fn scan_regexp(&mut self, start: Mark) -> Scan {
        self.advance();
        let mut pattern = String::new();
        let mut in_class = false;

        loop {
            if self.is_at_end() || is_line_terminator(self.peek()) {
                return Err(Failure {
                    kind: LexErrorKind::UnterminatedRegExp,
                    at: start,
                    recovered: Some(TokenKind::RegExp {
                        pattern,
                        flags: String::new(),
                    }),
                });
            }
            let ch = self.advance();
            match ch {
                '\\' => {
                    pattern.push(ch);
                    if !self.is_at_end() && !is_line_terminator(self.peek()) {
                        pattern.push(self.advance());
                    }
                }
                '[' => {
                    in_class = true;
                    pattern.push(ch);
                }
                ']' => {
                    in_class = false;
                    pattern.push(ch);
                }
                '/' if !in_class => break,
                _ => pattern.push(ch),
            }
        }

        let mut flags = String::new();
        while !self.is_at_end() && is_id_continue(self.peek()) {
            flags.push(self.advance());
        }
        Ok(TokenKind::RegExp { pattern, flags })
    }

    fn scan_number(&mut self, start: Mark) -> Scan {
        let mut literal = NumberLiteral {
            value: 0.0,
            legacy_octal: false,
        };
        let mut malformed = false;

        let radix = match (self.peek(), self.peek_next()) {
            ('0', Some('x' | 'X')) => Some(16),
            ('0', Some('o' | 'O')) => Some(8),
            ('0', Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.advance();
            self.advance();
            let digits = self.take_digits(|c| c.is_digit(radix));
            malformed = digits.is_empty();
            literal.value = digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d));
        } else if self.peek() == '0' && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            let digits = self.take_digits(|c| c.is_ascii_digit());
            if digits.chars().all(|c| c.is_digit(8)) {
                literal.legacy_octal = true;
                literal.value = digits
                    .chars()
                    .filter_map(|c| c.to_digit(8))
                    .fold(0.0, |acc, d| acc * 8.0 + f64::from(d));
            } else {
                literal.value = digits.parse().unwrap_or(0.0);
            }
        } else {
            let mut text = self.take_digits(|c| c.is_ascii_digit());
            if self.peek() == '.' {
                self.advance();
                text.push('.');
                text.push_str(&self.take_digits(|c| c.is_ascii_digit()));
            }
            if matches!(self.peek(), 'e' | 'E') {
                self.advance();
                text.push('e');
                if matches!(self.peek(), '+' | '-') {
                    text.push(self.advance());
                }
                let exponent = self.take_digits(|c| c.is_ascii_digit());
                malformed = exponent.is_empty();
                text.push_str(&exponent);
            }
            literal.value = text.parse().unwrap_or(0.0);
        }

        // BigInt suffix
        if self.peek() == 'n' && !literal.legacy_octal {
            self.advance();
        }

        if !self.is_at_end() && is_id_start(self.peek()) {
            while !self.is_at_end() && is_id_continue(self.peek()) {
                self.advance();
            }
            malformed = true;
        }

        if malformed {
            let raw: String = self.chars[start.position..self.position].iter().collect();
            literal.value = 0.0;
            return Err(Failure {
                kind: LexErrorKind::InvalidNumber(raw),
                at: start,
                recovered: Some(TokenKind::Number(literal)),
            });
        }
        Ok(TokenKind::Number(literal))
    }

    fn take_digits(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut digits = String::new();
        while !self.is_at_end() && (accept(self.peek()) || self.peek() == '_') {
            let c = self.advance();
            if c != '_' {
                digits.push(c);
            }
        }
        digits
    }

    fn scan_identifier(&mut self, start: Mark) -> Scan {
        let mut name = String::new();
        let mut escaped = false;

        while !self.is_at_end() {
            let ch = self.peek();
            if ch == '\\' {
                let at = self.mark();
                self.advance();
                let decoded = if self.peek() == 'u' {
                    self.advance();
                    self.unicode_escape()
                } else {
                    None
                };
                match decoded {
                    Some(c) => {
                        name.push(c);
                        escaped = true;
                    }
                    None => {
                        return Err(Failure {
                            kind: LexErrorKind::InvalidEscape,
                            at,
                            recovered: (!name.is_empty()).then(|| TokenKind::Identifier(name)),
                        });
                    }
                }
            } else if is_id_continue(ch) {
                name.push(self.advance());
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(Failure {
                kind: LexErrorKind::UnexpectedCharacter('\\'),
                at: start,
                recovered: None,
            });
        }

        match Keyword::from_word(&name) {
            Some(keyword) if !escaped => Ok(TokenKind::Keyword(keyword)),
            _ => Ok(TokenKind::Identifier(name)),
        }
    }

    /// Decode the part of `\u` after the `u`
    fn unicode_escape(&mut self) -> Option<char> {
        if self.peek() != '{' {
            return self.hex_digits(4);
        }
        self.advance();
        let mut code: u32 = 0;
        let mut count = 0;
        while !self.is_at_end() && self.peek().is_ascii_hexdigit() {
            code = code.checked_mul(16)?.checked_add(self.advance().to_digit(16)?)?;
            count += 1;
        }
        if count == 0 || self.peek() != '}' {
            return None;
        }
        self.advance();
        char::from_u32(code)
    }

    fn hex_digits(&mut self, count: usize) -> Option<char> {
        let mut code: u32 = 0;
        for _ in 0..count {
            if self.is_at_end() || !self.peek().is_ascii_hexdigit() {
                return None;
            }
            code = code * 16 + self.advance().to_digit(16)?;
        }
        char::from_u32(code)
    }

    fn skip_hashbang(&mut self) {
        if self.peek() == '#' && self.peek_next() == Some('!') {
            while !self.is_at_end() && !is_line_terminator(self.peek()) {
                self.advance();
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            let ch = self.peek();
            if is_line_terminator(ch) {
                self.pending_newline = true;
            } else if !(ch.is_whitespace() || ch == '\u{FEFF}') {
                break;
            }
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> char {
        self.chars.get(self.position).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    /// Consume one character, keeping line and column current
    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.position += 1;
        let crlf = ch == '\r' && self.peek() == '\n';
        if is_line_terminator(ch) && !crlf {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }
}

fn comment_kind(body: String) -> TokenKind {
    match directive::parse_comment(&body) {
        Some(directive) => TokenKind::Directive(directive),
        None => TokenKind::Comment(body),
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_id_continue(ch: char) -> bool {
    is_id_start(ch) || ch.is_alphanumeric() || ch == '\u{200C}' || ch == '\u{200D}'
}
