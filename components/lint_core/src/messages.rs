//! Message catalogue: every diagnostic the parser and scope tracker emit.
//!
//! Codes and texts are stable; `E` codes are errors, `W` codes warnings.

use core_types::ErrorKind;
use thiserror::Error;

/// A diagnostic the parser or scope tracker can emit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum Message {
    #[error("Missing \"use strict\" statement.")]
    MissingUseStrict,
    #[error("Strict violation.")]
    StrictViolation,
    #[error("'{0}' has already been declared.")]
    AlreadyDeclared(String),
    #[error("Attempting to override '{0}' which is a constant.")]
    ConstantOverride(String),
    #[error("Unmatched '{0}'.")]
    Unmatched(String),
    #[error("Expected '{0}' and instead saw '{1}'.")]
    ExpectedToken(String, String),
    #[error("Unexpected '{0}'.")]
    Unexpected(String),
    #[error("Expected an identifier and instead saw '{0}'.")]
    ExpectedIdentifier(String),
    #[error("Bad assignment.")]
    BadAssignment,
    #[error("Unrecoverable syntax error. ({0}% scanned).")]
    Unrecoverable(usize),
    #[error("Stopping. ({0}% scanned).")]
    Stopping(usize),
    #[error("Missing semicolon.")]
    MissingSemicolonNoAsi,
    #[error("'{0}' was used before it was defined.")]
    UsedBeforeDefined(String),
    #[error("'{0}' is already defined.")]
    AlreadyDefined(String),
    #[error("Unexpected use of '{0}'.")]
    UnexpectedUse(String),
    #[error("Use the isNaN function to compare with NaN.")]
    NanComparison,
    #[error("Read only.")]
    ReadOnly,
    #[error("'{0}' is a function.")]
    IsAFunction(String),
    #[error("Do not assign to the exception parameter.")]
    ExceptionAssign,
    #[error("Unreachable '{0}' after '{1}'.")]
    Unreachable(String, String),
    #[error("Expected an assignment or function call and instead saw an expression.")]
    ExpressionStatement,
    #[error("Do not use 'new' for side effects.")]
    NewSideEffects,
    #[error("Unnecessary semicolon.")]
    UnnecessarySemicolon,
    #[error("Missing semicolon.")]
    MissingSemicolon,
    #[error("Unnecessary directive \"{0}\".")]
    UnnecessaryDirective(String),
    #[error("Empty block.")]
    EmptyBlock,
    #[error("'{0}' used out of scope.")]
    OutOfScope(String),
    #[error("Possible strict violation.")]
    PossibleStrictViolation,
    #[error("Use '{0}' to compare with '{1}'.")]
    UseStrictCompare(String, String),
    #[error("Bad escaping of EOL. Use option multistr if needed.")]
    MultilineString,
    #[error("JavaScript URL.")]
    JavascriptUrl,
    #[error("Variables should not be deleted.")]
    DeleteVariable,
    #[error("The Function constructor is a form of eval.")]
    FunctionConstructor,
    #[error("A constructor name should start with an uppercase letter.")]
    LowercaseConstructor,
    #[error("Weird construction. Is 'new' necessary?")]
    WeirdNew,
    #[error("Do not use {0} as a constructor.")]
    NotAConstructor(String),
    #[error("Avoid arguments.{0}.")]
    AvoidArguments(String),
    #[error("eval can be harmful.")]
    EvalHarmful,
    #[error("{0} is not a function.")]
    NotAFunction(String),
    #[error("Missing 'new' prefix when invoking a constructor.")]
    MissingNew,
    #[error("Implied eval. Consider passing a function instead of a string.")]
    ImpliedEval,
    #[error("['{0}'] is better written in dot notation.")]
    DotNotation(String),
    #[error("This function has too many statements. ({0})")]
    TooManyStatements(u32),
    #[error("This function has too many parameters. ({0})")]
    TooManyParameters(u32),
    #[error("Blocks are nested too deeply. ({0})")]
    NestedTooDeeply(u32),
    #[error("This function's cyclomatic complexity is too high. ({0})")]
    TooComplex(u32),
    #[error("Redefinition of '{0}'.")]
    Redefinition(String),
    #[error("It's not necessary to initialize '{0}' to 'undefined'.")]
    InitUndefined(String),
    #[error("Don't make functions within a loop.")]
    LoopFunction,
    #[error("Expected a conditional expression and instead saw an assignment.")]
    AssignInCondition,
    #[error("Don't use 'with'.")]
    WithStatement,
    #[error("Forgotten 'debugger' statement?")]
    Debugger,
    #[error("The body of a for in should be wrapped in an if statement to filter unwanted properties from the prototype.")]
    UnfilteredForIn,
    #[error("'{0}' is not a statement label.")]
    NotALabel(String),
    #[error("Did you mean to return a conditional instead of an assignment?")]
    ReturnAssignment,
    #[error("Use the function form of \"use strict\".")]
    GlobalUseStrict,
    #[error("'{0}' is defined but never used.")]
    Unused(String),
    #[error("Line is too long.")]
    LineTooLong,
    #[error("The '{0}' property is deprecated.")]
    Deprecated(String),
    #[error("Identifier '{0}' is not in camel case.")]
    NotCamelCase(String),
    #[error("Script URL.")]
    ScriptUrl,
    #[error("Strings must use doublequote.")]
    UseDoubleQuote,
    #[error("Strings must use singlequote.")]
    UseSingleQuote,
    #[error("Mixed double and single quotes.")]
    MixedQuotes,
    #[error("Octal literals are not allowed in strict mode.")]
    StrictOctal,
    #[error("Expected '{0}' and instead saw '{1}'.")]
    ExpectedInstead(String, String),
    #[error("'{0}' is not defined.")]
    NotDefined(String),
    #[error("'{0}' is already defined in outer scope.")]
    DefinedInOuterScope(String),
}

impl Message {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        use Message::*;
        match self {
            MissingUseStrict => "E007",
            StrictViolation => "E008",
            AlreadyDeclared(_) => "E011",
            ConstantOverride(_) => "E013",
            Unmatched(_) => "E019",
            ExpectedToken(..) => "E021",
            Unexpected(_) => "E024",
            ExpectedIdentifier(_) => "E030",
            BadAssignment => "E031",
            Unrecoverable(_) => "E041",
            Stopping(_) => "E042",
            MissingSemicolonNoAsi => "E058",
            UsedBeforeDefined(_) => "W003",
            AlreadyDefined(_) => "W004",
            UnexpectedUse(_) => "W016",
            NanComparison => "W019",
            ReadOnly => "W020",
            IsAFunction(_) => "W021",
            ExceptionAssign => "W022",
            Unreachable(..) => "W027",
            ExpressionStatement => "W030",
            NewSideEffects => "W031",
            UnnecessarySemicolon => "W032",
            MissingSemicolon => "W033",
            UnnecessaryDirective(_) => "W034",
            EmptyBlock => "W035",
            OutOfScope(_) => "W038",
            PossibleStrictViolation => "W040",
            UseStrictCompare(..) => "W041",
            MultilineString => "W043",
            JavascriptUrl => "W050",
            DeleteVariable => "W051",
            FunctionConstructor => "W054",
            LowercaseConstructor => "W055",
            WeirdNew => "W057",
            NotAConstructor(_) => "W053",
            AvoidArguments(_) => "W059",
            EvalHarmful => "W061",
            NotAFunction(_) => "W063",
            MissingNew => "W064",
            ImpliedEval => "W066",
            DotNotation(_) => "W069",
            TooManyStatements(_) => "W071",
            TooManyParameters(_) => "W072",
            NestedTooDeeply(_) => "W073",
            TooComplex(_) => "W074",
            Redefinition(_) => "W079",
            InitUndefined(_) => "W080",
            LoopFunction => "W083",
            AssignInCondition => "W084",
            WithStatement => "W085",
            Debugger => "W087",
            UnfilteredForIn => "W089",
            NotALabel(_) => "W090",
            ReturnAssignment => "W093",
            GlobalUseStrict => "W097",
            Unused(_) => "W098",
            LineTooLong => "W101",
            Deprecated(_) => "W103",
            NotCamelCase(_) => "W106",
            ScriptUrl => "W107",
            UseDoubleQuote => "W108",
            UseSingleQuote => "W109",
            MixedQuotes => "W110",
            StrictOctal => "W115",
            ExpectedInstead(..) => "W116",
            NotDefined(_) => "W117",
            DefinedInOuterScope(_) => "W123",
        }
    }

    /// Taxonomy classification
    pub fn kind(&self) -> ErrorKind {
        use Message::*;
        match self {
            Unmatched(_)
            | ExpectedToken(..)
            | Unexpected(_)
            | ExpectedIdentifier(_)
            | BadAssignment
            | MissingSemicolonNoAsi
            | Unrecoverable(_)
            | MissingSemicolon
            | UnnecessarySemicolon => ErrorKind::Syntax,
            Stopping(_) => ErrorKind::Configuration,
            _ => ErrorKind::Semantic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_and_code() {
        let msg = Message::ExpectedInstead("===".into(), "==".into());
        assert_eq!(msg.to_string(), "Expected '===' and instead saw '=='.");
        assert_eq!(msg.code(), "W116");
        assert_eq!(msg.kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_semicolon_messages_share_text() {
        assert_eq!(
            Message::MissingSemicolon.to_string(),
            Message::MissingSemicolonNoAsi.to_string()
        );
        assert_eq!(Message::MissingSemicolonNoAsi.code(), "E058");
        assert!(Message::ExpectedToken("(".into(), "x".into()).kind().abandons_statement());
    }

    #[test]
    fn test_stopping_message() {
        assert_eq!(Message::Stopping(42).to_string(), "Stopping. (42% scanned).");
        let fatal = Message::Unrecoverable(3);
        assert_eq!(fatal.to_string(), "Unrecoverable syntax error. (3% scanned).");
        assert_eq!((fatal.code(), fatal.kind()), ("E041", ErrorKind::Syntax));
    }
}
