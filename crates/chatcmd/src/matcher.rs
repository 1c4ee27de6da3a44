//! The argument-matcher protocol.
//!
//! A matcher attempts to consume a prefix of the remaining input line and
//! optionally extracts a typed value. The built-in matchers form a closed
//! variant set ([`Matcher`]); hosts can plug in their own argument kinds
//! through the [`ArgumentMatcher`] trait via the builder's `argument` method.

use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::CommandContext;
use crate::error::MatchError;
use crate::position;
use crate::value::ArgValue;

/// A successful match over a prefix of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSuccess {
    /// The extracted value, if the matcher produces one.
    pub value: Option<ArgValue>,
    /// Byte length of the input prefix this matcher claims. Always lies on a
    /// character boundary of the input it was given.
    pub consumed: usize,
    /// Whether `value` becomes a positional argument for the handler.
    /// Literals and gates match without contributing a value.
    pub push: bool,
}

impl MatchSuccess {
    /// A zero-consumption success that contributes no value, as produced by
    /// root placeholders and gates.
    pub fn empty() -> Self {
        Self {
            value: None,
            consumed: 0,
            push: false,
        }
    }

    /// A success that pushes `value` after consuming `consumed` bytes.
    pub fn pushing(value: ArgValue, consumed: usize) -> Self {
        Self {
            value: Some(value),
            consumed,
            push: true,
        }
    }
}

/// Result of one matcher attempt.
pub type MatchResult = Result<MatchSuccess, MatchError>;

/// Host-defined argument kind.
///
/// Implementations receive the trimmed remainder of the input line and the
/// execution context, and must claim a prefix that lies on a character
/// boundary. The `name` passed to the builder is provided back for error
/// messages and completion tokens.
pub trait ArgumentMatcher {
    /// Attempts to consume a prefix of `input`.
    fn matches(&self, input: &str, ctx: &CommandContext) -> MatchResult;

    /// Short placeholder shown in usage strings, e.g. `<item:enum>`.
    fn completion_token(&self, name: &str) -> String {
        format!("<{name}>")
    }
}

/// Predicate evaluated by a `requires` gate.
pub type GatePredicate = Rc<dyn Fn(&CommandContext) -> bool>;

/// One grammar fragment's matcher.
///
/// The set is closed apart from [`Matcher::Custom`]; the dispatch engine and
/// the help reporter only ever inspect variants through [`Matcher::matches`],
/// [`Matcher::completion_token`] and [`Matcher::blocks_help`].
pub enum Matcher {
    /// Always succeeds consuming nothing. Used at the tree root and for the
    /// synthetic node that carries a handler.
    Root,
    /// Matches an exact word.
    Literal(String),
    /// Matches a numeric token.
    Number { name: String },
    /// Matches a string token; greedy mode takes the whole remainder.
    Str { name: String, greedy: bool },
    /// Matches three coordinate components.
    Position { name: String },
    /// Consumes nothing; succeeds iff the predicate holds for the context.
    Requires {
        predicate: GatePredicate,
        message: String,
        counts_for_help: bool,
    },
    /// Host-defined argument kind.
    Custom {
        name: String,
        matcher: Box<dyn ArgumentMatcher>,
    },
}

impl Matcher {
    /// An exact-word matcher.
    pub fn literal(text: impl Into<String>) -> Self {
        Matcher::Literal(text.into())
    }

    /// A numeric-token matcher named `name`.
    pub fn number(name: impl Into<String>) -> Self {
        Matcher::Number { name: name.into() }
    }

    /// A string matcher named `name`; `greedy` takes the whole remainder.
    pub fn string(name: impl Into<String>, greedy: bool) -> Self {
        Matcher::Str {
            name: name.into(),
            greedy,
        }
    }

    /// A coordinate matcher named `name`.
    pub fn position(name: impl Into<String>) -> Self {
        Matcher::Position { name: name.into() }
    }

    /// A gate over the execution context. `counts_for_help` decides whether
    /// the help reporter prunes subtrees when the predicate is false.
    pub fn requires(
        predicate: impl Fn(&CommandContext) -> bool + 'static,
        message: impl Into<String>,
        counts_for_help: bool,
    ) -> Self {
        Matcher::Requires {
            predicate: Rc::new(predicate),
            message: message.into(),
            counts_for_help,
        }
    }

    /// Wraps a host-defined matcher under `name`.
    pub fn custom(name: impl Into<String>, matcher: impl ArgumentMatcher + 'static) -> Self {
        Matcher::Custom {
            name: name.into(),
            matcher: Box::new(matcher),
        }
    }

    /// Attempts to consume a prefix of the trimmed input.
    pub fn matches(&self, input: &str, ctx: &CommandContext) -> MatchResult {
        match self {
            Matcher::Root => Ok(MatchSuccess::empty()),
            Matcher::Literal(text) => match_literal(text, input),
            Matcher::Number { name } => match_number(name, input),
            Matcher::Str { greedy, .. } => match_string(*greedy, input),
            Matcher::Position { .. } => position::match_position(input, ctx),
            Matcher::Requires {
                predicate, message, ..
            } => {
                if predicate(ctx) {
                    Ok(MatchSuccess::empty())
                } else {
                    Err(MatchError::GateRefused(message.clone()))
                }
            }
            Matcher::Custom { matcher, .. } => matcher.matches(input, ctx),
        }
    }

    /// The placeholder this matcher contributes to usage strings. Gates and
    /// placeholders return an empty token and stay invisible.
    pub fn completion_token(&self) -> String {
        match self {
            Matcher::Root | Matcher::Requires { .. } => String::new(),
            Matcher::Literal(text) => text.clone(),
            Matcher::Number { name } => format!("<{name}:number>"),
            Matcher::Str { name, .. } => format!("<{name}:string>"),
            Matcher::Position { name } => format!("<{name}:position>"),
            Matcher::Custom { name, matcher } => matcher.completion_token(name),
        }
    }

    /// Returns `true` if the help reporter must prune the subtree under this
    /// matcher for the given context: a help-visible gate whose predicate is
    /// currently false.
    pub(crate) fn blocks_help(&self, ctx: &CommandContext) -> bool {
        match self {
            Matcher::Requires {
                predicate,
                counts_for_help,
                ..
            } => *counts_for_help && !predicate(ctx),
            _ => false,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Root => f.write_str("Root"),
            Matcher::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Matcher::Number { name } => f.debug_struct("Number").field("name", name).finish(),
            Matcher::Str { name, greedy } => f
                .debug_struct("Str")
                .field("name", name)
                .field("greedy", greedy)
                .finish(),
            Matcher::Position { name } => f.debug_struct("Position").field("name", name).finish(),
            Matcher::Requires {
                message,
                counts_for_help,
                ..
            } => f
                .debug_struct("Requires")
                .field("message", message)
                .field("counts_for_help", counts_for_help)
                .finish_non_exhaustive(),
            Matcher::Custom { name, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// Longest numeric token: optional minus, digits, then any number of
/// `.digits` groups (or a bare `.digits`).
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d+(?:\.\d+)*|\.\d+)").expect("number pattern is valid"));

fn match_literal(text: &str, input: &str) -> MatchResult {
    let followed_by_space = input.starts_with(text) && input[text.len()..].starts_with(' ');
    if input == text || followed_by_space {
        Ok(MatchSuccess {
            value: None,
            consumed: text.len(),
            push: false,
        })
    } else {
        Err(MatchError::ExpectedLiteral(text.to_string()))
    }
}

fn match_number(name: &str, input: &str) -> MatchResult {
    let token = NUMBER_TOKEN
        .find(input)
        .map(|m| m.as_str())
        .ok_or_else(|| MatchError::ExpectedNumber(name.to_string()))?;
    let value =
        parse_numeric_prefix(token).ok_or_else(|| MatchError::ExpectedNumber(name.to_string()))?;
    Ok(MatchSuccess::pushing(ArgValue::Number(value), token.len()))
}

/// Interprets the token as `f64` by longest valid prefix, so a token with
/// several dot groups (`1.2.3`) still yields a value (`1.2`).
fn parse_numeric_prefix(token: &str) -> Option<f64> {
    if let Ok(value) = token.parse::<f64>() {
        return Some(value);
    }
    let mut dots = token.match_indices('.');
    dots.next();
    let cut = dots.next().map(|(i, _)| i)?;
    token[..cut].parse().ok()
}

fn match_string(greedy: bool, input: &str) -> MatchResult {
    if greedy {
        return Ok(MatchSuccess::pushing(
            ArgValue::String(input.to_string()),
            input.len(),
        ));
    }
    if input.starts_with('"') {
        return match_quoted(input);
    }
    let end = input
        .find(char::is_whitespace)
        .unwrap_or(input.len());
    Ok(MatchSuccess::pushing(
        ArgValue::String(input[..end].to_string()),
        end,
    ))
}

/// Scans past the opening quote for the first `"` not immediately preceded
/// by a backslash. Escape sequences are preserved verbatim, not unescaped.
fn match_quoted(input: &str) -> MatchResult {
    let bytes = input.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i] == b'"' && bytes[i - 1] != b'\\' {
            // Both quotes are single bytes, so the slice bounds are valid.
            return Ok(MatchSuccess::pushing(
                ArgValue::String(input[1..i].to_string()),
                i + 1,
            ));
        }
    }
    Err(MatchError::UnterminatedQuote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CommandContext {
        CommandContext::default()
    }

    #[test]
    fn root_consumes_nothing() {
        let m = Matcher::Root;
        let s = m.matches("anything at all", &ctx()).unwrap();
        assert_eq!(s, MatchSuccess::empty());
        assert_eq!(m.completion_token(), "");
    }

    #[test]
    fn literal_exact_and_prefix() {
        let m = Matcher::literal("foo");
        assert_eq!(m.matches("foo", &ctx()).unwrap().consumed, 3);
        assert_eq!(m.matches("foo bar", &ctx()).unwrap().consumed, 3);
        assert!(!m.matches("foo", &ctx()).unwrap().push);
    }

    #[test]
    fn literal_rejects_longer_word() {
        let m = Matcher::literal("foo");
        assert_eq!(
            m.matches("foobar", &ctx()).unwrap_err(),
            MatchError::ExpectedLiteral("foo".into())
        );
        assert!(m.matches("fo", &ctx()).is_err());
    }

    #[test]
    fn number_basic() {
        let m = Matcher::number("count");
        let s = m.matches("42 rest", &ctx()).unwrap();
        assert_eq!(s.value, Some(ArgValue::Number(42.0)));
        assert_eq!(s.consumed, 2);
        assert!(s.push);
    }

    #[test]
    fn number_negative_decimal() {
        let s = Matcher::number("n").matches("-3.5", &ctx()).unwrap();
        assert_eq!(s.value, Some(ArgValue::Number(-3.5)));
        assert_eq!(s.consumed, 4);
    }

    #[test]
    fn number_rejects_text() {
        assert_eq!(
            Matcher::number("n").matches("abc", &ctx()).unwrap_err(),
            MatchError::ExpectedNumber("n".into())
        );
    }

    #[test]
    fn number_multiple_dot_groups() {
        // The whole token is claimed; the value is the longest parseable prefix.
        let s = Matcher::number("v").matches("1.2.3 x", &ctx()).unwrap();
        assert_eq!(s.consumed, 5);
        assert_eq!(s.value, Some(ArgValue::Number(1.2)));
    }

    #[test]
    fn number_bare_fraction() {
        let s = Matcher::number("v").matches(".5", &ctx()).unwrap();
        assert_eq!(s.value, Some(ArgValue::Number(0.5)));
    }

    #[test]
    fn string_non_greedy_takes_first_word() {
        let s = Matcher::string("s", false)
            .matches("hello world", &ctx())
            .unwrap();
        assert_eq!(s.value, Some(ArgValue::String("hello".into())));
        assert_eq!(s.consumed, 5);
    }

    #[test]
    fn string_greedy_takes_everything() {
        let s = Matcher::string("s", true)
            .matches("hello world  again", &ctx())
            .unwrap();
        assert_eq!(s.value, Some(ArgValue::String("hello world  again".into())));
        assert_eq!(s.consumed, 18);
    }

    #[test]
    fn string_quoted_segment() {
        let s = Matcher::string("s", false)
            .matches("\"a b\" c", &ctx())
            .unwrap();
        assert_eq!(s.value, Some(ArgValue::String("a b".into())));
        // Consumed span covers both quotes.
        assert_eq!(s.consumed, 5);
    }

    #[test]
    fn string_escaped_quote_preserved() {
        let s = Matcher::string("s", false)
            .matches(r#""say \"hi\"" tail"#, &ctx())
            .unwrap();
        assert_eq!(s.value, Some(ArgValue::String(r#"say \"hi\""#.into())));
    }

    #[test]
    fn string_unterminated_quote() {
        assert_eq!(
            Matcher::string("s", false)
                .matches("\"unterminated", &ctx())
                .unwrap_err(),
            MatchError::UnterminatedQuote
        );
    }

    #[test]
    fn requires_gate() {
        let m = Matcher::requires(|_| false, "admins only", true);
        assert_eq!(
            m.matches("whatever", &ctx()).unwrap_err(),
            MatchError::GateRefused("admins only".into())
        );
        assert!(m.blocks_help(&ctx()));

        let open = Matcher::requires(|_| true, "never shown", true);
        assert_eq!(open.matches("x", &ctx()).unwrap(), MatchSuccess::empty());
        assert!(!open.blocks_help(&ctx()));
    }

    #[test]
    fn hidden_gate_never_blocks_help() {
        let m = Matcher::requires(|_| false, "secret", false);
        assert!(!m.blocks_help(&ctx()));
        // It still gates dispatch.
        assert!(m.matches("x", &ctx()).is_err());
    }

    #[test]
    fn completion_tokens() {
        assert_eq!(Matcher::literal("tp").completion_token(), "tp");
        assert_eq!(Matcher::number("n").completion_token(), "<n:number>");
        assert_eq!(Matcher::string("s", false).completion_token(), "<s:string>");
        assert_eq!(
            Matcher::position("dest").completion_token(),
            "<dest:position>"
        );
        assert_eq!(
            Matcher::requires(|_| true, "", true).completion_token(),
            ""
        );
    }

    struct UpperWord;

    impl ArgumentMatcher for UpperWord {
        fn matches(&self, input: &str, _ctx: &CommandContext) -> MatchResult {
            let end = input.find(char::is_whitespace).unwrap_or(input.len());
            let word = &input[..end];
            if !word.is_empty() && word.chars().all(|c| c.is_ascii_uppercase()) {
                Ok(MatchSuccess::pushing(ArgValue::String(word.into()), end))
            } else {
                Err(MatchError::Custom("expected an uppercase word".into()))
            }
        }

        fn completion_token(&self, name: &str) -> String {
            format!("<{name}:upper>")
        }
    }

    #[test]
    fn custom_matcher_round_trip() {
        let m = Matcher::custom("shout", UpperWord);
        let s = m.matches("HEY there", &ctx()).unwrap();
        assert_eq!(s.value, Some(ArgValue::String("HEY".into())));
        assert_eq!(s.consumed, 3);
        assert!(m.matches("hey", &ctx()).is_err());
        assert_eq!(m.completion_token(), "<shout:upper>");
    }
}
