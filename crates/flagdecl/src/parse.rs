//! Tokenizer for raw argument vectors.
//!
//! The tokenizer knows nothing about declarations: it classifies every raw
//! string as a flag or a bare command and guesses value attachment from the
//! shape of the input alone.

use std::fmt;
use std::ops::Deref;

/// Value carried by a flag token.
///
/// A flag written without `=value` starts out as `Bool(true)`. That placeholder
/// may later be replaced by the following bare argument (`--name value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Bool(bool),
    Text(String),
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    fn is_placeholder(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One classified argument.
///
/// `order` is the index of the raw string the token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Command {
        name: String,
        order: usize,
    },
    Flag {
        name: String,
        value: RawValue,
        order: usize,
        short: bool,
    },
}

impl Token {
    pub fn name(&self) -> &str {
        match self {
            Self::Command { name, .. } | Self::Flag { name, .. } => name.as_str(),
        }
    }

    pub fn order(&self) -> usize {
        match self {
            Self::Command { order, .. } | Self::Flag { order, .. } => *order,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag { .. })
    }
}

/// How a short argument with several characters (`-abc`) is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortClusters {
    /// `-abc` is one short flag named `abc`.
    #[default]
    Literal,
    /// `-abc` is three short flags `a`, `b` and `c` sharing one `order`.
    Expand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    pub short_clusters: ShortClusters,
    /// Whether a bare argument following `-x` becomes its value.
    /// Long flags always accept a following value.
    pub short_values: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            short_clusters: ShortClusters::Literal,
            short_values: true,
        }
    }
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_clusters(mut self, clusters: ShortClusters) -> Self {
        self.short_clusters = clusters;
        self
    }

    pub fn short_values(mut self, enabled: bool) -> Self {
        self.short_values = enabled;
        self
    }
}

/// Immutable, order-sorted token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<Token>);

impl Tokens {
    /// Bare positional arguments, in order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|t| match t {
            Token::Command { name, .. } => Some(name.as_str()),
            Token::Flag { .. } => None,
        })
    }

    /// Flag tokens as `(name, value, short)`, in order.
    pub fn flags(&self) -> impl Iterator<Item = (&str, &RawValue, bool)> {
        self.0.iter().filter_map(|t| match t {
            Token::Flag {
                name, value, short, ..
            } => Some((name.as_str(), value, *short)),
            Token::Command { .. } => None,
        })
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.0
    }
}

impl Deref for Tokens {
    type Target = [Token];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug)]
struct PendingFlag {
    name: String,
    value: RawValue,
    order: usize,
    short: bool,
}

impl PendingFlag {
    fn accepts_value(&self, config: &ParseConfig) -> bool {
        self.value.is_placeholder() && (!self.short || config.short_values)
    }

    fn into_token(self) -> Token {
        Token::Flag {
            name: self.name,
            value: self.value,
            order: self.order,
            short: self.short,
        }
    }
}

enum Kind<'a> {
    Long(&'a str),
    Short(&'a str),
    Bare,
}

fn classify(raw: &str) -> Kind<'_> {
    if let Some(rest) = raw.strip_prefix("--") {
        Kind::Long(rest)
    } else if raw == "-" {
        // Conventionally stdin; not a flag.
        Kind::Bare
    } else if let Some(rest) = raw.strip_prefix('-') {
        Kind::Short(rest)
    } else {
        Kind::Bare
    }
}

fn split_value(body: &str) -> (&str, RawValue) {
    match body.split_once('=') {
        Some((name, value)) => (name, RawValue::Text(value.to_string())),
        None => (body, RawValue::Bool(true)),
    }
}

/// Tokenize `args` with the default [`ParseConfig`].
///
/// ```
/// use flagdecl::parse::{parse, RawValue, Token};
///
/// let tokens = parse(&["--out", "a.txt", "build"]);
/// assert_eq!(
///     tokens.to_vec(),
///     vec![
///         Token::Flag { name: "out".into(), value: RawValue::from("a.txt"), order: 0, short: false },
///         Token::Command { name: "build".into(), order: 2 },
///     ]
/// );
/// ```
pub fn parse<S: AsRef<str>>(args: &[S]) -> Tokens {
    parse_with(args, &ParseConfig::default())
}

/// Tokenize `args`.
///
/// Never fails: anything that is not a flag becomes a command (or the value of
/// the preceding flag).
pub fn parse_with<S: AsRef<str>>(args: &[S], config: &ParseConfig) -> Tokens {
    let mut commands: Vec<Token> = Vec::new();
    let mut flags: Vec<PendingFlag> = Vec::new();

    for (order, raw) in args.iter().enumerate() {
        let raw = raw.as_ref();

        match classify(raw) {
            Kind::Bare => match flags.last_mut() {
                Some(last) if last.accepts_value(config) => {
                    tracing::trace!(flag = %last.name, order, "attached value to flag");
                    last.value = RawValue::Text(raw.to_string());
                }
                _ => commands.push(Token::Command {
                    name: raw.to_string(),
                    order,
                }),
            },
            Kind::Long("") => {
                // A lone `--` carries no name and is dropped.
                tracing::trace!(order, "ignored bare `--`");
            }
            Kind::Long(body) => {
                let (name, value) = split_value(body);
                flags.push(PendingFlag {
                    name: name.to_string(),
                    value,
                    order,
                    short: false,
                });
            }
            Kind::Short(body) => {
                let (name, value) = split_value(body);
                let expand = config.short_clusters == ShortClusters::Expand
                    && name.chars().nth(1).is_some();

                if expand {
                    let mut chars = name.chars().peekable();
                    while let Some(c) = chars.next() {
                        let value = if chars.peek().is_none() {
                            value.clone()
                        } else {
                            RawValue::Bool(true)
                        };
                        flags.push(PendingFlag {
                            name: c.to_string(),
                            value,
                            order,
                            short: true,
                        });
                    }
                } else {
                    flags.push(PendingFlag {
                        name: name.to_string(),
                        value,
                        order,
                        short: true,
                    });
                }
            }
        }
    }

    let mut tokens = commands;
    tokens.extend(flags.into_iter().map(PendingFlag::into_token));
    // Stable, so expanded clusters keep their character order.
    tokens.sort_by_key(Token::order);

    tracing::debug!(args = args.len(), tokens = tokens.len(), "tokenized arguments");
    Tokens(tokens)
}
