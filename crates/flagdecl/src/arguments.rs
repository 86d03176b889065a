//! Flag declarations and value resolution.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use flagdecl_metadata::{ArgumentsSchema, FlagSchema};
use indexmap::IndexMap;

use crate::convert;
use crate::error::{ArgumentsError, ConversionError, Result};
use crate::help::{self, HelpEntry};
use crate::parse::{self, ParseConfig, RawValue, Token, Tokens};

pub const HELP_FLAG: &str = "help";
pub const HELP_SHORT_FLAG: &str = "h";

type Convertor<V> = Box<dyn Fn(Option<&RawValue>) -> Result<V, ConversionError>>;
type DefaultSupplier<V> = Box<dyn Fn() -> V>;

/// Options for one flag, passed to [`Arguments::declare`].
pub struct FlagOptions<V> {
    convertor: Convertor<V>,
    short_name: Option<String>,
    description: Option<String>,
    default: Option<DefaultSupplier<V>>,
    exclude_from_help: bool,
}

impl<V: fmt::Debug + 'static> FlagOptions<V> {
    pub fn new<F>(convertor: F) -> Self
    where
        F: Fn(Option<&RawValue>) -> Result<V, ConversionError> + 'static,
    {
        Self {
            convertor: Box::new(convertor),
            short_name: None,
            description: None,
            default: None,
            exclude_from_help: false,
        }
    }

    /// Only the first character is used.
    pub fn short_name(mut self, name: impl Into<String>) -> Self {
        self.short_name = Some(name.into());
        self
    }

    /// Lines are split on `\n`.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value used when the flag is absent from argv.
    ///
    /// The supplier runs only when needed (and when rendering help), and its
    /// result is returned as-is, without going through the convertor.
    pub fn default<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> V + 'static,
    {
        self.default = Some(Box::new(supplier));
        self
    }

    pub fn exclude_from_help(mut self) -> Self {
        self.exclude_from_help = true;
        self
    }
}

impl<V> fmt::Debug for FlagOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagOptions")
            .field("short_name", &self.short_name)
            .field("description", &self.description)
            .field("has_default", &self.default.is_some())
            .field("exclude_from_help", &self.exclude_from_help)
            .finish_non_exhaustive()
    }
}

/// Options for the canonical `--help`/`-h` flag.
pub fn help_options() -> FlagOptions<bool> {
    FlagOptions::new(convert::strict_boolean)
        .short_name(HELP_SHORT_FLAG)
        .description("Show this help message.")
        .exclude_from_help()
}

/// Resolved value with its concrete type erased.
trait FlagValue: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + fmt::Debug> FlagValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

type ErasedConvertor =
    Box<dyn Fn(Option<&RawValue>) -> Result<Box<dyn FlagValue>, ConversionError>>;
type ErasedDefault = Box<dyn Fn() -> Box<dyn FlagValue>>;

struct FlagDeclaration {
    long_name: String,
    short_name: Option<char>,
    description: Vec<String>,
    default: Option<ErasedDefault>,
    convertor: ErasedConvertor,
    include_in_help: bool,
    type_id: TypeId,
    type_name: &'static str,
}

impl FlagDeclaration {
    fn new<V: fmt::Debug + 'static>(long_name: String, options: FlagOptions<V>) -> Self {
        let FlagOptions {
            convertor,
            short_name,
            description,
            default,
            exclude_from_help,
        } = options;

        let description = description
            .map(|d| d.trim().split('\n').map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            long_name,
            short_name: short_name.as_deref().and_then(normalize_short_name),
            description,
            default: default.map(|supplier| {
                Box::new(move || Box::new(supplier()) as Box<dyn FlagValue>) as ErasedDefault
            }),
            convertor: Box::new(move |raw: Option<&RawValue>| {
                convertor(raw).map(|v| Box::new(v) as Box<dyn FlagValue>)
            }),
            include_in_help: !exclude_from_help,
            type_id: TypeId::of::<V>(),
            type_name: type_name::<V>(),
        }
    }

    fn schema(&self) -> FlagSchema {
        FlagSchema {
            long: self.long_name.clone(),
            short: self.short_name,
            description: self.description.clone(),
            has_default: self.default.is_some(),
            hidden: !self.include_in_help,
            value_type: self.type_name.to_string(),
        }
    }
}

impl fmt::Debug for FlagDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagDeclaration")
            .field("long_name", &self.long_name)
            .field("short_name", &self.short_name)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_short_name(name: &str) -> Option<char> {
    normalize_name(name).chars().next()
}

/// Declared flags plus the tokens of one argument vector.
///
/// ```
/// use flagdecl::{Arguments, FlagOptions, convert};
///
/// let args = Arguments::new(["-c", "5"])
///     .declare(
///         "count",
///         FlagOptions::new(convert::strict_parsed::<i64>())
///             .short_name("c")
///             .default(|| 10),
///     )
///     .unwrap();
/// assert_eq!(args.get::<i64>("count").unwrap(), 5);
/// ```
#[derive(Debug)]
pub struct Arguments {
    tokens: Tokens,
    declarations: IndexMap<String, FlagDeclaration>,
    description: Option<String>,
}

impl Arguments {
    /// Tokenize `argv` (without the program name) with the default config.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(argv, &ParseConfig::default())
    }

    pub fn with_config<I, S>(argv: I, config: &ParseConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let argv: Vec<String> = argv.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self {
            tokens: parse::parse_with(&argv, config),
            declarations: IndexMap::new(),
            description: None,
        }
    }

    /// Snapshot the process arguments, skipping the program name.
    pub fn from_env() -> Self {
        Self::new(std::env::args_os().skip(1).map(|a| a.to_string_lossy().into_owned()))
    }

    pub fn declare<V: fmt::Debug + 'static>(
        mut self,
        name: &str,
        options: FlagOptions<V>,
    ) -> Result<Self> {
        let long_name = normalize_name(name);
        if long_name.is_empty() {
            return Err(ArgumentsError::InvalidName {
                name: name.to_string(),
            });
        }
        if self.declarations.contains_key(&long_name) {
            return Err(ArgumentsError::DeclarationConflict {
                name: long_name.clone(),
                existing: long_name,
            });
        }

        let declaration = FlagDeclaration::new(long_name, options);
        if let Some(short) = declaration.short_name
            && let Some(existing) = self
                .declarations
                .values()
                .find(|d| d.short_name == Some(short))
        {
            return Err(ArgumentsError::DeclarationConflict {
                name: format!("-{short}"),
                existing: existing.long_name.clone(),
            });
        }

        tracing::debug!(
            flag = %declaration.long_name,
            short = ?declaration.short_name,
            value_type = declaration.type_name,
            "declared flag"
        );
        self.declarations
            .insert(declaration.long_name.clone(), declaration);
        Ok(self)
    }

    /// Declare `--help`/`-h` with [`help_options`].
    pub fn declare_help(self) -> Result<Self> {
        self.declare(HELP_FLAG, help_options())
    }

    pub fn set_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Some(description.as_ref().trim().to_string());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// Bare positional arguments that were not taken as flag values.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.tokens.commands()
    }

    fn declaration(&self, name: &str) -> Result<&FlagDeclaration> {
        let normalized = normalize_name(name);
        self.declarations
            .get(&normalized)
            .ok_or(ArgumentsError::UndeclaredArgument { name: normalized })
    }

    /// First flag token called `name` written in the given form.
    fn raw_flag(&self, name: &str, short: bool) -> Option<&RawValue> {
        self.tokens.iter().find_map(|token| match token {
            Token::Flag {
                name: raw_name,
                value,
                short: raw_short,
                ..
            } if *raw_short == short && normalize_name(raw_name) == name => Some(value),
            _ => None,
        })
    }

    fn resolve(&self, decl: &FlagDeclaration) -> Result<Box<dyn FlagValue>> {
        let raw = self.raw_flag(&decl.long_name, false).or_else(|| {
            decl.short_name
                .and_then(|short| self.raw_flag(&short.to_string(), true))
        });

        let value = match (raw, &decl.default) {
            (Some(raw), _) => {
                tracing::trace!(flag = %decl.long_name, %raw, "resolving from argv");
                (decl.convertor)(Some(raw))?
            }
            (None, Some(default)) => {
                tracing::trace!(flag = %decl.long_name, "resolving from default");
                default()
            }
            (None, None) => {
                tracing::trace!(flag = %decl.long_name, "resolving absent flag");
                (decl.convertor)(None)?
            }
        };
        Ok(value)
    }

    fn check_type<V: Any>(decl: &FlagDeclaration) -> Result<()> {
        if decl.type_id == TypeId::of::<V>() {
            Ok(())
        } else {
            Err(ArgumentsError::TypeMismatch {
                name: decl.long_name.clone(),
                declared: decl.type_name,
                requested: type_name::<V>(),
            })
        }
    }

    /// Resolve one flag.
    ///
    /// Precedence: argv (through the convertor), then the default supplier,
    /// then the convertor applied to absence.
    pub fn get<V: Any>(&self, name: &str) -> Result<V> {
        let decl = self.declaration(name)?;
        Self::check_type::<V>(decl)?;

        self.resolve(decl)?
            .into_any()
            .downcast::<V>()
            .map(|value| *value)
            .map_err(|_| ArgumentsError::TypeMismatch {
                name: decl.long_name.clone(),
                declared: decl.type_name,
                requested: type_name::<V>(),
            })
    }

    /// Resolve every declared flag, in declaration order.
    pub fn get_flags(&self) -> Result<FlagValues> {
        let values = self
            .declarations
            .values()
            .map(|decl| Ok((decl.long_name.clone(), self.resolve(decl)?)))
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(FlagValues { values })
    }

    /// `true` when `--help`/`-h` was given. The help flag must be declared.
    pub fn is_help_requested(&self) -> Result<bool> {
        self.get::<bool>(HELP_FLAG)
    }

    pub fn render_help(&self) -> String {
        let entries: Vec<HelpEntry<'_>> = self
            .declarations
            .values()
            .filter(|decl| decl.include_in_help)
            .map(|decl| HelpEntry {
                long: &decl.long_name,
                short: decl.short_name,
                description: &decl.description,
                default: decl
                    .default
                    .as_ref()
                    .map(|supplier| format!("{:?}", supplier())),
            })
            .collect();

        help::render(self.description.as_deref(), &entries)
    }

    /// The stop signal carrying the rendered help.
    pub fn trigger_help(&self) -> ArgumentsError {
        ArgumentsError::HelpRequested(self.render_help())
    }

    /// Fail with [`ArgumentsError::HelpRequested`] if help was requested.
    pub fn check_help(&self) -> Result<()> {
        if self.is_help_requested()? {
            return Err(self.trigger_help());
        }
        Ok(())
    }

    pub fn schema(&self) -> ArgumentsSchema {
        ArgumentsSchema::new(
            self.description.clone(),
            self.declarations.values().map(FlagDeclaration::schema).collect(),
        )
    }
}

/// Resolved values of every declared flag.
pub struct FlagValues {
    values: IndexMap<String, Box<dyn FlagValue>>,
}

impl FlagValues {
    /// `None` if `name` is unknown or holds another type.
    pub fn get<V: Any>(&self, name: &str) -> Option<&V> {
        let value: &dyn FlagValue = &**self.values.get(&normalize_name(name))?;
        value.as_any().downcast_ref::<V>()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(&normalize_name(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for FlagValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(k, v)| (k, &**v)))
            .finish()
    }
}
