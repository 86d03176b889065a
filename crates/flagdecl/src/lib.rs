//! Declarative command-line flag parsing.
//!
//! The argument vector is tokenized once into `Flag` and `Command` tokens
//! ([`parse`]). Programs then declare the flags they expect on an
//! [`Arguments`] value, each with a convertor and an optional lazy default,
//! and query typed values by name.
//!
//! Help and user-facing validation failures are ordinary errors
//! ([`ArgumentsError::HelpRequested`], [`ConversionError::Expected`]); use
//! [`ArgumentsError::printable`] at the top level to tell them apart from
//! genuine defects.
//!
//! # Example
//!
//! ```
//! use flagdecl::{Arguments, ArgumentsError, FlagOptions, convert};
//!
//! fn run(argv: &[&str]) -> Result<(Option<String>, f64), ArgumentsError> {
//!     let args = Arguments::new(argv)
//!         .declare_help()?
//!         .declare(
//!             "name",
//!             FlagOptions::new(convert::string)
//!                 .short_name("n")
//!                 .description("Who to greet."),
//!         )?
//!         .declare(
//!             "ratio",
//!             FlagOptions::new(convert::strict_number).default(|| 0.5),
//!         )?
//!         .set_description("Greets someone.");
//!
//!     args.check_help()?;
//!     Ok((args.get("name")?, args.get("ratio")?))
//! }
//!
//! assert_eq!(run(&["-n", "Ada"]).unwrap(), (Some("Ada".to_string()), 0.5));
//!
//! let err = run(&["--help"]).unwrap_err();
//! let printable = err.printable().unwrap();
//! assert!(printable.is_success());
//! assert!(printable.message().contains("--name, -n"));
//! ```

pub mod arguments;
pub mod convert;
pub mod error;
mod help;
pub mod parse;

pub use arguments::{Arguments, FlagOptions, FlagValues, HELP_FLAG, HELP_SHORT_FLAG, help_options};
pub use error::{ArgumentsError, ConversionError, ExpectedFailure, Printable, Result};
pub use flagdecl_metadata::{ArgumentsSchema, FlagSchema};
pub use parse::{ParseConfig, RawValue, ShortClusters, Token, Tokens, parse, parse_with};
