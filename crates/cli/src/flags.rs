use flagdecl::{Arguments, ConversionError, FlagOptions, RawValue, Result, convert};

pub const MIN_SLEEP_MS: u64 = 200;
const DEFAULT_SLEEP_MS: u64 = 5000;

/// Sleep duration in milliseconds; rejects values the user can fix.
fn sleep_convertor(raw: Option<&RawValue>) -> Result<u64, ConversionError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SLEEP_MS);
    };
    let ms = raw
        .as_text()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            ConversionError::expected(
                "The sleep time must be a valid number. \"--sleep=<number>\"",
            )
        })?;

    if ms <= MIN_SLEEP_MS {
        return Err(ConversionError::expected(format!(
            "The sleep time must be greater than {MIN_SLEEP_MS} ms. \"--sleep=<number>\""
        )));
    }
    Ok(ms)
}

fn tag_convertor(raw: Option<&RawValue>) -> Result<Option<String>, ConversionError> {
    Ok(raw.map(|v| format!("<< {v} >>")))
}

pub fn declare(args: Arguments) -> Result<Arguments> {
    let args = args
        .declare_help()?
        .declare(
            "my-string",
            FlagOptions::new(convert::string)
                .short_name("s")
                .description("This is a string flag."),
        )?
        .declare(
            "my-number",
            FlagOptions::new(convert::strict_number)
                .short_name("n")
                .description("This is a number flag.")
                .default(|| 0.0),
        )?
        .declare(
            "my-boolean",
            FlagOptions::new(convert::boolean)
                .short_name("b")
                .description("This is a boolean flag."),
        )?
        .declare(
            "my-custom",
            FlagOptions::new(tag_convertor)
                .short_name("c")
                .description("This is a custom flag.\nThe value is wrapped in markers."),
        )?
        .declare(
            "sleep",
            FlagOptions::new(sleep_convertor)
                .description("Sleep duration between processes in milliseconds.")
                .default(|| DEFAULT_SLEEP_MS),
        )?
        .declare(
            "print-schema",
            FlagOptions::new(convert::strict_boolean)
                .description("Print the declared flags as JSON and exit."),
        )?
        .declare(
            "my-deprecated",
            FlagOptions::new(convert::string).exclude_from_help(),
        )?
        .set_description("This is a demo of the flagdecl library.");
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_rejects_short_and_non_numeric_values() {
        let too_short = sleep_convertor(Some(&RawValue::from("100"))).unwrap_err();
        assert!(too_short.to_string().contains("greater than 200 ms"));

        let at_minimum = sleep_convertor(Some(&RawValue::from("200"))).unwrap_err();
        assert!(matches!(at_minimum, ConversionError::Expected(_)));
        assert_eq!(sleep_convertor(Some(&RawValue::from("201"))).unwrap(), 201);

        let garbage = sleep_convertor(Some(&RawValue::from("soon"))).unwrap_err();
        assert!(matches!(garbage, ConversionError::Expected(_)));

        let missing_value = sleep_convertor(Some(&RawValue::Bool(true))).unwrap_err();
        assert!(matches!(missing_value, ConversionError::Expected(_)));

        assert_eq!(sleep_convertor(Some(&RawValue::from("250"))).unwrap(), 250);
        assert_eq!(sleep_convertor(None).unwrap(), DEFAULT_SLEEP_MS);
    }

    #[test]
    fn declarations_are_consistent() {
        let args = declare(Arguments::new(["--my-custom", "x", "--sleep", "300"])).unwrap();
        assert_eq!(args.get::<u64>("sleep").unwrap(), 300);
        assert_eq!(
            args.get::<Option<String>>("my-custom").unwrap().as_deref(),
            Some("<< x >>")
        );
        assert_eq!(args.schema().visible_flags().count(), 6);
    }
}
