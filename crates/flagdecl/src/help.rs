//! Plain-text help layout.

const INDENT: &str = "  ";

/// One declaration as the help listing sees it.
#[derive(Debug, Clone)]
pub(crate) struct HelpEntry<'a> {
    pub long: &'a str,
    pub short: Option<char>,
    pub description: &'a [String],
    /// Already formatted default value, if the flag has one.
    pub default: Option<String>,
}

fn tab(n: usize) -> String {
    INDENT.repeat(n.max(1))
}

fn format_names(entry: &HelpEntry<'_>) -> String {
    let mut out = format!("{}--{}", tab(1), entry.long);
    if let Some(short) = entry.short {
        out.push_str(&format!(", -{short}"));
    }
    out
}

fn format_entry(entry: &HelpEntry<'_>) -> String {
    let mut lines = vec![format_names(entry)];

    for line in entry.description {
        lines.push(format!("{}{}", tab(2), line));
    }

    if let Some(default) = &entry.default {
        // Multi-line values continue two levels deeper than the label.
        let continuation = format!("\n{}", tab(4));
        let value = default.lines().collect::<Vec<_>>().join(&continuation);
        lines.push(format!("{}Default: {}", tab(2), value));
    }

    lines.join("\n")
}

/// Render the banner and one block per entry, blocks separated by a blank line.
pub(crate) fn render(description: Option<&str>, entries: &[HelpEntry<'_>]) -> String {
    let listing = entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n");

    [
        format!("\n{}", description.unwrap_or_default()),
        format!("\n{listing}"),
    ]
    .into_iter()
    .filter(|part| !part.trim().is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}
