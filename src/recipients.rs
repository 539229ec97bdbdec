//! Recipient list parsing
//!
//! Recipient files are line-oriented, with each line possibly carrying
//! multiple comma-separated addresses. Parsing only trims and drops empty
//! fields; validation happens later, at submission time, so one malformed
//! entry is skipped with a warning instead of aborting the whole list.

/// Split raw input lines into ordered candidate address strings.
///
/// Fields are split on `,`, trimmed, and empty fields are dropped. Duplicates
/// are preserved and will each receive their own send attempt, and no case
/// normalization is applied.
pub fn parse_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect()
}
