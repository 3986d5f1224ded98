//! Utility functions for filename handling

/// Characters that are illegal in filenames on at least one common platform,
/// paired with their replacement
const FILENAME_REPLACEMENTS: &[(char, &str)] = &[
    ('\\', "+"),
    ('/', "+"),
    ('<', ""),
    ('>', ""),
    ('?', "!"),
    ('*', "-"),
    (':', "-"),
    ('|', ""),
    ('"', ""),
];

/// Make a release title safe to use as a filename
///
/// Path separators become `+`, `?` becomes `!`, `*` and `:` become `-`, and
/// `<`, `>`, `|` and `"` are removed. Surrounding whitespace is trimmed.
///
/// # Examples
///
/// ```
/// use usenet_blackhole::utils::clean_file_name;
///
/// assert_eq!(clean_file_name("Show: Part 1/2?"), "Show- Part 1+2!");
/// assert_eq!(clean_file_name("  \"Quoted\" <Title>  "), "Quoted Title");
/// ```
#[must_use]
pub fn clean_file_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.chars() {
        match FILENAME_REPLACEMENTS.iter().find(|(bad, _)| *bad == c) {
            Some((_, replacement)) => cleaned.push_str(replacement),
            None => cleaned.push(c),
        }
    }
    cleaned.trim().to_string()
}
