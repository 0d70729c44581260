use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s<>()\[\],;:]+@[^@\s<>()\[\],;:]+\.[^@\s<>()\[\],;:.]+$")
        .expect("a valid email pattern")
});

/// Splits a PascalCase identifier into space separated words, keeping
/// acronyms and runs of digits together.
///
/// ```
/// use cwfcore::text::pascal_case_to_title_case;
/// assert_eq!(pascal_case_to_title_case("PendingApproval"), "Pending Approval");
/// assert_eq!(pascal_case_to_title_case("HTMLEditor"), "HTML Editor");
/// assert_eq!(pascal_case_to_title_case("Step2Review"), "Step 2 Review");
/// ```
pub fn pascal_case_to_title_case(s: &str) -> String {
    let chars = s.trim().chars().collect::<Vec<_>>();
    let mut result = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = if prev.is_whitespace() || c.is_whitespace() {
                false
            } else if c.is_ascii_digit() {
                !prev.is_ascii_digit()
            } else if c.is_uppercase() {
                prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
            } else {
                prev.is_ascii_digit()
            };
            if boundary {
                result.push(' ');
            }
        }
        result.push(c);
    }
    result
}

pub fn is_valid_email_address(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}
