//! Student identifier (U-number) detection

/// A token recognised as a student identifier, with its position in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierToken<'a> {
    pub text: &'a str,
    pub index: usize,
}

/// `<prefix><ascii digits>+`, e.g. `U91687641`
pub fn is_identifier(token: &str, prefix: char) -> bool {
    match token.strip_prefix(prefix) {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// First identifier-shaped token, scanning left to right
pub fn locate<'a>(tokens: &[&'a str], prefix: char) -> Option<IdentifierToken<'a>> {
    tokens
        .iter()
        .position(|token| is_identifier(token, prefix))
        .map(|index| IdentifierToken { text: tokens[index], index })
}
