// src/matrix/tokens.rs - Free-text option value parsing

/// Parses comma-separated option value text ("red, blue, green") into an
/// ordered list of trimmed tokens. Whitespace-only tokens are dropped
/// silently; case-insensitive duplicates are removed keeping the first
/// occurrence in its original casing.
pub fn parse_tokens(raw: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut tokens = Vec::new();
    for piece in raw.split(',') {
        let token = piece.trim();
        if token.is_empty() {
            continue;
        }
        let folded = token.to_lowercase();
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        tokens.push(token.to_string());
    }
    tokens
}

/// Returns the tokens that appear more than once in the raw input, compared
/// case-insensitively after trimming. A non-empty result is an input error
/// the merchant must resolve before the matrix may be applied; the parser
/// never silently fixes it up.
pub fn duplicate_tokens(raw: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut duplicates = Vec::new();
    for piece in raw.split(',') {
        let token = piece.trim();
        if token.is_empty() {
            continue;
        }
        let folded = token.to_lowercase();
        if seen.contains(&folded) {
            if !duplicates.contains(&token.to_string()) {
                duplicates.push(token.to_string());
            }
        } else {
            seen.push(folded);
        }
    }
    duplicates
}
