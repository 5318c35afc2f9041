//! XML text utilities.
//!
//! Provides the two halves of title sanitisation:
//! - `unescape()` - decode HTML entities left over from editor input
//! - `escape()` - XML entity escaping for text nodes
//!
//! Order matters when both are applied: decode first, then escape,
//! otherwise pre-encoded entities get double-encoded (`&amp;amp;`).

use std::borrow::Cow;

// =============================================================================
// XML Escaping
// =============================================================================

/// Characters that require XML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the XML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    }
}

/// Escape XML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("Café & Bar"), "Café &amp; Bar");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Entity Decoding
// =============================================================================

/// Decode a named HTML entity (without `&`/`;` delimiters).
///
/// Covers the XML predefined set plus the Latin-1 and punctuation names
/// that commonly survive in editorial titles.
fn decode_named(name: &str) -> Option<char> {
    let c = match name {
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "aacute" => 'á',
        "eacute" => 'é',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "agrave" => 'à',
        "egrave" => 'è',
        "atilde" => 'ã',
        "otilde" => 'õ',
        "ntilde" => 'ñ',
        "acirc" => 'â',
        "ecirc" => 'ê',
        "ocirc" => 'ô',
        "auml" => 'ä',
        "euml" => 'ë',
        "ouml" => 'ö',
        "uuml" => 'ü',
        "ccedil" => 'ç',
        "Aacute" => 'Á',
        "Eacute" => 'É',
        "Ccedil" => 'Ç',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(c)
}

/// Decode HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
/// Unknown entities are passed through untouched.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }

        // Collect entity name up to `;`
        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next == '&' || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated {
            // Bare ampersand or unterminated entity, keep as-is
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        if let Some(rest) = entity.strip_prefix('#') {
            // Numeric reference: decimal or hex
            let code = if let Some(hex) = rest.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                rest.parse().ok()
            };
            match code.and_then(char::from_u32) {
                Some(c) => result.push(c),
                None => {
                    result.push('&');
                    result.push_str(&entity);
                    result.push(';');
                }
            }
        } else if let Some(c) = decode_named(&entity) {
            result.push(c);
        } else {
            result.push('&');
            result.push_str(&entity);
            result.push(';');
        }
    }

    Cow::Owned(result)
}
