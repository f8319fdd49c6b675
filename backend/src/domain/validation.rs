//! Field rules shared by entity validation.
//!
//! Rules return the first failure as an `invalid` [`Error`]; entities chain
//! them in field order so callers always see the earliest broken field.

use super::Error;

/// Reject an empty string with `message`.
#[track_caller]
pub(crate) fn required(value: &str, message: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid(message));
    }
    Ok(())
}

/// Reject a value that is not a syntactically valid mailbox.
#[track_caller]
pub(crate) fn email(value: &str, message: &str) -> Result<(), Error> {
    if !is_valid_mailbox(value) {
        return Err(Error::invalid(message));
    }
    Ok(())
}

/// Whether `input` parses as an RFC 5322 mailbox.
///
/// Accepts a bare `local@domain` or `Display Name <local@domain>`. The local
/// part is a dot-atom or a quoted string; the domain is a dot-atom or a
/// bracketed literal. Non-ASCII characters are allowed in atoms.
///
/// # Examples
/// ```
/// use registry::domain::is_valid_mailbox;
///
/// assert!(is_valid_mailbox("mario.rossi@example.it"));
/// assert!(is_valid_mailbox("Mario Rossi <mario@example.it>"));
/// assert!(!is_valid_mailbox("mario.rossi"));
/// ```
pub fn is_valid_mailbox(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }
    if input.ends_with('>') {
        return angle_addr(input).is_some_and(is_addr_spec);
    }
    is_addr_spec(input)
}

/// Address inside `name <addr>`. Unquoted display-name characters must be
/// atoms, dots, or whitespace.
fn angle_addr(input: &str) -> Option<&str> {
    let inner = input.strip_suffix('>')?;
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, ch) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '<' if !in_quotes => {
                return Some(inner[idx + 1..].trim());
            }
            _ if in_quotes => {}
            _ if is_atext(ch) || ch == '.' || ch.is_whitespace() => {}
            _ => return None,
        }
    }
    None
}

fn is_addr_spec(addr: &str) -> bool {
    let Some((local, domain)) = split_addr_spec(addr) else {
        return false;
    };
    let local_ok = if local.starts_with('"') {
        is_quoted_string(local)
    } else {
        is_dot_atom(local)
    };
    local_ok && is_domain(domain)
}

fn split_addr_spec(addr: &str) -> Option<(&str, &str)> {
    if !addr.starts_with('"') {
        return addr.split_once('@');
    }
    let mut escaped = false;
    for (idx, ch) in addr.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => {
                let rest = addr[idx + 1..].strip_prefix('@')?;
                return Some((&addr[..=idx], rest));
            }
            _ => {}
        }
    }
    None
}

fn is_quoted_string(value: &str) -> bool {
    let Some(body) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };
    if body.is_empty() {
        return false;
    }
    let mut escaped = false;
    for ch in body.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => return false,
            c if c.is_control() && c != '\t' => return false,
            _ => {}
        }
    }
    !escaped
}

fn is_domain(domain: &str) -> bool {
    match domain
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(literal) => literal.chars().all(is_dtext),
        None => is_dot_atom(domain),
    }
}

fn is_dot_atom(value: &str) -> bool {
    !value.is_empty()
        && value
            .split('.')
            .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_atext(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(ch) || !ch.is_ascii()
}

fn is_dtext(ch: char) -> bool {
    matches!(ch, '!'..='Z' | '^'..='~') || !ch.is_ascii()
}
