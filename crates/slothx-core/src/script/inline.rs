//! Inline dependency block parser.
//!
//! Recognizes a declarative block in the script's leading comment lines:
//!
//! ```text
//! # /// script
//! # dependencies = [
//! #   "requests",
//! #   "rich>=13",
//! # ]
//! # ///
//! ```
//!
//! or the single-line form `# dependencies = ["requests", "rich>=13"]` after
//! the `# /// script` signature.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::SlothxError;

const SIGNATURE: &str = "/// script";
const CLOSING: &str = "]";

fn single_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^dependencies\s*=\s*\[(.*)\]$").expect("single-line dependencies regex is valid")
    })
}

fn opening_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^dependencies\s*=\s*\[$").expect("opening regex is valid"))
}

fn literal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("string literal regex is valid"))
}

/// Parse the inline dependency list.
///
/// - `Ok(None)`: no block (no signature, or no `dependencies = [...]`)
/// - `Ok(Some(vec![]))`: block present and empty
/// - `Ok(Some(deps))`: declared dependencies in order of appearance
pub fn parse(source: &str) -> Result<Option<Vec<String>>, SlothxError> {
    let block = leading_comment_block(source);

    let mut signed = false;
    let mut collected: Vec<&str> = Vec::new();
    let mut in_multiline = false;
    // A literal may continue onto the next line of a multi-line list.
    let mut quoted = false;
    let mut found = false;

    for body in &block {
        if in_multiline {
            let line = strip_trailing_comment(body, &mut quoted).trim();
            if !quoted && line == CLOSING {
                in_multiline = false;
                found = true;
                break;
            }
            collected.push(line);
            continue;
        }
        let line = strip_trailing_comment(body, &mut false).trim();
        if !signed {
            signed = line == SIGNATURE;
            continue;
        }
        if let Some(caps) = single_line_re().captures(line) {
            collected.push(caps.get(1).map_or("", |m| m.as_str()));
            found = true;
            break;
        }
        if opening_re().is_match(line) {
            in_multiline = true;
        }
    }

    if in_multiline {
        return Err(SlothxError::InvalidDependenciesSection { line: block.len() });
    }
    if !found {
        return Ok(None);
    }

    let joined: String = collected.concat();
    let deps = literal_re()
        .captures_iter(&joined)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();
    Ok(Some(deps))
}

/// Bodies of the leading `#` lines, marker removed. Stops at the first
/// non-comment line; trailing lines with nothing but a comment are dropped.
fn leading_comment_block(source: &str) -> Vec<&str> {
    let mut block: Vec<&str> = source
        .lines()
        .map_while(|raw| raw.trim_start().strip_prefix('#'))
        .collect();
    while block
        .last()
        .is_some_and(|body| strip_trailing_comment(body, &mut false).trim().is_empty())
    {
        block.pop();
    }
    block
}

// A `#` inside a double-quoted literal is part of the literal (e.g. URL
// fragments). `quoted` is the literal state at the start of `line` and is
// left at the state after it.
fn strip_trailing_comment<'a>(line: &'a str, quoted: &mut bool) -> &'a str {
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => *quoted = !*quoted,
            '#' if !*quoted => return &line[..i],
            _ => {}
        }
    }
    line
}
