//! Plain-text body templates.
//!
//! Placeholders are written `{name}` and replaced with the value supplied for
//! `name`. Names are taken verbatim, so `{ name }` looks up `" name "`.
//! Literal braces are written `{{` and `}}`.

use std::collections::HashMap;
use std::path::Path;

use super::{ComposeError, ComposeResult};

/// Placeholder values, keyed by placeholder name.
pub type TemplateArgs = HashMap<String, String>;

/// Reads a template file as text.
///
/// # Errors
///
/// Returns [`ComposeError::TemplateRead`] if the file cannot be read.
pub fn load_template(path: &Path) -> ComposeResult<String> {
    std::fs::read_to_string(path).map_err(|source| ComposeError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Substitutes `args` into `text`.
///
/// # Errors
///
/// Returns [`ComposeError::TemplateRender`] if a placeholder has no value,
/// is empty or unterminated, or a `}` is unmatched.
pub fn render_template(text: &str, args: &TemplateArgs) -> ComposeResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => out.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => out.push('}'),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => {
                            return Err(render_error(format!(
                                "unterminated placeholder at byte {pos}"
                            )));
                        }
                        Some((_, ch)) => name.push(ch),
                    }
                }

                if name.is_empty() {
                    return Err(render_error(format!("empty placeholder at byte {pos}")));
                }
                let value = args
                    .get(&name)
                    .ok_or_else(|| render_error(format!("no value for placeholder {name:?}")))?;
                out.push_str(value);
            }
            '}' => {
                return Err(render_error(format!("unmatched '}}' at byte {pos}")));
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn render_error(reason: String) -> ComposeError {
    ComposeError::TemplateRender(reason)
}
