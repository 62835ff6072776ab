/*!

Compiles signature strings like `StringSplit[string_String, seps_List]` into `Pattern`s.

The grammar is deliberately tiny: a head symbol, brackets, and a comma separated list of slots, where each slot is a
blank (`name_Type`, `name__Type`, `name___Type`, any part optional except the underscores) or a literal atom (a
symbol, an integer, or a double-quoted string). Compound literals are not supported. Anything else is a
`RegistryError::MalformedPattern`, which surfaces when the registry is built, never during dispatch.

*/

use lazy_static::lazy_static;
use regex::Regex;
use rug::Integer as BigInteger;
use smallvec::SmallVec;

use crate::{
  atom::{Atom, Symbol},
  interner::interned,
  registry::RegistryError,
};

use super::{Pattern, Slot};

lazy_static! {
  // No `\s` or `\w`: the regex crate is built without its Unicode class tables.
  static ref SIGNATURE: Regex = Regex::new(r"^[ \t]*([A-Za-z$][A-Za-z0-9$]*)\[(.*)\][ \t]*$").unwrap();
  static ref BLANK    : Regex = Regex::new(r"^([A-Za-z$][A-Za-z0-9$]*)?(_{1,3})([A-Za-z$][A-Za-z0-9$]*)?$").unwrap();
  static ref SYMBOL   : Regex = Regex::new(r"^[A-Za-z$][A-Za-z0-9$]*$").unwrap();
  static ref INTEGER  : Regex = Regex::new(r"^-?[0-9]+$").unwrap();
  static ref STRING   : Regex = Regex::new(r#"^"((?:[^"\\]|\\.)*)"$"#).unwrap();
}


impl Pattern {
  /// Compiles `signature` into a `Pattern`.
  pub fn compile(signature: &str) -> Result<Pattern, RegistryError> {
    let malformed = |reason: &str| RegistryError::MalformedPattern {
      signature: signature.to_string(),
      reason   : reason.to_string(),
    };

    let captures = SIGNATURE.captures(signature)
                            .ok_or_else(|| malformed("expected a signature of the form `Head[slots…]`"))?;
    let head = interned(&captures[1]);
    let body = captures[2].trim();

    let mut slots: SmallVec<[Slot; 4]> = SmallVec::new();
    if body.is_empty() {
      return Ok(Pattern { head, slots });
    }

    for text in split_slots(body).map_err(|reason| malformed(reason))? {
      slots.push(compile_slot(text.trim()).map_err(|reason| malformed(reason.as_str()))?);
    }

    Ok(Pattern { head, slots })
  }
}


/// Splits the text between the brackets on commas that are not inside a string literal.
fn split_slots(body: &str) -> Result<Vec<&str>, &'static str> {
  let mut pieces   = Vec::new();
  let mut start    = 0usize;
  let mut in_string = false;
  let mut escaped   = false;

  for (index, c) in body.char_indices() {
    if in_string {
      match c {
        _ if escaped => escaped = false,
        '\\'         => escaped = true,
        '"'          => in_string = false,
        _            => {}
      }
      continue;
    }
    match c {
      '"' => in_string = true,
      ',' => {
        pieces.push(&body[start..index]);
        start = index + 1;
      }
      '[' | ']' | '{' | '}' => return Err("compound literals are not supported in signatures"),
      _ => {}
    }
  }

  if in_string {
    return Err("unterminated string literal");
  }
  pieces.push(&body[start..]);
  Ok(pieces)
}


fn compile_slot(text: &str) -> Result<Slot, String> {
  if text.is_empty() {
    return Err("empty slot".to_string());
  }

  if let Some(captures) = BLANK.captures(text) {
    let name = captures.get(1).map(|m| interned(m.as_str()));
    let head = captures.get(3).map(|m| interned(m.as_str()));
    return Ok(
      match captures[2].len() {
        1 => Slot::Blank { name, head },
        2 => Slot::BlankSequence { name, head },
        _ => Slot::BlankNullSequence { name, head },
      }
    );
  }

  if SYMBOL.is_match(text) {
    return Ok(Slot::Literal(Symbol::from_str(text)));
  }

  if INTEGER.is_match(text) {
    return match text.parse::<BigInteger>() {
      Ok(value) => Ok(Slot::Literal(Atom::Integer(value))),
      Err(_)    => Err(format!("invalid integer literal `{}`", text)),
    };
  }

  if let Some(captures) = STRING.captures(text) {
    return Ok(Slot::Literal(Atom::String(unescape(&captures[1]))));
  }

  Err(format!("unrecognized slot `{}`", text))
}


fn unescape(text: &str) -> String {
  let mut result = String::with_capacity(text.len());
  let mut chars  = text.chars();
  while let Some(c) = chars.next() {
    if c == '\\' {
      match chars.next() {
        Some('n')   => result.push('\n'),
        Some('t')   => result.push('\t'),
        Some(other) => result.push(other),
        None        => result.push('\\'),
      }
    } else {
      result.push(c);
    }
  }
  result
}
