/*!

User-facing diagnostics.

A built-in that is handed input it cannot work with does not fail. It records a `Message` in the `Evaluation` and
declines to give a replacement, so the call stays unevaluated and the message explains why. Messages are typed:
the payload of each `MessageKind` is the expressions the text refers to. They are only turned into text at the
boundary, by `Message::render`, which looks up the template for the message's tag.

Templates are looked up first on the symbol that issued the message (registered through
`RegistryBuilder::message`), then in the general table below. Placeholders are written `` `n` `` and refer to the
n-th payload expression, formatted in `InputForm`.

*/

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use strum_macros::IntoStaticStr;

use crate::{
  atom::Atom,
  interner::{InternedString, resolve_str},
  registry::Registry,
};

/// Shown when neither the symbol nor the general table has a template for a tag.
pub const MISSING_TEMPLATE: &str = "-- Message text not found --";

lazy_static! {
  static ref PLACEHOLDER: Regex = Regex::new(r"`([0-9]+)`").unwrap();
}


#[derive(Clone, PartialEq, Eq, Debug, IntoStaticStr)]
pub enum MessageKind {
  /// A string was required.
  #[strum(serialize = "string")]
  StringExpected,
  /// Arguments that are not both strings of length one.
  #[strum(serialize = "argtype")]
  ArgType(Atom, Atom),
  /// A `Listable` call whose list arguments differ in length. The payload is the call.
  #[strum(serialize = "tdlen")]
  UnequalLength(Atom),
}

impl MessageKind {
  pub fn tag(&self) -> &'static str {
    self.into()
  }

  /// The expressions the template's placeholders refer to, in order.
  pub fn arguments(&self) -> Vec<Atom> {
    match self {
      MessageKind::StringExpected        => vec![],
      MessageKind::ArgType(start, stop)  => vec![start.clone(), stop.clone()],
      MessageKind::UnequalLength(call)   => vec![call.clone()],
    }
  }
}


/// Templates shared by every symbol, the equivalent of `General::tag`.
pub fn general_template(tag: &str) -> Option<&'static str> {
  match tag {
    "string" => Some("String expected."),
    "tdlen"  => Some("Objects of unequal length in `1` cannot be combined."),
    _        => None
  }
}


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
  pub symbol: InternedString,
  pub kind  : MessageKind,
}

impl Message {
  pub fn new(symbol: InternedString, kind: MessageKind) -> Self {
    Message { symbol, kind }
  }

  pub fn tag(&self) -> &'static str {
    self.kind.tag()
  }

  /// Renders the message as `Symbol::tag: text`.
  pub fn render(&self, registry: &Registry) -> String {
    let arguments = self.kind.arguments();
    let text = match registry.template(self.symbol, self.tag()) {
      Some(template) => substitute(template, &arguments),
      None => {
        let mut text = MISSING_TEMPLATE.to_string();
        for argument in &arguments {
          text.push(' ');
          text.push_str(argument.to_string().as_str());
        }
        text
      }
    };
    format!("{}::{}: {}", resolve_str(self.symbol), self.tag(), text)
  }
}


/// Replaces each `` `n` `` in `template` with the n-th argument. Placeholders without an argument are left alone.
fn substitute(template: &str, arguments: &[Atom]) -> String {
  PLACEHOLDER.replace_all(
    template,
    |captures: &Captures| {
      captures[1].parse::<usize>()
                 .ok()
                 .and_then(|n| n.checked_sub(1))
                 .and_then(|index| arguments.get(index))
                 .map(|argument| argument.to_string())
                 .unwrap_or_else(|| captures[0].to_string())
    }
  ).into_owned()
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    atom::{SExpression, Symbol},
    interner::interned,
    registry::RegistryBuilder,
  };

  #[test]
  fn tags() {
    assert_eq!(MessageKind::StringExpected.tag(), "string");
    assert_eq!(MessageKind::ArgType(Atom::from("a"), Atom::from("b")).tag(), "argtype");
    assert_eq!(MessageKind::UnequalLength(SExpression::list(vec![])).tag(), "tdlen");
  }

  #[test]
  fn substitution() {
    let arguments = vec![Atom::from("ab"), Symbol::from_str("x")];
    assert_eq!(substitute("`1` and `2`, not `3`.", &arguments), "\"ab\" and x, not `3`.");
    assert_eq!(substitute("`0` stays", &arguments), "`0` stays");
  }

  #[test]
  fn render_prefers_symbol_template() {
    let mut builder = RegistryBuilder::new();
    builder.message("Custom", "string", "Custom text for `1`.");
    let registry = builder.build();

    let custom = Message::new(interned("Custom"), MessageKind::StringExpected);
    assert_eq!(custom.render(&registry), "Custom::string: Custom text for `1`.");

    let general = Message::new(interned("Other"), MessageKind::StringExpected);
    assert_eq!(general.render(&registry), "Other::string: String expected.");
  }

  #[test]
  fn render_missing_template() {
    let registry = RegistryBuilder::new().build();
    let message = Message::new(interned("Other"), MessageKind::ArgType(Atom::from("ab"), Atom::from("c")));
    assert_eq!(
      message.render(&registry),
      "Other::argtype: -- Message text not found -- \"ab\" \"c\""
    );
  }
}
