/*!

  An `ExpressionFormatter` holds information about how to format an expression, that is, how to express the
  expression as a string.

  "Formatting" needs to be distinct from Rust's standard `Display` trait, because expressions are formatted
  differently depending on the context. `InputForm` quotes strings and writes the handful of operators we know
  about in infix, `FullForm` writes every compound expression as `Head[leaves…]`, and `OutputForm` is what the user
  sees (and what `ToString` produces): strings without quotes.

*/

use strum::EnumString;

use crate::{
  atom::Atom,
  interner::resolve_str,
};


#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumString, Hash)]
pub enum DisplayForm {
  #[strum(serialize = "System`InputForm")]
  Input,
  #[strum(serialize = "System`FullForm")]
  Full,
  #[strum(serialize = "System`OutputForm")]
  Output,
}

impl Default for DisplayForm {
  fn default() -> DisplayForm {
    DisplayForm::Input
  }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
/// Parameters used in methods that transform expressions into strings.
pub struct ExpressionFormatter {
  pub form: DisplayForm,
}

impl From<DisplayForm> for ExpressionFormatter {
  fn from(form: DisplayForm) -> Self {
    ExpressionFormatter {
      form
    }
  }
}

pub trait Formattable {
  fn format(&self, formatter: &ExpressionFormatter) -> String;
}


macro_rules! display_formattable_impl {
  ($type_name:ty) => {
    impl std::fmt::Display for $type_name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format(&$crate::format::ExpressionFormatter::default()))
      }
    }
  }
}
pub(crate) use display_formattable_impl;


/// Heads written as infix operators outside of `FullForm`, with their separators.
fn infix_operator(head: &str) -> Option<&'static str> {
  match head {
    "Plus"       => Some(" + "),
    "Times"      => Some(" "),
    "StringJoin" => Some(" <> "),
    "Rule"       => Some(" -> "),
    _            => None
  }
}

/// Reals are kept at full precision internally but shown as machine reals.
fn format_real(value: &rug::Float) -> String {
  let machine = value.to_f64();
  if machine.is_finite() && machine.fract() == 0.0 {
    format!("{:.1}", machine)
  } else {
    format!("{}", machine)
  }
}

fn join_formatted(children: &[Atom], formatter: &ExpressionFormatter, separator: &str) -> String {
  children.iter()
          .map(|c| c.format(formatter))
          .collect::<Vec<_>>()
          .join(separator)
}

impl Formattable for Atom {
  fn format(&self, formatter: &ExpressionFormatter) -> String {
    match self {
      Atom::String(v) => {
        match formatter.form {
          DisplayForm::Output => v.clone(),
          _ => format!("{:?}", v)
        }
      }
      Atom::Integer(v) => {
        format!("{}", v)
      }
      Atom::Real(v) => {
        format_real(v)
      }
      Atom::Symbol(v) => {
        resolve_str(*v)
      }
      Atom::SExpression(children) => {
        let (head, leaves) = match children.split_first() {
          Some(split) => split,
          None => return "[]".to_string(),
        };

        if formatter.form == DisplayForm::Full {
          return format!("{}[{}]", head.format(formatter), join_formatted(leaves, formatter, ", "));
        }

        if let Atom::Symbol(name) = head {
          let name = resolve_str(*name);
          if name == "List" {
            return format!("{{{}}}", join_formatted(leaves, formatter, ", "));
          }
          if let Some(separator) = infix_operator(name.as_str()) {
            if leaves.len() > 1 {
              return join_formatted(leaves, formatter, separator);
            }
          }
        }

        format!("{}[{}]", head.format(formatter), join_formatted(leaves, formatter, ", "))
      }
    }
  }
}

display_formattable_impl!(Atom);
