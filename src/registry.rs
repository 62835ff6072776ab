/*!

The built-in registry: for each head symbol, its attributes, its rules and its message templates.

A rule pairs a compiled `Pattern` with the native function implementing calls that match it. Rules for the same
head are kept in registration order, and the dispatcher tries them in that order. The registry is assembled once
with a `RegistryBuilder` and is read-only from then on, so a single `Registry` can serve any number of evaluations
on any number of threads.

Problems with the registered data, like a signature that does not parse, are reported by the builder as a
`RegistryError`. They are configuration errors and are expected to stop initialization.

*/

use std::{
  error::Error,
  fmt::{Display, Formatter}
};

use fnv::FnvHashMap;

use crate::{
  atom::Atom,
  attributes::Attributes,
  evaluation::{Evaluation, EvaluationError},
  interner::{interned, resolve_str, InternedString},
  logging::{log, Channel},
  matching::{Pattern, SolutionSet},
  message::general_template,
};

/// `Ok(Some(expression))` replaces the call, `Ok(None)` leaves it unevaluated.
pub type BuiltinResult = Result<Option<Atom>, EvaluationError>;

//                      f(bindings, call, evaluation) -> replacement
pub type BuiltinFn = fn(&SolutionSet, &Atom, &mut Evaluation<'_>) -> BuiltinResult;

/// Registers the built-in function `$name`, whose name is also the name it is referred to by in log messages.
/// Must be used in a function returning `Result<_, RegistryError>`.
macro_rules! register_builtin {
  ($name:ident, $pattern:literal, $attributes:expr, $builder:ident) => {
    $builder.register_named($pattern, $attributes, $name, stringify!($name))?
  }
}
pub(crate) use register_builtin;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RegistryError {
  MalformedPattern {
    signature: String,
    reason   : String,
  },
  /// The same signature was registered twice for one head. The second rule could never fire.
  DuplicatePattern {
    signature: String,
  },
}

impl Display for RegistryError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RegistryError::MalformedPattern { signature, reason } => {
        write!(f, "malformed pattern `{}`: {}", signature, reason)
      }
      RegistryError::DuplicatePattern { signature } => {
        write!(f, "pattern `{}` is already registered", signature)
      }
    }
  }
}

impl Error for RegistryError {}


#[derive(Clone)]
pub struct Rule {
  pub pattern : Pattern,
  pub built_in: BuiltinFn,
  /// The Rust name of the built-in, for log messages.
  pub name    : &'static str,
}


#[derive(Clone, Default)]
pub struct RegistryEntry {
  pub attributes: Attributes,
  pub rules     : Vec<Rule>,
  pub messages  : FnvHashMap<&'static str, String>,
}


#[derive(Default)]
pub struct Registry {
  entries: FnvHashMap<InternedString, RegistryEntry>,
}

impl Registry {
  pub fn get(&self, head: InternedString) -> Option<&RegistryEntry> {
    self.entries.get(&head)
  }

  pub fn contains(&self, head: InternedString) -> bool {
    self.entries.contains_key(&head)
  }

  /// The attributes of `head`. Symbols without an entry have none.
  pub fn attributes(&self, head: InternedString) -> Attributes {
    self.entries
        .get(&head)
        .map(|entry| entry.attributes)
        .unwrap_or_default()
  }

  /// The template for `symbol::tag`, falling back to the general template for `tag`.
  pub fn template(&self, symbol: InternedString, tag: &str) -> Option<&str> {
    self.entries
        .get(&symbol)
        .and_then(|entry| entry.messages.get(tag))
        .map(String::as_str)
        .or_else(|| general_template(tag))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}


#[derive(Default)]
pub struct RegistryBuilder {
  entries: FnvHashMap<InternedString, RegistryEntry>,
}

impl RegistryBuilder {
  pub fn new() -> Self {
    RegistryBuilder::default()
  }

  /// Compiles `signature` and appends the rule to its head's entry. The attributes are added to the head's
  /// attributes.
  pub fn register(&mut self, signature: &str, attributes: Attributes, built_in: BuiltinFn)
    -> Result<&mut Self, RegistryError>
  {
    self.register_named(signature, attributes, built_in, "built-in")
  }

  /// Like `register`, recording `name` for log messages.
  pub fn register_named(
    &mut self,
    signature : &str,
    attributes: Attributes,
    built_in  : BuiltinFn,
    name      : &'static str
  ) -> Result<&mut Self, RegistryError>
  {
    let pattern = Pattern::compile(signature)?;
    let entry   = self.entries.entry(pattern.head()).or_default();

    if entry.rules.iter().any(|rule| rule.pattern == pattern) {
      return Err(RegistryError::DuplicatePattern { signature: signature.to_string() });
    }

    log(
      Channel::Debug,
      5,
      format!("Registering {} for {}.", name, pattern).as_str()
    );
    entry.attributes.update(attributes);
    entry.rules.push(Rule { pattern, built_in, name });
    Ok(self)
  }

  /// Adds attributes to `head` without registering any rule, e.g. for `List`.
  pub fn set_attributes(&mut self, head: &str, attributes: Attributes) -> &mut Self {
    self.entries.entry(interned(head)).or_default().attributes.update(attributes);
    self
  }

  /// Sets the template used to render `head::tag`.
  pub fn message(&mut self, head: &str, tag: &'static str, template: &str) -> &mut Self {
    self.entries.entry(interned(head)).or_default().messages.insert(tag, template.to_string());
    self
  }

  pub fn build(self) -> Registry {
    log(
      Channel::Info,
      4,
      format!(
        "Built registry with {} heads: {}.",
        self.entries.len(),
        {
          let mut heads: Vec<String> = self.entries.keys().map(|head| resolve_str(*head)).collect();
          heads.sort();
          heads.join(", ")
        }
      ).as_str()
    );
    Registry { entries: self.entries }
  }
}
