/*!

# Patterns over argument lists

A built-in is declared with a signature string such as `StringSplit[string_String, seps_List]`. The signature is
compiled once, when the registry is built, into a `Pattern`: the head symbol and an ordered list of `Slot`s. At
dispatch time the pattern is matched against the argument list of a call. A successful match produces a
`SolutionSet` binding each named slot to the argument (or run of arguments) it consumed.

Slots come in four flavors, named after the Mathematica blanks they stand for:

| Syntax       | Slot                 | Consumes                         |
|:-------------|:---------------------|:---------------------------------|
| `x_`, `x_T`  | `Blank`              | exactly one argument (of head T) |
| `x__`, `x__T`| `BlankSequence`      | one or more arguments            |
| `x___`       | `BlankNullSequence`  | zero or more arguments           |
| `"a"`, `3`, `s` | `Literal`         | one argument equal to the atom   |

The name is optional (`_String` matches any string without binding it). The head constraint `T` is compared
against `Atom::head()`, so `String`, `Integer`, `Real` and `Symbol` constrain the kind of an atom, and any other
symbol (`List`, say) constrains the head of a compound argument.

*/

mod matcher;
mod signature;

use std::{
  fmt::Display,
  ops::Index
};

use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::{
  atom::Atom,
  interner::{
    get_interned,
    resolve_str,
    InternedString
  },
};


/// What a named slot is bound to after a successful match.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Binding {
  Single(Atom),
  Sequence(Vec<Atom>),
}

impl Display for Binding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Binding::Single(atom) => write!(f, "{}", atom),
      Binding::Sequence(atoms) => {
        write!(
          f,
          "Sequence[{}]",
          atoms.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
        )
      }
    }
  }
}


/// A map from slot name to what the slot matched.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SolutionSet(FnvHashMap<InternedString, Binding>);

impl SolutionSet {
  pub fn new() -> Self {
    SolutionSet::default()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub(crate) fn binding(&self, name: InternedString) -> Option<&Binding> {
    self.0.get(&name)
  }

  pub(crate) fn insert(&mut self, name: InternedString, binding: Binding) {
    self.0.insert(name, binding);
  }

  pub(crate) fn remove(&mut self, name: InternedString) {
    self.0.remove(&name);
  }

  /// The atom bound to the single-argument slot `name`.
  pub fn get(&self, name: &str) -> Option<&Atom> {
    match self.0.get(&get_interned(name)?) {
      Some(Binding::Single(atom)) => Some(atom),
      _ => None
    }
  }

  /// The atoms bound to the slot `name`. A single-argument slot gives a one-element slice.
  pub fn sequence(&self, name: &str) -> Option<&[Atom]> {
    match self.0.get(&get_interned(name)?)? {
      Binding::Single(atom)     => Some(std::slice::from_ref(atom)),
      Binding::Sequence(atoms) => Some(atoms.as_slice()),
    }
  }

  /// The text of the string atom bound to `name`.
  pub fn string(&self, name: &str) -> Option<&str> {
    self.get(name).and_then(Atom::as_str)
  }
}

/// Panics if `name` is not bound to a single argument. Built-ins use this for slots their signature guarantees.
impl Index<&str> for SolutionSet {
  type Output = Atom;

  fn index(&self, name: &str) -> &Self::Output {
    match self.get(name) {
      Some(atom) => atom,
      None => panic!("pattern variable {} is not bound to a single argument", name),
    }
  }
}

impl Display for SolutionSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // Sorted by name so that log output is reproducible.
    let mut entries: Vec<(String, &Binding)> =
        self.0.iter().map(|(name, binding)| (resolve_str(*name), binding)).collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    let formatted = entries.iter()
                           .map(|(name, binding)| format!("{}→{}", name, binding))
                           .collect::<Vec<String>>()
                           .join(", ");
    write!(f, "{{{}}}", formatted)
  }
}


/// One position in a pattern's argument list.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Slot {
  Blank {
    name: Option<InternedString>,
    head: Option<InternedString>,
  },
  BlankSequence {
    name: Option<InternedString>,
    head: Option<InternedString>,
  },
  BlankNullSequence {
    name: Option<InternedString>,
    head: Option<InternedString>,
  },
  Literal(Atom),
}

impl Slot {
  /// The fewest arguments this slot can consume.
  pub fn minimum_length(&self) -> usize {
    match self {
      Slot::BlankNullSequence { .. } => 0,
      _ => 1
    }
  }

  pub fn is_sequence(&self) -> bool {
    matches!(self, Slot::BlankSequence { .. } | Slot::BlankNullSequence { .. })
  }
}

impl Display for Slot {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let (name, underscores, head) = match self {
      Slot::Literal(atom) => return write!(f, "{}", atom),
      Slot::Blank { name, head }             => (name, "_", head),
      Slot::BlankSequence { name, head }     => (name, "__", head),
      Slot::BlankNullSequence { name, head } => (name, "___", head),
    };
    write!(
      f,
      "{}{}{}",
      name.map(resolve_str).unwrap_or_default(),
      underscores,
      head.map(resolve_str).unwrap_or_default()
    )
  }
}


/// A compiled signature: `head[slots…]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pattern {
  pub(crate) head : InternedString,
  pub(crate) slots: SmallVec<[Slot; 4]>,
}

impl Pattern {
  pub fn head(&self) -> InternedString {
    self.head
  }

  pub fn slots(&self) -> &[Slot] {
    &self.slots
  }

  /// Matches the pattern against an argument list. On success, every named slot is bound. On failure nothing is
  /// returned, not even the bindings made before the failing slot.
  pub fn matches(&self, arguments: &[Atom]) -> Option<SolutionSet> {
    let mut solutions = SolutionSet::new();
    if matcher::match_slots(&self.slots, arguments, &mut solutions) {
      Some(solutions)
    } else {
      None
    }
  }
}

impl Display for Pattern {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}[{}]",
      resolve_str(self.head),
      self.slots.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
    )
  }
}

/// Renders the bindings for log messages.
pub fn display_solutions(solutions: &SolutionSet) -> String {
  solutions.to_string()
}
