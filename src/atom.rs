/*!

Primitive expression node types.

An `Atom` is either a leaf (string, integer, real, symbol) or an S-expression. An S-expression stores its head at
index 0 followed by its leaves, so `f[a, b]` is the vector `[f, a, b]`. Nodes are never mutated after
construction. Transformations build new nodes, sharing unchanged children through the `Arc`.

*/

use std::{
  hash::{Hash, Hasher},
  sync::Arc
};

use strum_macros::{
  EnumDiscriminants,
  IntoStaticStr
};
use rug::{
  Integer as BigInteger,
  Float as BigFloat,
};


use crate::{
  interner::{
    InternedString,
    interned_static
  },
};

#[derive(Clone, PartialEq, Debug, IntoStaticStr, EnumDiscriminants)]
#[strum_discriminants(name(AtomKind))]
pub enum Atom {
  String(String),
  Integer(BigInteger),
  Real(BigFloat),
  Symbol(InternedString),
  SExpression(Arc<Vec<Atom>>)
}


impl Atom {
  /// The head of an S-expression is its first child. The head of any other atom is the symbol naming its kind,
  /// e.g. `Head["abc"] == String`.
  pub fn head(&self) -> Atom {
    match self {
      Atom::SExpression(children) if !children.is_empty() => children[0].clone(),

      // A headless S-expression is treated like any other atom.
      atom => {
        Symbol::from_static_str(atom.into())
      }
    }
  }

  /// Reports the `AtomKind` of `self`.
  pub fn kind(&self) -> AtomKind {
    self.into()
  }

  /// Gives the symbol (as an `InternedString`) under which the properties of this
  /// expression would be stored in the registry.
  pub fn name(&self) -> Option<InternedString> {
    match self {
      Atom::SExpression(children) => {
        match children.first() {
          Some(Atom::Symbol(name)) => Some(*name),
          _                        => None
        }
      },
      Atom::Symbol(name) => Some(*name),
      _                  => None
    }
  }

  /// Returns the number of leaves of the expression. Only S-Expressions can have nonzero length.
  /// For string length, use the `StringLength` built-in.
  pub fn len(&self) -> usize {
    match self {
      | Atom::String(_)
      | Atom::Integer(_)
      | Atom::Real(_)
      | Atom::Symbol(_) => 0,

      Atom::SExpression(children) => children.len().saturating_sub(1) // Don't count the head.
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The leaves of an S-expression, i.e. the children without the head. Atoms have no leaves.
  pub fn leaves(&self) -> &[Atom] {
    match self {
      Atom::SExpression(children) => children.get(1..).unwrap_or(&[]),
      _ => &[]
    }
  }

  /// Is `self` an S-expression whose head is the symbol `head`?
  pub fn has_head(&self, head: InternedString) -> bool {
    match self {
      Atom::SExpression(children) => children.first() == Some(&Atom::Symbol(head)),
      _ => false
    }
  }

  /// Is `self` an expression of the form `List[…]`?
  pub fn is_list(&self) -> bool {
    self.has_head(interned_static("List"))
  }

  /// Is `atom` the symbol `True`
  pub fn is_true(&self) -> bool {
    *self == Atom::Symbol(interned_static("True"))
  }

  pub fn is_string(&self) -> bool {
    matches!(self, Atom::String(_))
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Atom::String(value) => Some(value.as_str()),
      _ => None
    }
  }

  pub fn is_number(&self) -> bool {
    matches!(self, Atom::Integer(_) | Atom::Real(_))
  }
}


impl Eq for Atom {}

/**
  If two expressions just happen to have the same representation, a string and a symbol, we still want their hashes
  to differ. So we hash a type-specific prefix before hashing the data. The prefixes are the ones Cory's expreduce
  uses.

  ```text
  real      : [195, 244, 76 , 249, 227, 115, 88 , 251]
  expression: [72 , 5  , 244, 86 , 5  , 210, 69 , 30]
  integer   : [242, 99 , 84 , 113, 102, 46 , 118, 94]
  string    : [102, 206, 57 , 172, 207, 100, 198, 133]
  symbol    : [107, 10 , 247, 23 , 33 , 221, 163, 156]
  ```

  Reals hash through their nearest machine real. Equal reals have equal machine approximations, which is all `Hash`
  requires.
*/
impl Hash for Atom {
  fn hash<H: Hasher>(&self, hasher: &mut H) {
    match self {
      Atom::String(v) => {
        hasher.write(&[102, 206, 57 , 172, 207, 100, 198, 133]);
        v.hash(hasher);
      }

      Atom::Integer(v) => {
        hasher.write(&[242, 99, 84, 113, 102, 46, 118, 94]);
        v.hash(hasher)
      }

      Atom::Real(v) => {
        hasher.write(&[195, 244, 76 , 249, 227, 115, 88 , 251]);
        v.to_f64().to_bits().hash(hasher);
      }

      Atom::Symbol(v) => {
        hasher.write(&[107, 10 , 247, 23 , 33 , 221, 163, 156]);
        v.hash(hasher);
      }

      Atom::SExpression(v) => {
        hasher.write(&[72 , 5  , 244, 86 , 5  , 210, 69 , 30]);
        for part in v.as_ref() {
          part.hash(hasher);
        }
      }

    }
  }
}

impl From<&str> for Atom {
  fn from(value: &str) -> Self {
    Atom::String(value.to_string())
  }
}

impl From<String> for Atom {
  fn from(value: String) -> Self {
    Atom::String(value)
  }
}

impl From<i64> for Atom {
  fn from(value: i64) -> Self {
    Atom::Integer(BigInteger::from(value))
  }
}

impl From<usize> for Atom {
  fn from(value: usize) -> Self {
    Atom::Integer(BigInteger::from(value))
  }
}

impl From<bool> for Atom {
  fn from(value: bool) -> Self {
    match value {
      true  => Symbol::from_static_str("True"),
      false => Symbol::from_static_str("False"),
    }
  }
}


/// There are a variety of common tasks that apply only to a specific variant of `Atom`. Instead of packing them all
/// into `Atom`'s impl, we put them into free functions in a module named after the variant. The functions that remain
/// in `Atom`'s impl are those that could reasonably be called on any `Atom` variant.
#[allow(non_snake_case)]
pub mod Symbol {
  use crate::atom::Atom;
  use crate::interner::{
    interned,
    interned_static
  };

  /// We often have a need to create an expression for some standard built-in or stdlib symbol.
  pub fn from_static_str(name: &'static str) -> Atom {
    Atom::Symbol(interned_static(name))
  }

  /// Create a symbol from a `&str`.
  pub fn from_str(name: &str) -> Atom {
    Atom::Symbol(interned(name))
  }

}

#[allow(non_snake_case)]
pub mod SExpression {
  use std::sync::Arc;
  use super::*;

  // region Convenience construction functions
  // Using these functions decreases the probability of an incorrectly constructed expression.

  /// Creates a new `Atom::SExpression` having head  `head` and children `children`.
  pub fn new(head: Atom, children: Vec<Atom>) -> Atom {
    let mut new_children = Vec::with_capacity(children.len()+1);
    new_children.push(head);
    new_children.extend(children);
    Atom::SExpression(Arc::new(new_children))
  }

  /// Creates `head_str[children…]` for some standard built-in or stdlib symbol.
  pub fn with_str_head(head_str: &'static str, children: Vec<Atom>) -> Atom {
    new(Symbol::from_static_str(head_str), children)
  }

  /// Creates `List[children…]`.
  pub fn list(children: Vec<Atom>) -> Atom {
    with_str_head("List", children)
  }

  /// Creates `List[…]` of string atoms.
  pub fn string_list<S: Into<String>, I: IntoIterator<Item=S>>(strings: I) -> Atom {
    list(strings.into_iter().map(|s| Atom::String(s.into())).collect())
  }

  // endregion

  /// Makes a copy of `function` with the same head and the given leaves. Atoms are returned unchanged.
  pub fn with_leaves(function: &Atom, leaves: Vec<Atom>) -> Atom {
    match function {
      Atom::SExpression(_) => new(function.head(), leaves),
      atom => atom.clone()
    }
  }

  /// Return the expression at index `n` in the S-expression. Indices start at 0, and the 0th element is
  /// always the head of the expression. Gives `None` for atoms and out-of-range indices.
  pub fn part(expression: &Atom, n: usize) -> Option<Atom> {
    match expression {
      Atom::SExpression(children) => children.get(n).cloned(),
      _ => None
    }
  }

}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::interner::interned;

  #[test]
  fn heads_of_atoms() {
    assert_eq!(Atom::from("abc").head(), Symbol::from_static_str("String"));
    assert_eq!(Atom::from(3i64).head(), Symbol::from_static_str("Integer"));
    assert_eq!(Symbol::from_str("x").head(), Symbol::from_static_str("Symbol"));
    assert_eq!(
      Atom::Real(BigFloat::with_val(53, 1.5)).head(),
      Symbol::from_static_str("Real")
    );
  }

  #[test]
  fn s_expression_structure() {
    let f = SExpression::new(Symbol::from_str("f"), vec![Atom::from("a"), Atom::from(2i64)]);
    assert_eq!(f.len(), 2);
    assert_eq!(f.head(), Symbol::from_str("f"));
    assert_eq!(f.name(), Some(interned("f")));
    assert_eq!(f.leaves(), &[Atom::from("a"), Atom::from(2i64)]);
    assert_eq!(SExpression::part(&f, 1), Some(Atom::from("a")));
    assert_eq!(SExpression::part(&f, 3), None);
    assert!(f.has_head(interned("f")));
    assert!(!f.is_list());
  }

  #[test]
  fn structural_equality() {
    let a = SExpression::string_list(["x", "y"]);
    let b = SExpression::list(vec![Atom::from("x"), Atom::from("y")]);
    assert_eq!(a, b);
    assert!(a.is_list());
    // A string and a symbol with the same text are different atoms.
    assert_ne!(Atom::from("x"), Symbol::from_str("x"));
  }

  #[test]
  fn hashes_distinguish_kinds() {
    use fnv::FnvHasher;

    fn hashed(atom: &Atom) -> u64 {
      let mut hasher = FnvHasher::default();
      atom.hash(&mut hasher);
      hasher.finish()
    }

    assert_ne!(hashed(&Atom::from("x")), hashed(&Symbol::from_str("x")));
    assert_eq!(
      hashed(&SExpression::string_list(["a"])),
      hashed(&SExpression::list(vec![Atom::from("a")]))
    );
  }

  #[test]
  fn with_leaves_keeps_head() {
    let f = SExpression::new(Symbol::from_str("f"), vec![Atom::from(1i64)]);
    let g = SExpression::with_leaves(&f, vec![Atom::from(2i64), Atom::from(3i64)]);
    assert_eq!(g, SExpression::new(Symbol::from_str("f"), vec![Atom::from(2i64), Atom::from(3i64)]));
    // The original is untouched.
    assert_eq!(f.len(), 1);
  }

  #[test]
  fn headless_s_expressions() {
    let empty = Atom::SExpression(Arc::new(vec![]));
    assert_eq!(empty.len(), 0);
    assert!(empty.is_empty());
    assert!(empty.leaves().is_empty());
    assert!(!empty.is_list());
    assert!(!empty.has_head(interned_static("List")));
    assert_eq!(empty.head(), Symbol::from_static_str("SExpression"));
    assert_eq!(empty.name(), None);
  }
}
