/*!

Built-in functions and the standard registry.

Each submodule contributes its built-ins through a `register_builtins(&mut RegistryBuilder)` function. The standard
registry is assembled from all of them the first time it is asked for, and is shared by every evaluation from then
on.

 */

mod expressions;
mod strings;

use lazy_static::lazy_static;

use crate::{
  logging::{log, Channel},
  registry::{Registry, RegistryBuilder, RegistryError},
};

use expressions::register_builtins as register_expressions;
use strings::register_builtins as register_strings;


lazy_static! {
  static ref STANDARD_REGISTRY: Registry = {
    match build_standard_registry() {
      Ok(registry) => registry,
      Err(error) => {
        log(Channel::Critical, 1, format!("Could not build the standard registry: {}", error).as_str());
        panic!("Could not build the standard registry: {}", error)
      }
    }
  };
}


/// The registry of all built-ins, built on first use.
pub fn standard_registry() -> &'static Registry {
  &STANDARD_REGISTRY
}


/// Builds a fresh copy of the standard registry.
pub fn build_standard_registry() -> Result<Registry, RegistryError> {
  let mut builder = RegistryBuilder::new();
  register_builtins(&mut builder)?;
  Ok(builder.build())
}


/// Adds every built-in to `builder`. Lets a custom registry start from the standard built-ins.
pub fn register_builtins(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  register_strings(builder)?;
  register_expressions(builder)?;
  Ok(())
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    atom::{Atom, SExpression},
    dispatch::{dispatch, Outcome},
    evaluation::Evaluation,
    interner::interned_static,
  };

  #[test]
  fn standard_registry_builds() {
    let registry = build_standard_registry().unwrap();
    for head in ["StringJoin", "StringSplit", "StringLength", "Characters", "CharacterRange", "ToString", "StringQ",
                 "Head", "Select", "Attributes", "List"] {
      assert!(registry.contains(interned_static(head)), "{} is not registered", head);
    }
    assert_eq!(registry.get(interned_static("StringSplit")).unwrap().rules.len(), 3);
  }

  #[test]
  fn registering_twice_is_an_error() {
    let mut builder = RegistryBuilder::new();
    register_builtins(&mut builder).unwrap();
    assert!(matches!(register_builtins(&mut builder), Err(RegistryError::DuplicatePattern { .. })));
  }

  #[test]
  fn custom_registries_extend_the_standard_one() {
    fn shout(_: &crate::matching::SolutionSet, _: &Atom, _: &mut Evaluation) -> crate::registry::BuiltinResult {
      Ok(Some(Atom::from("HEY")))
    }

    let mut builder = RegistryBuilder::new();
    register_builtins(&mut builder).unwrap();
    builder.register("Shout[]", Default::default(), shout).unwrap();
    let registry = builder.build();
    let mut evaluation = Evaluation::new(&registry);

    let call = SExpression::with_str_head("Shout", vec![]);
    assert_eq!(dispatch(&call, &mut evaluation).unwrap(), Outcome::Replaced(Atom::from("HEY")));
    let length = SExpression::with_str_head("StringLength", vec![Atom::from("abc")]);
    assert_eq!(dispatch(&length, &mut evaluation).unwrap(), Outcome::Replaced(Atom::from(3i64)));
  }
}
