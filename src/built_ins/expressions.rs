/*!

Expression manipulation

 */
#![allow(non_snake_case)]

use crate::{
  atom::{Atom, SExpression, Symbol},
  attributes::Attribute,
  evaluate::evaluate,
  evaluation::Evaluation,
  logging::{log, Channel},
  matching::{display_solutions, SolutionSet},
  registry::{register_builtin, BuiltinResult, RegistryBuilder, RegistryError},
};


/// Implements calls matching
///     `Head[expr_] := built-in[expr]`
pub(crate) fn Head(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  log(
    Channel::Debug,
    4,
    format!(
      "Head called with arguments {}",
      display_solutions(arguments)
    ).as_str()
  );

  Ok(Some(arguments["expr"].head()))
}


/// Keeps the elements `e` of `list` for which `criterion[e]` evaluates to `True`. The result has the same head as
/// `list`.
///
/// Implements calls matching
///     `Select[list_List, criterion_] := built-in[list, criterion]`
pub(crate) fn Select(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation) -> BuiltinResult {
  log(
    Channel::Debug,
    4,
    format!(
      "Select called with arguments {}",
      display_solutions(arguments)
    ).as_str()
  );

  let list      = &arguments["list"];
  let criterion = &arguments["criterion"];

  let mut selected = Vec::new();
  for element in list.leaves() {
    let test = SExpression::new(criterion.clone(), vec![element.clone()]);
    if evaluate(test, evaluation)?.is_true() {
      selected.push(element.clone());
    }
  }

  Ok(Some(SExpression::with_leaves(list, selected)))
}


/// The attributes of a symbol, as a list of symbols. `Attributes` holds its argument, so an own-value of the symbol
/// does not get in the way.
///
/// Implements calls matching
///     `Attributes[symbol_Symbol] := built-in[symbol]`
pub(crate) fn Attributes(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation) -> BuiltinResult {
  let name = match &arguments["symbol"] {
    Atom::Symbol(name) => *name,
    _ => return Ok(None),
  };

  let attributes = evaluation.registry().attributes(name);
  let symbols = attributes.iter()
                          .map(|attribute| Symbol::from_static_str(attribute.into()))
                          .collect();
  Ok(Some(SExpression::list(symbols)))
}


pub(crate) fn register_builtins(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  register_builtin!(Head      , "Head[expr_]"                  , Attribute::Protected.into()              , builder);
  register_builtin!(Select    , "Select[list_List, criterion_]", Attribute::Protected.into()              , builder);
  register_builtin!(Attributes, "Attributes[symbol_Symbol]"    , Attribute::HoldAll + Attribute::Protected, builder);

  // Attributes for functions without definition
  builder.set_attributes("List", Attribute::Protected.into());

  Ok(())
}
