/*!

Dispatching a call to the built-in that implements it.

Dispatch runs through four stages:

 1. **Lookup.** Only an S-expression whose head is a symbol with a registry entry can dispatch. Anything else is
    returned `Unevaluated`.
 2. **Preprocess.** The head's attributes rewrite the argument list. `Flat` splices nested calls to the same head
    into the argument list. `Listable` threads the call over `List` arguments, producing one call per element.
    Flattening happens first.
 3. **Try patterns.** The entry's rules are tried in the order they were registered. The first rule whose pattern
    matches the argument list wins, and later rules are never consulted.
 4. **Invoke.** The winning built-in gets the bindings, the call, and the evaluation. It either gives a replacement
    or declines, in which case the call is returned `Unevaluated`.

If no rule matches, a `OneIdentity` head called with a single argument is replaced by that argument. Otherwise the
call is returned `Unevaluated`.

Apart from the messages it appends to the evaluation, dispatch is a pure function of the registry and its input.
When threading, it also notes in the evaluation which element calls were left unevaluated, so that `evaluate` does
not dispatch them a second time when it evaluates the resulting list.

*/

use crate::{
  atom::{Atom, SExpression},
  attributes::Attributes,
  evaluation::{Evaluation, EvaluationError},
  interner::{resolve_str, InternedString},
  logging::{log, Channel},
  matching::display_solutions,
  message::MessageKind,
};


/// The result of dispatching a call.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
  /// A built-in (or `OneIdentity`, or threading) produced a new expression.
  Replaced(Atom),
  /// Nothing applied. The atom is the call after preprocessing.
  Unevaluated(Atom),
}

impl Outcome {
  pub fn into_atom(self) -> Atom {
    match self {
      Outcome::Replaced(atom) | Outcome::Unevaluated(atom) => atom
    }
  }

  pub fn is_replaced(&self) -> bool {
    matches!(self, Outcome::Replaced(_))
  }
}


/// The argument list after attribute preprocessing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Preprocessed {
  Arguments(Vec<Atom>),
  /// One argument list per element call of a threaded `Listable` call.
  Thread(Vec<Vec<Atom>>),
}


/// Splices every argument of the form `head[…]` into the argument list, recursively.
pub fn flatten(head: InternedString, arguments: Vec<Atom>) -> Vec<Atom> {
  if !arguments.iter().any(|argument| argument.has_head(head)) {
    return arguments;
  }

  let mut flattened = Vec::with_capacity(arguments.len());
  for argument in arguments {
    if argument.has_head(head) {
      flattened.extend(flatten(head, argument.leaves().to_vec()));
    } else {
      flattened.push(argument);
    }
  }
  flattened
}


/// Threads over the `List` arguments. Gives `Ok(None)` when there are none, and `Err(())` when the lists differ in
/// length.
fn thread(arguments: &[Atom]) -> Result<Option<Vec<Vec<Atom>>>, ()> {
  let mut length: Option<usize> = None;
  for argument in arguments.iter().filter(|argument| argument.is_list()) {
    match length {
      None                           => length = Some(argument.len()),
      Some(n) if n != argument.len() => return Err(()),
      Some(_)                        => {}
    }
  }

  let length = match length {
    Some(length) => length,
    None => return Ok(None),
  };

  let threaded = (0..length).map(
    |k| {
      arguments.iter()
               .map(|argument| {
                 if argument.is_list() {
                   argument.leaves()[k].clone()
                 } else {
                   argument.clone()
                 }
               })
               .collect()
    }
  ).collect();

  Ok(Some(threaded))
}


/// Applies the `Flat` and `Listable` attributes of `head` to `arguments`. When threading fails, the error is the
/// message to emit.
pub fn preprocess(head: InternedString, attributes: Attributes, arguments: Vec<Atom>)
  -> Result<Preprocessed, MessageKind>
{
  let arguments = match attributes.flat() {
    true  => flatten(head, arguments),
    false => arguments
  };

  if !attributes.listable() {
    return Ok(Preprocessed::Arguments(arguments));
  }

  match thread(&arguments) {
    Ok(Some(calls)) => Ok(Preprocessed::Thread(calls)),
    Ok(None)        => Ok(Preprocessed::Arguments(arguments)),
    Err(())         => {
      Err(MessageKind::UnequalLength(SExpression::new(Atom::Symbol(head), arguments)))
    }
  }
}


/// Dispatches `expression` against the evaluation's registry.
pub fn dispatch(expression: &Atom, evaluation: &mut Evaluation<'_>) -> Result<Outcome, EvaluationError> {
  // Lookup
  let head: InternedString = match expression {
    Atom::SExpression(children) => {
      match children.first() {
        Some(Atom::Symbol(head)) => *head,
        _ => return Ok(Outcome::Unevaluated(expression.clone()))
      }
    }
    _ => return Ok(Outcome::Unevaluated(expression.clone()))
  };

  let registry = evaluation.registry();
  let entry    = match registry.get(head) {
    Some(entry) => entry,
    None        => {
      log(
        Channel::Debug,
        4,
        format!("No definitions for {}.", resolve_str(head)).as_str()
      );
      return Ok(Outcome::Unevaluated(expression.clone()));
    }
  };

  log(Channel::Debug, 4, format!("Dispatching {}.", expression).as_str());

  // Preprocess
  let arguments = match preprocess(head, entry.attributes, expression.leaves().to_vec()) {

    Ok(Preprocessed::Arguments(arguments)) => arguments,

    Ok(Preprocessed::Thread(calls)) => {
      log(
        Channel::Debug,
        4,
        format!("Threading {} over {} elements.", resolve_str(head), calls.len()).as_str()
      );
      let mut results = Vec::with_capacity(calls.len());
      for arguments in calls {
        let call = SExpression::new(Atom::Symbol(head), arguments);
        match dispatch(&call, evaluation)? {
          Outcome::Replaced(result) => results.push(result),
          Outcome::Unevaluated(call) => {
            evaluation.note_unevaluated(&call);
            results.push(call);
          }
        }
      }
      return Ok(Outcome::Replaced(SExpression::list(results)));
    }

    Err(kind) => {
      // The message carries the flattened call.
      let call = match &kind {
        MessageKind::UnequalLength(call) => call.clone(),
        _ => expression.clone(),
      };
      evaluation.message(head, kind);
      return Ok(Outcome::Unevaluated(call));
    }

  };

  let call = match arguments.as_slice() == expression.leaves() {
    true  => expression.clone(),
    false => SExpression::new(Atom::Symbol(head), arguments)
  };

  // Try patterns in registration order, invoking the first that matches.
  for rule in entry.rules.iter() {
    if let Some(solutions) = rule.pattern.matches(call.leaves()) {
      log(
        Channel::Debug,
        4,
        format!(
          "Matched {}, calling {} with {}.",
          rule.pattern,
          rule.name,
          display_solutions(&solutions)
        ).as_str()
      );

      return match (rule.built_in)(&solutions, &call, evaluation)? {
        Some(result) => Ok(Outcome::Replaced(result)),
        None => Ok(Outcome::Unevaluated(call)),
      };
    }
  }

  if entry.attributes.one_identity() && call.len() == 1 {
    log(
      Channel::Debug,
      4,
      format!("No rule matched {}, applying OneIdentity.", call).as_str()
    );
    return Ok(Outcome::Replaced(call.leaves()[0].clone()));
  }

  log(Channel::Debug, 4, format!("No rule matched {}.", call).as_str());
  Ok(Outcome::Unevaluated(call))
}
