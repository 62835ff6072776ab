/*!

Evaluating expressions to a fixed point.

An expression is evaluated by evaluating its head, then its leaves (those not held by `HoldAll`, `HoldFirst` or
`HoldRest`), and then dispatching the resulting call. If dispatch replaces the call with something new, the
replacement is evaluated in turn. Evaluation stops when nothing changes.

Symbols with an own-value in the `Evaluation` evaluate to that value.

When a `Listable` call threads, the element calls that stay unevaluated are already in their final form. The next
step returns them as they are instead of dispatching them again, so their messages are emitted once. This applies
only to the step right after the dispatch that produced them.

Two limits keep runaway evaluations from taking the process down with them: the recursion depth of `evaluate`,
and the number of times a single expression may be rewritten. Exceeding either is an `EvaluationError`, which
aborts the evaluation.

 */

use std::borrow::Cow;

use crate::{
  atom::{Atom, SExpression},
  dispatch::{dispatch, Outcome},
  evaluation::{Evaluation, EvaluationError},
  logging::{log, Channel},
};


/// Evaluates `expression` against the evaluation's registry.
pub fn evaluate(expression: Atom, evaluation: &mut Evaluation<'_>) -> Result<Atom, EvaluationError> {
  evaluate_skipping(expression, &[], evaluation)
}


/// Evaluates `expression`, returning any of the `unevaluated` calls found in it as they are.
fn evaluate_skipping(expression: Atom, unevaluated: &[Atom], evaluation: &mut Evaluation<'_>)
  -> Result<Atom, EvaluationError>
{
  evaluation.enter()?;
  let result = evaluate_to_fixed_point(expression, unevaluated, evaluation);
  evaluation.exit();
  result
}


fn evaluate_to_fixed_point(mut expression: Atom, unevaluated: &[Atom], evaluation: &mut Evaluation<'_>)
  -> Result<Atom, EvaluationError>
{
  let iteration_limit = evaluation.settings().iteration_limit;
  // Calls the previous step's dispatch left unevaluated.
  let mut skip: Cow<'_, [Atom]> = Cow::Borrowed(unevaluated);

  for _ in 0..iteration_limit {
    if skip.contains(&expression) {
      return Ok(expression);
    }

    let next = match &expression {

      Atom::Symbol(name) => {
        match evaluation.own_value(*name) {
          Some(value) if *value != expression => {
            skip = Cow::Owned(Vec::new());
            value.clone()
          }
          _ => return Ok(expression),
        }
      }

      Atom::SExpression(_) => {
        let call = evaluate_children(&expression, &skip, evaluation)?;

        let outer    = evaluation.take_unevaluated();
        let outcome  = dispatch(&call, evaluation);
        let threaded = evaluation.restore_unevaluated(outer);

        match outcome? {
          Outcome::Replaced(result) if result != call => {
            skip = Cow::Owned(threaded);
            result
          }
          outcome => return Ok(outcome.into_atom()),
        }
      }

      _ => return Ok(expression),

    };

    log(Channel::Debug, 4, format!("{} → {}", expression, next).as_str());
    expression = next;
  }

  log(
    Channel::Error,
    1,
    format!("Iteration limit of {} exceeded while evaluating {}.", iteration_limit, expression).as_str()
  );
  Err(EvaluationError::IterationLimit(iteration_limit))
}


/// Evaluates the head of `expression` and every leaf that the head's attributes do not hold.
fn evaluate_children(expression: &Atom, skip: &[Atom], evaluation: &mut Evaluation<'_>)
  -> Result<Atom, EvaluationError>
{
  let head = evaluate_skipping(expression.head(), skip, evaluation)?;

  let attributes = match &head {
    Atom::Symbol(name) => evaluation.registry().attributes(*name),
    _ => Default::default(),
  };

  let mut leaves = Vec::with_capacity(expression.len());
  for (position, leaf) in expression.leaves().iter().enumerate() {
    if attributes.holds_argument(position) {
      leaves.push(leaf.clone());
    } else {
      leaves.push(evaluate_skipping(leaf.clone(), skip, evaluation)?);
    }
  }

  if head == expression.head() && leaves.as_slice() == expression.leaves() {
    Ok(expression.clone())
  } else {
    Ok(SExpression::new(head, leaves))
  }
}
