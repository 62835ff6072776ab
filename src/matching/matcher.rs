/*!

Matching a slot list against an argument list.

The algorithm is a straightforward depth-first search. Fixed slots consume one argument. Sequence slots try every
admissible length, shortest first, where the admissible lengths are bounded above by what the slots to their right
still need. When a later slot fails, the search backtracks into the nearest sequence slot and tries the next length.
Bindings made along a failed branch are removed before the branch returns, so a failed match leaves the
`SolutionSet` as it found it.

A name that appears in more than one slot must bind the same thing each time.

*/

use crate::{
  atom::Atom,
  interner::{InternedString, resolve_str},
  logging::{log, Channel},
};

use super::{Binding, Slot, SolutionSet};


/// Does `argument` satisfy the head constraint of a blank?
fn head_matches(head: Option<InternedString>, argument: &Atom) -> bool {
  match head {
    None => true,
    Some(head) => argument.head() == Atom::Symbol(head)
  }
}

/// The fewest arguments the slots can consume between them.
fn minimum_length(slots: &[Slot]) -> usize {
  slots.iter().map(Slot::minimum_length).sum()
}

/// The largest number of arguments the slots can consume, or `None` if a sequence slot makes it unbounded.
fn maximum_length(slots: &[Slot]) -> Option<usize> {
  if slots.iter().any(Slot::is_sequence) {
    None
  } else {
    Some(slots.len())
  }
}

pub(crate) fn match_slots(slots: &[Slot], arguments: &[Atom], solutions: &mut SolutionSet) -> bool {
  // Cheap arity check before any search.
  if arguments.len() < minimum_length(slots) {
    return false;
  }
  if let Some(maximum) = maximum_length(slots) {
    if arguments.len() > maximum {
      return false;
    }
  }

  let (slot, rest_slots) = match slots.split_first() {
    Some(split) => split,
    None => return arguments.is_empty(),
  };

  match slot {

    Slot::Literal(literal) => {
      arguments[0] == *literal && match_slots(rest_slots, &arguments[1..], solutions)
    }

    Slot::Blank { name, head } => {
      let argument = &arguments[0];
      if !head_matches(*head, argument) {
        return false;
      }
      bind_and_continue(*name, Binding::Single(argument.clone()), rest_slots, &arguments[1..], solutions)
    }

    | Slot::BlankSequence { name, head }
    | Slot::BlankNullSequence { name, head } => {
      let shortest = slot.minimum_length();
      let longest  = arguments.len() - minimum_length(rest_slots);

      for length in shortest..=longest {
        let (taken, remaining) = arguments.split_at(length);
        // If the last element taken fails the head test, every longer run fails too.
        if length > 0 && !head_matches(*head, &taken[length - 1]) {
          break;
        }
        log(
          Channel::Debug,
          5,
          format!(
            "Trying sequence of length {} for {}.",
            length,
            name.map(resolve_str).unwrap_or_else(|| "_".to_string())
          ).as_str()
        );
        if bind_and_continue(*name, Binding::Sequence(taken.to_vec()), rest_slots, remaining, solutions) {
          return true;
        }
      }
      false
    }

  }
}

/// Records `binding` under `name` (if the slot is named) and matches the remaining slots. The binding is undone if
/// the remaining slots fail.
fn bind_and_continue(
  name      : Option<InternedString>,
  binding   : Binding,
  rest_slots: &[Slot],
  remaining : &[Atom],
  solutions : &mut SolutionSet
) -> bool {
  let name = match name {
    Some(name) => name,
    None => return match_slots(rest_slots, remaining, solutions),
  };

  if let Some(existing) = solutions.binding(name) {
    // A repeated name. Its earlier binding owns the entry, so there is nothing to undo here.
    return *existing == binding && match_slots(rest_slots, remaining, solutions);
  }

  solutions.insert(name, binding);
  if match_slots(rest_slots, remaining, solutions) {
    true
  } else {
    solutions.remove(name);
    false
  }
}


#[cfg(test)]
mod tests {
  use crate::{
    atom::{Atom, SExpression, Symbol},
    matching::Pattern,
  };

  fn strings(values: &[&str]) -> Vec<Atom> {
    values.iter().map(|v| Atom::from(*v)).collect()
  }

  #[test]
  fn fixed_arity() {
    let pattern = Pattern::compile("f[a_, b_]").unwrap();
    assert!(pattern.matches(&strings(&["x", "y"])).is_some());
    // Over-supply and under-supply both fail.
    assert!(pattern.matches(&strings(&["x", "y", "z"])).is_none());
    assert!(pattern.matches(&strings(&["x"])).is_none());
    assert!(pattern.matches(&[]).is_none());
  }

  #[test]
  fn type_constraints() {
    let pattern = Pattern::compile("f[s_String, l_List]").unwrap();
    let list = SExpression::string_list(["a"]);

    assert!(pattern.matches(&[Atom::from("abc"), list.clone()]).is_some());
    assert!(pattern.matches(&[Symbol::from_str("abc"), list.clone()]).is_none());
    assert!(pattern.matches(&[Atom::from("abc"), Atom::from("a")]).is_none());

    let integer = Pattern::compile("f[n_Integer]").unwrap();
    assert!(integer.matches(&[Atom::from(3i64)]).is_some());
    assert!(integer.matches(&[Atom::from("3")]).is_none());
  }

  #[test]
  fn null_sequence_may_be_empty() {
    let pattern = Pattern::compile("f[items___]").unwrap();
    let solutions = pattern.matches(&[]).unwrap();
    assert_eq!(solutions.sequence("items"), Some(&[][..]));

    let args = strings(&["a", "b", "c"]);
    let solutions = pattern.matches(&args).unwrap();
    assert_eq!(solutions.sequence("items"), Some(&args[..]));
  }

  #[test]
  fn sequence_requires_one() {
    let pattern = Pattern::compile("f[items__]").unwrap();
    assert!(pattern.matches(&[]).is_none());
    assert!(pattern.matches(&strings(&["a"])).is_some());
  }

  #[test]
  fn sequence_partitions_around_fixed_slots() {
    let pattern = Pattern::compile("f[first_, middle___, last_]").unwrap();
    let args = strings(&["a", "b", "c", "d"]);
    let solutions = pattern.matches(&args).unwrap();

    assert_eq!(solutions.get("first"), Some(&args[0]));
    assert_eq!(solutions.sequence("middle"), Some(&args[1..3]));
    assert_eq!(solutions.get("last"), Some(&args[3]));

    let two = strings(&["a", "b"]);
    let solutions = pattern.matches(&two).unwrap();
    assert_eq!(solutions.sequence("middle"), Some(&[][..]));
  }

  #[test]
  fn typed_sequence() {
    let pattern = Pattern::compile("f[s__String, rest___]").unwrap();
    let args = vec![Atom::from("a"), Atom::from("b"), Atom::from(1i64), Atom::from("c")];
    let solutions = pattern.matches(&args).unwrap();
    // Shortest first: the string run takes one element, the rest takes the remainder.
    assert_eq!(solutions.sequence("s"), Some(&args[0..1]));
    assert_eq!(solutions.sequence("rest"), Some(&args[1..]));

    let only_strings = Pattern::compile("f[s__String]").unwrap();
    assert!(only_strings.matches(&args).is_none());
    assert!(only_strings.matches(&args[0..2]).is_some());
  }

  #[test]
  fn two_sequences_backtrack() {
    let pattern = Pattern::compile("f[a__, \"|\", b__]").unwrap();
    let args = strings(&["x", "y", "|", "z"]);
    let solutions = pattern.matches(&args).unwrap();
    assert_eq!(solutions.sequence("a"), Some(&args[0..2]));
    assert_eq!(solutions.sequence("b"), Some(&args[3..]));

    assert!(pattern.matches(&strings(&["|", "z"])).is_none());
  }

  #[test]
  fn repeated_names_must_agree() {
    let pattern = Pattern::compile("f[x_, x_]").unwrap();
    assert!(pattern.matches(&strings(&["a", "a"])).is_some());
    assert!(pattern.matches(&strings(&["a", "b"])).is_none());

    let sequences = Pattern::compile("f[x__, x__]").unwrap();
    let solutions = sequences.matches(&strings(&["a", "b", "a", "b"])).unwrap();
    assert_eq!(solutions.sequence("x"), Some(&strings(&["a", "b"])[..]));
  }

  #[test]
  fn failed_match_leaves_no_bindings() {
    let pattern = Pattern::compile("f[a_, b_String]").unwrap();
    assert!(pattern.matches(&[Atom::from("a"), Atom::from(1i64)]).is_none());
  }

  #[test]
  fn literals() {
    let pattern = Pattern::compile("f[x_, All, 2, \"sep\"]").unwrap();
    let args = vec![Atom::from("a"), Symbol::from_str("All"), Atom::from(2i64), Atom::from("sep")];
    assert!(pattern.matches(&args).is_some());

    let wrong = vec![Atom::from("a"), Symbol::from_str("None"), Atom::from(2i64), Atom::from("sep")];
    assert!(pattern.matches(&wrong).is_none());
  }
}
