/*!

String functions.

Every function here follows the same convention for bad input: it records a message in the evaluation and returns
`Ok(None)`, leaving the call unevaluated. None of them can fail.

 */
#![allow(non_snake_case)]

use crate::{
  atom::{Atom, SExpression},
  attributes::{Attribute, Attributes},
  evaluation::Evaluation,
  format::{DisplayForm, Formattable},
  interner::interned_static,
  logging::{log, Channel},
  matching::{display_solutions, SolutionSet},
  message::MessageKind,
  registry::{register_builtin, BuiltinResult, RegistryBuilder, RegistryError},
};


/// Appends the atoms of `items` to `flattened`, splicing nested lists at any depth.
fn flatten_lists<'a>(items: &'a [Atom], flattened: &mut Vec<&'a Atom>) {
  for item in items {
    if item.is_list() {
      flatten_lists(item.leaves(), flattened);
    } else {
      flattened.push(item);
    }
  }
}


/// Concatenates strings, flattening out any lists among the items.
///
/// ```text
/// StringJoin["a", "b", "c"]                  → "abc"
/// StringJoin[{"Hello", " ", {"world"}}, "!"] → "Hello world!"
/// StringJoin["U", 2]                          → StringJoin::string message, unevaluated
/// ```
///
/// Implements calls matching
///     `StringJoin[items___] := built-in[items]`
pub(crate) fn StringJoin(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation) -> BuiltinResult {
  log(
    Channel::Debug,
    4,
    format!("StringJoin called with arguments {}", display_solutions(arguments)).as_str()
  );

  let items = arguments.sequence("items").unwrap_or_default();
  let mut flattened: Vec<&Atom> = Vec::with_capacity(items.len());
  flatten_lists(items, &mut flattened);

  let mut result = String::new();
  for item in flattened {
    match item.as_str() {
      Some(text) => result.push_str(text),
      None => {
        evaluation.message(interned_static("StringJoin"), MessageKind::StringExpected);
        return Ok(None);
      }
    }
  }

  Ok(Some(Atom::String(result)))
}


/// Unicode whitespace plus the ASCII file, group, record and unit separators.
fn is_separator(c: char) -> bool {
  c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}


/// Splits on runs of whitespace, discarding empty pieces.
///
/// ```text
/// StringSplit["  abc    123  "] → {"abc", "123"}
/// ```
///
/// Implements calls matching
///     `StringSplit[string_String] := built-in[string]`
pub(crate) fn StringSplit(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  let string = arguments.string("string").unwrap_or_default();
  Ok(Some(SExpression::string_list(string.split(is_separator).filter(|piece| !piece.is_empty()))))
}


/// Splits `string` on the literal `separator`, keeping empty pieces. An empty separator splits between characters.
fn split_on(string: &str, separator: &str) -> Vec<String> {
  if separator.is_empty() {
    if string.is_empty() {
      return vec![String::new()];
    }
    return string.chars().map(String::from).collect();
  }
  string.split(separator).map(str::to_string).collect()
}


/// Splits on a literal separator, keeping empty pieces between adjacent separators.
///
/// ```text
/// StringSplit["abc,123", ","] → {"abc", "123"}
/// StringSplit["a,,b", ","]    → {"a", "", "b"}
/// ```
///
/// Implements calls matching
///     `StringSplit[string_String, sep_String] := built-in[string, sep]`
pub(crate) fn StringSplitOn(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  let string    = arguments.string("string").unwrap_or_default();
  let separator = arguments.string("sep").unwrap_or_default();
  Ok(Some(SExpression::string_list(split_on(string, separator))))
}


/// Splits on each separator in turn: the string is split on the first separator, every piece is split on the
/// second, and so on.
///
/// ```text
/// StringSplit["abc,123.456", {",", "."}] → {"abc", "123", "456"}
/// ```
///
/// Implements calls matching
///     `StringSplit[string_String, seps_List] := built-in[string, seps]`
pub(crate) fn StringSplitOnEach(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation)
  -> BuiltinResult
{
  log(
    Channel::Debug,
    4,
    format!("StringSplit called with arguments {}", display_solutions(arguments)).as_str()
  );

  let string     = arguments.string("string").unwrap_or_default();
  let separators = arguments["seps"].leaves();

  let mut pieces = vec![string.to_string()];
  for separator in separators {
    let separator = match separator.as_str() {
      Some(separator) => separator,
      None => {
        evaluation.message(interned_static("StringSplit"), MessageKind::StringExpected);
        return Ok(None);
      }
    };
    pieces = pieces.iter()
                   .flat_map(|piece| split_on(piece, separator))
                   .collect();
  }

  Ok(Some(SExpression::string_list(pieces)))
}


/// The number of characters in a string.
///
/// ```text
/// StringLength["abc"]       → 3
/// StringLength[{"a", "bc"}] → {1, 2}
/// StringLength[x]           → StringLength::string message, unevaluated
/// ```
///
/// Implements calls matching
///     `StringLength[str_] := built-in[str]`
pub(crate) fn StringLength(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation) -> BuiltinResult {
  match arguments["str"].as_str() {
    Some(text) => Ok(Some(Atom::from(text.chars().count()))),
    None => {
      evaluation.message(interned_static("StringLength"), MessageKind::StringExpected);
      Ok(None)
    }
  }
}


/// Implements calls matching
///     `Characters[string_String] := built-in[string]`
pub(crate) fn Characters(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  let string = arguments.string("string").unwrap_or_default();
  Ok(Some(SExpression::string_list(string.chars().map(String::from))))
}


/// The characters from `start` to `stop` inclusive, by code point.
///
/// ```text
/// CharacterRange["a", "e"] → {"a", "b", "c", "d", "e"}
/// CharacterRange["b", "a"] → {}
/// ```
///
/// Implements calls matching
///     `CharacterRange[start_String, stop_String] := built-in[start, stop]`
pub(crate) fn CharacterRange(arguments: &SolutionSet, _original: &Atom, evaluation: &mut Evaluation)
  -> BuiltinResult
{
  let start = &arguments["start"];
  let stop  = &arguments["stop"];

  let single = |atom: &Atom| -> Option<char> {
    let mut chars = atom.as_str()?.chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => Some(c),
      _ => None
    }
  };

  let (first, last) = match (single(start), single(stop)) {
    (Some(first), Some(last)) => (first, last),
    _ => {
      evaluation.message(
        interned_static("CharacterRange"),
        MessageKind::ArgType(start.clone(), stop.clone())
      );
      return Ok(None);
    }
  };

  // Surrogate code points are not characters and are skipped.
  let characters = (first as u32..=last as u32).filter_map(char::from_u32).map(String::from);
  Ok(Some(SExpression::string_list(characters)))
}


/// The `OutputForm` text of any expression.
///
/// ```text
/// ToString[2]         → "2"
/// ToString[Plus[a, b]] → "a + b"
/// ```
///
/// Implements calls matching
///     `ToString[value_] := built-in[value]`
pub(crate) fn ToString(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  let text = arguments["value"].format(&DisplayForm::Output.into());
  Ok(Some(Atom::String(text)))
}


/// Implements calls matching
///     `StringQ[expr_] := built-in[expr]`
pub(crate) fn StringQ(arguments: &SolutionSet, _original: &Atom, _: &mut Evaluation) -> BuiltinResult {
  Ok(Some(Atom::from(arguments["expr"].is_string())))
}


pub(crate) fn register_builtins(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  let protected: Attributes = Attribute::Protected.into();

  register_builtin!(
    StringJoin,
    "StringJoin[items___]",
    Attribute::Flat + Attribute::OneIdentity + Attribute::Protected,
    builder
  );

  // Registration order is the order the rules are tried in.
  register_builtin!(StringSplit, "StringSplit[string_String]", protected, builder);
  register_builtin!(StringSplitOn, "StringSplit[string_String, sep_String]", protected, builder);
  register_builtin!(StringSplitOnEach, "StringSplit[string_String, seps_List]", protected, builder);

  register_builtin!(StringLength, "StringLength[str_]", Attribute::Listable + Attribute::Protected, builder);
  register_builtin!(Characters, "Characters[string_String]", Attribute::Listable + Attribute::Protected, builder);

  register_builtin!(
    CharacterRange,
    "CharacterRange[start_String, stop_String]",
    Attribute::ReadProtected + Attribute::Protected,
    builder
  );
  builder.message("CharacterRange", "argtype", "Arguments `1` and `2` are not both strings of length 1.");

  register_builtin!(ToString, "ToString[value_]", protected, builder);
  register_builtin!(StringQ, "StringQ[expr_]", protected, builder);

  Ok(())
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    atom::Symbol,
    built_ins::standard_registry,
    evaluate::evaluate,
  };

  fn call(head: &'static str, leaves: Vec<Atom>) -> Atom {
    SExpression::with_str_head(head, leaves)
  }

  /// Evaluates `expression` in a fresh evaluation, giving the result and the rendered messages.
  fn run(expression: Atom) -> (Atom, Vec<String>) {
    let mut evaluation = Evaluation::new(standard_registry());
    let result = evaluate(expression, &mut evaluation).unwrap();
    (result, evaluation.rendered_messages())
  }

  #[test]
  fn string_join() {
    let (result, messages) = run(call("StringJoin", vec![Atom::from("a"), Atom::from("b"), Atom::from("c")]));
    assert_eq!(result, Atom::from("abc"));
    assert!(messages.is_empty());

    let nested = call("StringJoin", vec![
      SExpression::list(vec![Atom::from("Hello"), Atom::from(" "), SExpression::string_list(["world"])]),
      Atom::from("!"),
    ]);
    assert_eq!(run(nested).0, Atom::from("Hello world!"));

    assert_eq!(run(call("StringJoin", vec![SExpression::string_list(["a", "b"])])).0, Atom::from("ab"));
    assert_eq!(run(call("StringJoin", vec![])).0, Atom::from(""));
  }

  #[test]
  fn string_join_is_flat() {
    let nested = call("StringJoin", vec![
      call("StringJoin", vec![Atom::from("a"), Symbol::from_str("x")]),
      Atom::from("c"),
    ]);
    let flat = call("StringJoin", vec![Atom::from("a"), Symbol::from_str("x"), Atom::from("c")]);

    let (nested_result, _) = run(nested);
    let (flat_result, _) = run(flat.clone());
    assert_eq!(nested_result, flat);
    assert_eq!(flat_result, flat);
  }

  #[test]
  fn string_join_soft_failure() {
    let join = call("StringJoin", vec![Atom::from("U"), Atom::from(2i64)]);
    let (result, messages) = run(join.clone());
    assert_eq!(result, join);
    assert_eq!(messages, vec!["StringJoin::string: String expected.".to_string()]);
    assert_eq!(result.format(&DisplayForm::Output.into()), "U <> 2");

    let fixed = call("StringJoin", vec![Atom::from("U"), call("ToString", vec![Atom::from(2i64)])]);
    assert_eq!(run(fixed).0, Atom::from("U2"));
  }

  #[test]
  fn string_split() {
    let (result, _) = run(call("StringSplit", vec![Atom::from("  abc    123  ")]));
    assert_eq!(result, SExpression::string_list(["abc", "123"]));

    let (result, _) = run(call("StringSplit", vec![Atom::from("abc,123"), Atom::from(",")]));
    assert_eq!(result, SExpression::string_list(["abc", "123"]));

    let (result, _) = run(call("StringSplit", vec![Atom::from("a,,b"), Atom::from(",")]));
    assert_eq!(result, SExpression::string_list(["a", "", "b"]));

    let separators = SExpression::string_list([",", "."]);
    let (result, _) = run(call("StringSplit", vec![Atom::from("abc,123.456"), separators]));
    assert_eq!(result, SExpression::string_list(["abc", "123", "456"]));
  }

  #[test]
  fn string_split_edge_cases() {
    let (result, _) = run(call("StringSplit", vec![Atom::from("abc"), Atom::from("")]));
    assert_eq!(result, SExpression::string_list(["a", "b", "c"]));

    let (result, _) = run(call("StringSplit", vec![Atom::from("   ")]));
    assert_eq!(result, SExpression::list(vec![]));

    let (result, _) = run(call("StringSplit", vec![Atom::from("a\u{1c}b\u{1f} c\u{2003}d")]));
    assert_eq!(result, SExpression::string_list(["a", "b", "c", "d"]));

    // An empty separator list leaves the string whole.
    let (result, _) = run(call("StringSplit", vec![Atom::from("a b"), SExpression::list(vec![])]));
    assert_eq!(result, SExpression::string_list(["a b"]));

    let bad = call("StringSplit", vec![Atom::from("a,b"), SExpression::list(vec![Atom::from(","), Atom::from(1i64)])]);
    let (result, messages) = run(bad.clone());
    assert_eq!(result, bad);
    assert_eq!(messages, vec!["StringSplit::string: String expected.".to_string()]);

    // No rule for a non-string subject.
    let unmatched = call("StringSplit", vec![Atom::from(5i64)]);
    let (result, messages) = run(unmatched.clone());
    assert_eq!(result, unmatched);
    assert!(messages.is_empty());
  }

  #[test]
  fn string_length() {
    assert_eq!(run(call("StringLength", vec![Atom::from("abc")])).0, Atom::from(3i64));
    assert_eq!(run(call("StringLength", vec![Atom::from("héllo")])).0, Atom::from(5i64));

    let (result, _) = run(call("StringLength", vec![SExpression::string_list(["a", "bc"])]));
    assert_eq!(result, SExpression::list(vec![Atom::from(1i64), Atom::from(2i64)]));

    let unevaluated = call("StringLength", vec![Symbol::from_str("x")]);
    let (result, messages) = run(unevaluated.clone());
    assert_eq!(result, unevaluated);
    assert_eq!(messages, vec!["StringLength::string: String expected.".to_string()]);
  }

  #[test]
  fn string_length_threads_partially() {
    let (result, messages) = run(call("StringLength", vec![
      SExpression::list(vec![Atom::from("ab"), Symbol::from_str("x")])
    ]));
    assert_eq!(
      result,
      SExpression::list(vec![Atom::from(2i64), call("StringLength", vec![Symbol::from_str("x")])])
    );
    assert_eq!(messages.len(), 1);
  }

  #[test]
  fn identical_calls_each_emit_their_message() {
    let length = call("StringLength", vec![Symbol::from_str("x")]);
    let (result, messages) = run(SExpression::list(vec![length.clone(), length.clone()]));
    assert_eq!(result, SExpression::list(vec![length.clone(), length]));
    assert_eq!(
      messages,
      vec!["StringLength::string: String expected.".to_string(); 2]
    );
  }

  #[test]
  fn evaluating_again_repeats_the_message() {
    let mut evaluation = Evaluation::new(standard_registry());
    let join = call("StringJoin", vec![Atom::from("U"), Atom::from(2i64)]);

    assert_eq!(evaluate(join.clone(), &mut evaluation).unwrap(), join);
    assert_eq!(evaluation.messages().len(), 1);
    assert_eq!(evaluate(join.clone(), &mut evaluation).unwrap(), join);
    assert_eq!(evaluation.messages().len(), 2);
  }

  #[test]
  fn characters() {
    assert_eq!(run(call("Characters", vec![Atom::from("abc")])).0, SExpression::string_list(["a", "b", "c"]));
    assert_eq!(run(call("Characters", vec![Atom::from("")])).0, SExpression::list(vec![]));

    let (result, _) = run(call("Characters", vec![SExpression::string_list(["ab", "c"])]));
    assert_eq!(
      result,
      SExpression::list(vec![SExpression::string_list(["a", "b"]), SExpression::string_list(["c"])])
    );
  }

  #[test]
  fn character_range() {
    assert_eq!(
      run(call("CharacterRange", vec![Atom::from("a"), Atom::from("e")])).0,
      SExpression::string_list(["a", "b", "c", "d", "e"])
    );
    assert_eq!(
      run(call("CharacterRange", vec![Atom::from("b"), Atom::from("a")])).0,
      SExpression::list(vec![])
    );
    assert_eq!(
      run(call("CharacterRange", vec![Atom::from("x"), Atom::from("x")])).0,
      SExpression::string_list(["x"])
    );

    let bad = call("CharacterRange", vec![Atom::from("ab"), Atom::from("c")]);
    let (result, messages) = run(bad.clone());
    assert_eq!(result, bad);
    assert_eq!(
      messages,
      vec![r#"CharacterRange::argtype: Arguments "ab" and "c" are not both strings of length 1."#.to_string()]
    );
  }

  #[test]
  fn to_string() {
    assert_eq!(run(call("ToString", vec![Atom::from(2i64)])).0, Atom::from("2"));
    assert_eq!(run(call("ToString", vec![Atom::from("abc")])).0, Atom::from("abc"));

    let plus = call("Plus", vec![Symbol::from_str("a"), Symbol::from_str("b")]);
    assert_eq!(run(call("ToString", vec![plus])).0, Atom::from("a + b"));

    let list = SExpression::list(vec![Atom::from("a"), Atom::from(1i64)]);
    assert_eq!(run(call("ToString", vec![list])).0, Atom::from("{a, 1}"));
  }

  #[test]
  fn string_q() {
    let t = Symbol::from_static_str("True");
    let f = Symbol::from_static_str("False");
    let real = Atom::Real(rug::Float::with_val(53, 1.5));

    let (result, messages) = run(call("StringQ", vec![Atom::from("abc")]));
    assert_eq!(result, t);
    assert!(messages.is_empty());

    for value in [real, Atom::from(1i64), Symbol::from_str("abc"), SExpression::string_list(["a"])] {
      let (result, messages) = run(call("StringQ", vec![value]));
      assert_eq!(result, f);
      assert!(messages.is_empty());
    }
  }
}
