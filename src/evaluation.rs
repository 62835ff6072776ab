/*!

An `Evaluation` is the mutable state of one evaluation: the messages emitted so far, the recursion depth, the
limits, and the values bound to user symbols. It borrows the registry it dispatches against. The registry is shared,
the `Evaluation` is not: concurrent evaluations each own their own.

*/

use std::{
  error::Error,
  fmt::{Display, Formatter}
};

use fnv::FnvHashMap;

use crate::{
  atom::Atom,
  interner::{interned, InternedString, resolve_str},
  logging::{log, verbosity_is_at_least, Channel},
  message::{Message, MessageKind},
  registry::Registry,
};


#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EvaluationSettings {
  /// How deeply `evaluate` may recurse.
  pub recursion_limit: usize,
  /// How many times one expression may be rewritten before it is considered to be looping.
  pub iteration_limit: usize,
}

impl Default for EvaluationSettings {
  fn default() -> Self {
    EvaluationSettings {
      recursion_limit: 256,
      iteration_limit: 1024,
    }
  }
}


/// Fatal conditions. Unlike messages, these abort the evaluation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EvaluationError {
  RecursionLimit(usize),
  IterationLimit(usize),
}

impl Display for EvaluationError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      EvaluationError::RecursionLimit(limit) => write!(f, "Recursion depth of {} exceeded.", limit),
      EvaluationError::IterationLimit(limit) => write!(f, "Iteration limit of {} exceeded.", limit),
    }
  }
}

impl Error for EvaluationError {}


pub struct Evaluation<'r> {
  registry  : &'r Registry,
  settings  : EvaluationSettings,
  messages  : Vec<Message>,
  depth     : usize,
  own_values: FnvHashMap<InternedString, Atom>,
  /// Element calls the current threaded dispatch left unevaluated.
  unevaluated: Vec<Atom>,
}

impl<'r> Evaluation<'r> {
  pub fn new(registry: &'r Registry) -> Self {
    Evaluation::with_settings(registry, EvaluationSettings::default())
  }

  pub fn with_settings(registry: &'r Registry, settings: EvaluationSettings) -> Self {
    Evaluation {
      registry,
      settings,
      messages  : Vec::new(),
      depth     : 0,
      own_values: FnvHashMap::default(),
      unevaluated: Vec::new(),
    }
  }

  pub fn registry(&self) -> &'r Registry {
    self.registry
  }

  pub fn settings(&self) -> &EvaluationSettings {
    &self.settings
  }

  // region Messages

  /// Records a message. Never fails and never interrupts the caller. The message is only rendered for the log when
  /// the verbosity asks for it.
  pub fn message(&mut self, symbol: InternedString, kind: MessageKind) {
    let message = Message::new(symbol, kind);
    if verbosity_is_at_least(2) {
      log(Channel::Notice, 2, message.render(self.registry).as_str());
    }
    self.messages.push(message);
  }

  pub fn messages(&self) -> &[Message] {
    &self.messages
  }

  pub fn take_messages(&mut self) -> Vec<Message> {
    std::mem::take(&mut self.messages)
  }

  /// The messages as text, in the order they were emitted.
  pub fn rendered_messages(&self) -> Vec<String> {
    self.messages.iter().map(|m| m.render(self.registry)).collect()
  }

  // endregion

  // region Own values

  /// Binds `name` to `value` for the rest of this evaluation.
  pub fn set_own_value(&mut self, name: &str, value: Atom) {
    self.own_values.insert(interned(name), value);
  }

  pub fn own_value(&self, name: InternedString) -> Option<&Atom> {
    self.own_values.get(&name)
  }

  // endregion

  // region Bookkeeping for `evaluate`

  pub fn depth(&self) -> usize {
    self.depth
  }

  pub(crate) fn enter(&mut self) -> Result<(), EvaluationError> {
    if self.depth >= self.settings.recursion_limit {
      log(
        Channel::Error,
        1,
        format!("Recursion depth of {} exceeded.", self.settings.recursion_limit).as_str()
      );
      return Err(EvaluationError::RecursionLimit(self.settings.recursion_limit));
    }
    self.depth += 1;
    Ok(())
  }

  pub(crate) fn exit(&mut self) {
    self.depth = self.depth.saturating_sub(1);
  }

  pub(crate) fn note_unevaluated(&mut self, call: &Atom) {
    self.unevaluated.push(call.clone());
  }

  pub(crate) fn take_unevaluated(&mut self) -> Vec<Atom> {
    std::mem::take(&mut self.unevaluated)
  }

  /// Puts back `outer` and gives the calls noted since it was taken.
  pub(crate) fn restore_unevaluated(&mut self, outer: Vec<Atom>) -> Vec<Atom> {
    std::mem::replace(&mut self.unevaluated, outer)
  }

  // endregion
}

impl<'r> std::fmt::Debug for Evaluation<'r> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let own_values: Vec<String> = self.own_values
                                      .iter()
                                      .map(|(name, value)| format!("{}→{}", resolve_str(*name), value))
                                      .collect();
    f.debug_struct("Evaluation")
     .field("settings", &self.settings)
     .field("messages", &self.messages)
     .field("depth", &self.depth)
     .field("own_values", &own_values)
     .finish()
  }
}
