/*!

Global control over diagnostic logging.

Messages are tagged with a `Channel` and a verbosity level. A message is only emitted if the global verbosity is at
least the message's level. Level 0 is off. Level 1 is "normal" enabled. Level 4 gives dispatch progress. Level 5
gives matching progress. Level n includes all messages in levels m < n.

Note that these are *developer* diagnostics. Messages meant for the user of the evaluator, like "String expected.",
go through the message channel of the `Evaluation` instead.

*/

use std::{
  io::{Stdout, stdout, Write},
  sync::{
    atomic::{AtomicI32, Ordering},
    Mutex
  }
};

use lazy_static::lazy_static;
use strum_macros::{Display, IntoStaticStr};
use yansi::Paint;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, IntoStaticStr)]
pub enum Channel {
  Critical,
  Error,
  Warning,
  Notice,
  Info,
  Debug,
}

static VERBOSITY: AtomicI32 = AtomicI32::new(0);

lazy_static! {
  static ref VERBOSE_STREAM: Mutex<Stdout> = Mutex::new(stdout());
}

pub fn set_verbosity(new_value: i32) {
  VERBOSITY.store(new_value, Ordering::Relaxed);
}

pub fn get_verbosity() -> i32 {
  VERBOSITY.load(Ordering::Relaxed)
}

pub(crate) fn verbosity_is_at_least(level: i32) -> bool {
  get_verbosity() >= level
}

fn colored_prefix(channel: Channel) -> String {
  let name: &'static str = channel.into();
  match channel {
    Channel::Critical => Paint::red(name).bold().to_string(),
    Channel::Error    => Paint::red(name).to_string(),
    Channel::Warning  => Paint::yellow(name).to_string(),
    Channel::Notice   => Paint::cyan(name).to_string(),
    Channel::Info     => Paint::green(name).to_string(),
    Channel::Debug    => Paint::blue(name).to_string(),
  }
}

pub(crate) fn verbose_emit(msg: &str) {
  if let Ok(mut stream) = VERBOSE_STREAM.lock() {
    let _ = stream.write(msg.as_bytes());
    let _ = stream.write("\n".as_bytes());
  }
}

/// Only emits a message if the verbosity level is at least `level`.
pub fn log(channel: Channel, level: i32, msg: &str) {
  if verbosity_is_at_least(level) {
    verbose_emit(format!("{}: {}", colored_prefix(channel), msg).as_str());
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn channel_names() {
    let name: &'static str = Channel::Debug.into();
    assert_eq!(name, "Debug");
    assert_eq!(Channel::Error.to_string(), "Error");
  }

  #[test]
  fn verbosity_gates_levels() {
    let previous = get_verbosity();
    set_verbosity(2);
    assert!(verbosity_is_at_least(1));
    assert!(verbosity_is_at_least(2));
    assert!(!verbosity_is_at_least(3));
    set_verbosity(previous);
  }
}
