/*!
A global dictionary of interned strings. Provides an abstraction API for any interner library.

The interner sits behind an `RwLock` so that symbols can be created and resolved from any thread. Lookups of
already-interned strings only take the read lock.

*/

use std::sync::RwLock;

use lazy_static::lazy_static;
use string_interner::{
  StringInterner as DefaultStringInterner,
  symbol::SymbolU32
};

pub type InternedString = SymbolU32;

lazy_static! {
  static ref STRING_INTERNER: RwLock<DefaultStringInterner> = RwLock::new(DefaultStringInterner::default());
}


pub fn interned(string: &str) -> InternedString {
  if let Some(symbol) = get_interned(string) {
    return symbol;
  }
  let mut interner = STRING_INTERNER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
  interner.get_or_intern(string)
}


pub fn interned_static(string: &'static str) -> InternedString {
  if let Some(symbol) = get_interned(string) {
    return symbol;
  }
  let mut interner = STRING_INTERNER.write().unwrap_or_else(|poisoned| poisoned.into_inner());
  interner.get_or_intern_static(string)
}


pub fn get_interned(string: &str) -> Option<InternedString> {
  let interner = STRING_INTERNER.read().unwrap_or_else(|poisoned| poisoned.into_inner());
  interner.get(string)
}

/// Every `InternedString` handed out by this module resolves, so a failed resolution is a bug.
pub fn resolve_str(symbol: InternedString) -> String {
  match resolve_str_checked(symbol) {
    Some(string) => string,
    None => unreachable!("Tried to resolve a symbol that was never interned. This is a bug.")
  }
}

pub fn resolve_str_checked(symbol: InternedString) -> Option<String> {
  let interner = STRING_INTERNER.read().unwrap_or_else(|poisoned| poisoned.into_inner());
  interner.resolve(symbol).map(str::to_string)
}
