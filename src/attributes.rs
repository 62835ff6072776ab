/*!

The attributes of a function, e.g. `Flat`, `Listable`, ….

Attributes are implemented as a bitfield. The dispatcher consults them before any pattern is tried: hold attributes
first (during argument evaluation), then `Flat`, then `Listable`. `OneIdentity` is consulted only after every rule
has failed. `Protected` and `ReadProtected` are descriptive.

*/

use std::{
  ops::{Add, Index}
};
use std::iter::Sum;


use strum_macros::{Display, IntoStaticStr, EnumString, EnumIter};

#[derive(Copy, Clone, PartialEq, Eq, Display, IntoStaticStr, Debug, EnumString, EnumIter)]
#[repr(u32)]
pub enum Attribute {
  /// Associative: nested calls `f[a, f[b, c]]` are spliced into `f[a, b, c]` before matching.
  Flat = 0,
  /// If no rule applies, `f[x]` is the same as `x`.
  OneIdentity,
  /// The function should automatically be threaded over lists: `f[{a, b, c}] == {f[a], f[b], f[c]}`.
  Listable,
  Protected,
  ReadProtected,
  HoldFirst,
  HoldRest,
  HoldAll,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Attributes(pub u32);

// These exist solely to be static references, which the `Index` trait insists on requiring.
static ATTRIBUTE_SET: bool = true;
static ATTRIBUTE_UNSET: bool = false;

impl Index<Attribute> for Attributes {
  type Output = bool;

  fn index(&self, index: Attribute) -> &Self::Output {
    if self.get(index) {
      &ATTRIBUTE_SET
    } else {
      &ATTRIBUTE_UNSET
    }
  }
}

impl From<Attribute> for Attributes {
  fn from(attribute: Attribute) -> Self {
    Attributes(1u32 << attribute as u32)
  }
}

impl Attributes {
  pub fn new() -> Self {
    Attributes::default()
  }

  pub fn update(&mut self, attributes: Attributes) {
    self.0 |= attributes.0;
  }

  // region Convenience getters and setters

  pub fn get(&self, attribute: Attribute) -> bool {
    (self.0 & (1 << attribute as u32)) != 0
  }

  pub fn set(&mut self, attribute: Attribute) {
    self.0 |= 1 << attribute as u32
  }

  pub fn reset(&mut self, attribute: Attribute) {
    self.0 &= !(1 << attribute as u32)
  }

  pub fn flat(&self) -> bool {
    self.get(Attribute::Flat)
  }

  pub fn one_identity(&self) -> bool {
    self.get(Attribute::OneIdentity)
  }

  pub fn listable(&self) -> bool {
    self.get(Attribute::Listable)
  }

  pub fn protected(&self) -> bool {
    self.get(Attribute::Protected)
  }

  pub fn read_protected(&self) -> bool {
    self.get(Attribute::ReadProtected)
  }

  pub fn hold_all(&self) -> bool {
    self.get(Attribute::HoldAll)
  }

  pub fn hold_first(&self) -> bool {
    self.get(Attribute::HoldFirst)
  }

  pub fn hold_rest(&self) -> bool {
    self.get(Attribute::HoldRest)
  }

  // endregion

  /// Is the argument at (zero-based) `position` held, i.e. not evaluated before dispatch?
  pub fn holds_argument(&self, position: usize) -> bool {
    self.hold_all()
        || (position == 0 && self.hold_first())
        || (position > 0 && self.hold_rest())
  }

  /// The attributes that are set, in declaration order.
  pub fn iter(&self) -> impl Iterator<Item=Attribute> + '_ {
    use strum::IntoEnumIterator;
    Attribute::iter().filter(move |attribute| self.get(*attribute))
  }

}

// region Attribute addition implementations.

impl Sum<Attributes> for Attributes {
  fn sum<I: Iterator<Item=Attributes>>(iter: I) -> Self {
    let mut attributes: Attributes = Attributes::default();
    for a in iter{
      attributes.update(a);
    }
    attributes
  }
}

impl Add<Attribute> for Attributes {
  type Output = Self;

  fn add(mut self, other: Attribute) -> Self {
    self.set(other);
    self
  }
}


impl Add<Attributes> for Attribute {
  type Output = Attributes;

  fn add(self, mut other: Attributes) -> Self::Output {
    other.set(self);
    other
  }
}


impl Add<Attribute> for Attribute {
  type Output = Attributes;

  fn add(self, other: Attribute) -> Self::Output {
    let mut out: Attributes = self.into();
    out.set(other);
    out
  }
}

impl Add for Attributes {
  type Output = Self;

  fn add(mut self, other: Self) -> Self {
    self.update(other);
    self
  }
}

// endregion
