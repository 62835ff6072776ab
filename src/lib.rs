/*!

Attribute-driven, pattern-based dispatch of built-in functions over symbolic expressions.

An expression is an `Atom`: a string, number, or symbol, or an S-expression `head[leaves…]`. A `Registry` maps head
symbols to attributes (`Flat`, `Listable`, …) and to an ordered list of rules, each a compiled `Pattern` paired
with a native function. `dispatch` applies the attributes of a call's head to its arguments, tries the head's
rules in order, and invokes the first whose pattern matches. `evaluate` drives dispatch to a fixed point.

Built-ins never fail on bad input. They emit a `Message` into the `Evaluation` and leave the call unevaluated.

```ignore
use loris_dispatch::{evaluate, standard_registry, Atom, Evaluation, SExpression};

let mut evaluation = Evaluation::new(standard_registry());
let call = SExpression::with_str_head("StringLength", vec![SExpression::string_list(["a", "bc"])]);
assert_eq!(evaluate(call, &mut evaluation)?, SExpression::list(vec![Atom::from(1i64), Atom::from(2i64)]));
```

*/

mod atom;
mod attributes;
mod built_ins;
mod dispatch;
mod evaluate;
mod evaluation;
mod format;
mod interner;
mod matching;
mod message;
mod registry;
pub mod logging;

pub use atom::{Atom, AtomKind, SExpression, Symbol};
pub use attributes::{Attribute, Attributes};
pub use built_ins::{build_standard_registry, register_builtins, standard_registry};
pub use dispatch::{dispatch, flatten, preprocess, Outcome, Preprocessed};
pub use evaluate::evaluate;
pub use evaluation::{Evaluation, EvaluationError, EvaluationSettings};
pub use format::{DisplayForm, ExpressionFormatter, Formattable};
pub use interner::{interned, resolve_str, InternedString};
pub use logging::set_verbosity;
pub use matching::{Binding, Pattern, Slot, SolutionSet};
pub use message::{Message, MessageKind};
pub use registry::{BuiltinFn, BuiltinResult, Registry, RegistryBuilder, RegistryEntry, RegistryError, Rule};
