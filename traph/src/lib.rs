//! Traph: declarative derivation of memoized output records.
//!
//! A transform is described by a mapping from field names to rules. Each rule is a function of
//! the input record and of the output record itself, so a field can be derived from the input,
//! from sibling fields, or both:
//!
//! ```
//! use traph::prelude::*;
//!
//! let transform = compile_transform(
//!     Rules::<Record>::new()
//!         .rule("full", |i, _| Ok(format!("{}{}", i.get("first")?, i.get("last")?).into()))
//!         .rule("formal", |i, o| {
//!             Ok(format!("{}, born {}", o.get("full")?, i.get("birth")?).into())
//!         }),
//! )
//! .unwrap();
//!
//! let input = record! { "first" => "caesar", "last" => "sol", "birth" => "1988-08-24" };
//!
//! // Lazy: nothing runs until a field is read; all fields are listed anyway.
//! let output = transform.lazy(&input);
//! assert_eq!(output.keys().collect::<Vec<_>>(), ["full", "formal"]);
//! assert!(output.evaluated_keys().is_empty());
//!
//! // Reading `formal` evaluates `full` on the way, once.
//! assert_eq!(output.get("formal").unwrap().as_str(), Some("caesarsol, born 1988-08-24"));
//! assert_eq!(output.evaluated_keys(), ["full", "formal"]);
//! ```
//!
//! Structure
//!  - [`rules`] / [`shape`]: rule mappings and their compilation into a shared [`shape::Shape`].
//!  - [`instance`]: [`instance::Output`], one input bound to a shape, with per-field memo cells.
//!  - [`input`]: the [`input::InputRecord`] trait and the validating [`input::InputView`].
//!  - [`transform`]: [`transform::Transformer`], the lazy and eager entry points.
//!  - [`typed`]: the [`derivation!`] macro for statically typed outputs.
//!
//! Evaluation is synchronous: a field is computed inside the read that first needs it.
//! Outputs can be shared between threads; a field being computed by one thread is waited
//! for by the others, so a rule still runs at most once per output. A rule that (directly or
//! through siblings) reads its own field fails with [`TraphError::CyclicDependency`].

/// Input records and the validating view rules read them through.
pub mod input;
/// Output instances and their memoized accessors.
pub mod instance;
/// Named constants (environment variables, diagnostic messages).
pub mod magic;
/// Rule mappings.
pub mod rules;
/// Rule compilation.
pub mod shape;
/// Lazy and eager evaluation entry points.
pub mod transform;
/// Statically typed derivations.
pub mod typed;
/// Configuration, diagnostics, errors and the memo cell.
pub mod utils;
/// Dynamic values.
pub mod value;

pub use transform::{Transformer, compile_transform};
pub use utils::error::{TraphError, TraphResult};

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::input::{InputRecord, InputView, record::Record};
    pub use crate::instance::Output;
    pub use crate::record;
    pub use crate::rules::Rules;
    pub use crate::transform::{Transformer, compile_transform};
    pub use crate::utils::{
        conf::{TraphConfig, ValidationMode},
        diag::Diagnostics,
        error::{TraphError, TraphResult},
    };
    pub use crate::value::Value;
}
