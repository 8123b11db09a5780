//! Statically typed derivations.
//!
//! [`derivation!`](crate::derivation) declares an output struct over a typed input. Each
//! derived field has a fixed type and a rule `fn(&Input, &Output) -> TraphResult<FieldType>`;
//! the generated accessor of the same name memoizes it through the same cell as the dynamic
//! engine. Since rules read the input through its own fields, a rule reading an input field
//! that does not exist is a compile error rather than a runtime one.
//!
//! ```
//! pub struct Person {
//!     first: String,
//!     last: String,
//!     birth: String,
//! }
//!
//! traph::derivation! {
//!     /// Derived view of a [`Person`].
//!     pub struct PersonView<'p> from Person {
//!         full: String = |i, _| Ok(format!("{}{}", i.first, i.last)),
//!         formal: String = |i, o| Ok(format!("{}, born {}", o.full()?, i.birth)),
//!     }
//! }
//!
//! let person = Person {
//!     first: "caesar".into(),
//!     last: "sol".into(),
//!     birth: "1988-08-24".into(),
//! };
//!
//! let view = PersonView::lazy(&person);
//! assert!(view.evaluated_keys().is_empty());
//! assert_eq!(view.formal().unwrap(), "caesarsol, born 1988-08-24");
//! assert_eq!(view.evaluated_keys(), ["full", "formal"]);
//! ```
//!
//! The generated struct stores the input under `input` and provides `lazy`, `eager`,
//! `materialize`, `input` and `evaluated_keys`, plus the `FIELDS` constant; derived fields
//! must not reuse those names.

/// Declare a typed derivation. See the [module documentation](crate::typed).
#[macro_export]
macro_rules! derivation {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident<$lt:lifetime> from $input:ty {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $fty:ty = $rule:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name<$lt> {
            input: &$lt $input,
            $(
                $field: $crate::utils::lazy::MemoSlot<$fty>,
            )*
        }

        #[allow(dead_code)]
        impl<$lt> $name<$lt> {
            /// Names of the derived fields, in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Bind `input` without evaluating anything.
            pub fn lazy(input: &$lt $input) -> Self {
                Self {
                    input,
                    $(
                        $field: $crate::utils::lazy::MemoSlot::new(),
                    )*
                }
            }

            /// Bind `input` and evaluate every field, in declaration order.
            pub fn eager(input: &$lt $input) -> $crate::TraphResult<Self> {
                let output = Self::lazy(input);
                output.materialize()?;
                Ok(output)
            }

            /// Force every field, stopping at the first failure.
            pub fn materialize(&self) -> $crate::TraphResult<()> {
                $(
                    self.$field()?;
                )*
                Ok(())
            }

            pub fn input(&self) -> &$lt $input {
                self.input
            }

            /// Names of the fields evaluated so far, in declaration order.
            pub fn evaluated_keys(&self) -> ::std::vec::Vec<&'static str> {
                #[allow(unused_mut)]
                let mut keys = ::std::vec::Vec::new();
                $(
                    if self.$field.is_evaluated() {
                        keys.push(stringify!($field));
                    }
                )*
                keys
            }

            $(
                $(#[$field_meta])*
                pub fn $field(&self) -> $crate::TraphResult<&$fty> {
                    self.$field.get_or_evaluate(stringify!($field), || {
                        let rule: fn(&$input, &Self) -> $crate::TraphResult<$fty> = $rule;
                        rule(self.input, self)
                    })
                }
            )*
        }
    };
}
