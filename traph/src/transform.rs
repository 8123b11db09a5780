use std::sync::Arc;

use log::debug;

use crate::{
    input::InputRecord,
    instance::Output,
    rules::Rules,
    shape::Shape,
    utils::{conf::TraphConfig, diag::Diagnostics, error::TraphResult},
    value::Value,
};

/// Compiled transform: turns input records into derived outputs.
///
/// The shape is compiled once and shared by every output; each call to [`Transformer::lazy`]
/// or [`Transformer::apply`] binds a fresh, isolated output.
pub struct Transformer<I, V = Value> {
    shape: Arc<Shape<I, V>>,
    config: TraphConfig,
    diagnostics: Arc<Diagnostics>,
}

/// Compile `rules` into a [`Transformer`] with the default configuration.
///
/// ```
/// use traph::prelude::*;
///
/// let transform = compile_transform(
///     Rules::<Record>::new()
///         .rule("a", |i, _| Ok(i.get("x")?.clone()))
///         .rule("b", |_, o| Ok(Value::Int(o.get("a")?.as_int().unwrap_or(0) + 1))),
/// )
/// .unwrap();
///
/// let input = record! { "x" => 5 };
/// let output = transform.apply(&input).unwrap();
/// assert_eq!(output.get("b").unwrap(), &Value::Int(6));
/// ```
pub fn compile_transform<I: InputRecord, V>(rules: Rules<I, V>) -> TraphResult<Transformer<I, V>> {
    Transformer::new(rules)
}

impl<I: InputRecord, V> Transformer<I, V> {
    pub fn new(rules: Rules<I, V>) -> TraphResult<Self> {
        Self::with_config(rules, TraphConfig::default())
    }

    /// Like [`Transformer::new`], with the configuration read by [`TraphConfig::from_env`].
    pub fn from_env(rules: Rules<I, V>) -> TraphResult<Self> {
        Self::with_config(rules, TraphConfig::from_env()?)
    }

    pub fn with_config(rules: Rules<I, V>, config: TraphConfig) -> TraphResult<Self> {
        let shape = Arc::new(Shape::compile(rules)?);
        debug!(
            "Created transformer over {} field(s), validation {}",
            shape.len(),
            config.validation
        );

        Ok(Transformer {
            shape,
            config,
            diagnostics: Diagnostics::global(),
        })
    }

    /// Replace the diagnostics sink (the process-wide one by default).
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Bind `input` without evaluating anything.
    pub fn lazy<'a>(&self, input: &'a I) -> Output<'a, I, V> {
        Output::bind(
            Arc::clone(&self.shape),
            input,
            self.config.validation,
            &self.diagnostics,
        )
    }

    /// Bind `input` and evaluate every field, in definition order.
    ///
    /// The first rule failure is returned as is and the remaining fields are not forced.
    pub fn apply<'a>(&self, input: &'a I) -> TraphResult<Output<'a, I, V>> {
        let output = self.lazy(input);
        output.materialize()?;
        Ok(output)
    }
}

impl<I, V> Transformer<I, V> {
    pub fn shape(&self) -> &Arc<Shape<I, V>> {
        &self.shape
    }

    pub fn config(&self) -> &TraphConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Field names of every output, in definition order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.shape.field_names()
    }
}

impl<I, V> Clone for Transformer<I, V> {
    fn clone(&self) -> Self {
        Self {
            shape: Arc::clone(&self.shape),
            config: self.config.clone(),
            diagnostics: Arc::clone(&self.diagnostics),
        }
    }
}
