//! Ordered execution of post-processors against one environment.
//!
//! Responsibilities:
//! - Keep processors sorted by their order, ascending.
//! - Run every processor exactly once against the same environment.
//!
//! Does NOT handle:
//! - Building indices or resolving secrets (see `secrets.rs`).
//!
//! Invariants:
//! - Processors sharing an order run in insertion order.
//! - The first failing processor stops the chain; later stages do not run.

use super::{
    Application, ConfigDataEnvironmentPostProcessor, EnvironmentConfigDataSecretsPostProcessor,
    EnvironmentPostProcessor, EnvironmentSuffixSecretsPostProcessor,
    FilenameConfigDataSecretsPostProcessor, FilenameSecretsPostProcessor,
};
use crate::environment::Environment;
use crate::error::SecretsError;

/// Post-processors sorted by ascending order.
///
/// Processors sharing an order keep their insertion order.
#[derive(Debug, Default)]
pub struct PostProcessorChain {
    processors: Vec<Box<dyn EnvironmentPostProcessor>>,
}

impl PostProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The config-data stage followed by the four secrets stages.
    pub fn with_defaults() -> Self {
        Self::new()
            .add(EnvironmentSuffixSecretsPostProcessor)
            .add(EnvironmentConfigDataSecretsPostProcessor)
            .add(FilenameConfigDataSecretsPostProcessor)
            .add(FilenameSecretsPostProcessor)
            .add(ConfigDataEnvironmentPostProcessor)
    }

    pub fn add(mut self, processor: impl EnvironmentPostProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self.processors.sort_by_key(|processor| processor.order());
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|processor| processor.name()).collect()
    }

    pub fn orders(&self) -> Vec<i32> {
        self.processors.iter().map(|processor| processor.order()).collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every processor once, stopping at the first failure.
    pub fn run(&self, environment: &mut Environment, application: &Application) -> Result<(), SecretsError> {
        for processor in &self.processors {
            tracing::debug!(
                processor = processor.name(),
                order = processor.order(),
                "Running environment post-processor"
            );
            processor.post_process_environment(environment, application)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        name: &'static str,
        order: i32,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl EnvironmentPostProcessor for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn post_process_environment(
            &self,
            _environment: &mut Environment,
            _application: &Application,
        ) -> Result<(), SecretsError> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }
    }

    #[test]
    fn test_defaults_are_sorted() {
        let chain = PostProcessorChain::with_defaults();
        assert_eq!(
            chain.names(),
            vec![
                "config-data",
                "filename",
                "filename-config-data",
                "environment-config-data",
                "environment-suffix"
            ]
        );
        let orders = chain.orders();
        assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_equal_orders_keep_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let recording = |name, order| Recording {
            name,
            order,
            log: Rc::clone(&log),
        };
        let chain = PostProcessorChain::new()
            .add(recording("late", 10))
            .add(recording("first", 0))
            .add(recording("second", 0));

        chain
            .run(&mut Environment::new(), &Application::new())
            .unwrap();

        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }
}
