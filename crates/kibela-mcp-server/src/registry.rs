use std::collections::HashMap;

use rmcp::model::Tool;

use crate::errors::ServerError;
use crate::operations::{Operation, Validation, kibela_operations};

/// The ordered set of tools served to clients, indexed by name
pub struct ToolRegistry {
    operations: Vec<Operation>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// The Kibela tool catalog.
    ///
    /// With `strict` set, every tool validates its required arguments
    /// regardless of its own declaration.
    pub fn kibela(strict: bool) -> Result<Self, ServerError> {
        let operations = kibela_operations().into_iter().map(|operation| {
            if strict {
                operation.with_validation(Validation::Strict)
            } else {
                operation
            }
        });
        Self::from_operations(operations)
    }

    pub fn from_operations(
        operations: impl IntoIterator<Item = Operation>,
    ) -> Result<Self, ServerError> {
        let operations: Vec<Operation> = operations.into_iter().collect();
        let mut index = HashMap::with_capacity(operations.len());

        for (position, operation) in operations.iter().enumerate() {
            let declared = operation.properties();
            if let Some(missing) = operation
                .required_arguments()
                .find(|name| !declared.is_some_and(|properties| properties.contains_key(*name)))
            {
                return Err(ServerError::ToolDeclaration {
                    tool: operation.name().to_string(),
                    reason: format!("required argument {missing} is not a declared property"),
                });
            }

            if index
                .insert(operation.name().to_string(), position)
                .is_some()
            {
                return Err(ServerError::ToolDeclaration {
                    tool: operation.name().to_string(),
                    reason: "tool is declared more than once".to_string(),
                });
            }
        }

        Ok(Self { operations, index })
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.operations
            .iter()
            .map(|operation| operation.tool().clone())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<&Operation> {
        self.index
            .get(name)
            .and_then(|position| self.operations.get(*position))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
