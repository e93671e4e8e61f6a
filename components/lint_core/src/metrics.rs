//! Per-function metrics: statement count, cyclomatic complexity, parameter
//! count and block nesting depth.

use serde::{Deserialize, Serialize};

/// Counters for one function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    /// Statements in the body, nested ones included
    pub statements: u32,
    /// 1 plus one per decision point
    pub complexity: u32,
    /// Declared parameters
    pub parameters: u32,
}

/// A finished function as listed in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Declared or inferred name, `(anonymous)` otherwise
    pub name: String,
    /// Line of the `function` keyword
    pub line: u32,
    /// Column of the `function` keyword
    pub character: u32,
    /// Final counters
    pub metrics: FunctionMetrics,
}

#[derive(Debug)]
struct OpenFunction {
    record: FunctionRecord,
    depth: u32,
}

/// Stack of open functions. The bottom entry stands for global code and is
/// never closed.
#[derive(Debug)]
pub struct MetricsCollector {
    open: Vec<OpenFunction>,
    finished: Vec<FunctionRecord>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    /// Collector positioned in global code
    pub fn new() -> Self {
        Self {
            open: vec![OpenFunction {
                record: FunctionRecord {
                    name: "(global)".to_string(),
                    line: 0,
                    character: 0,
                    metrics: FunctionMetrics {
                        complexity: 1,
                        ..FunctionMetrics::default()
                    },
                },
                depth: 0,
            }],
            finished: Vec::new(),
        }
    }

    /// Start counting a function
    pub fn open(&mut self, name: impl Into<String>, line: u32, character: u32) {
        self.open.push(OpenFunction {
            record: FunctionRecord {
                name: name.into(),
                line,
                character,
                metrics: FunctionMetrics {
                    complexity: 1,
                    ..FunctionMetrics::default()
                },
            },
            depth: 0,
        });
    }

    /// Finish the innermost function; `None` in global code
    pub fn close(&mut self) -> Option<FunctionRecord> {
        if self.open.len() <= 1 {
            return None;
        }
        let function = self.open.pop()?;
        self.finished.push(function.record.clone());
        Some(function.record)
    }

    fn top(&mut self) -> Option<&mut OpenFunction> {
        self.open.last_mut()
    }

    /// Count one statement
    pub fn add_statement(&mut self) {
        if let Some(f) = self.top() {
            f.record.metrics.statements += 1;
        }
    }

    /// Count one decision point
    pub fn add_branch(&mut self) {
        if let Some(f) = self.top() {
            f.record.metrics.complexity += 1;
        }
    }

    /// Record the parameter count
    pub fn set_parameters(&mut self, count: u32) {
        if let Some(f) = self.top() {
            f.record.metrics.parameters = count;
        }
    }

    /// Enter a nested block; returns the new depth
    pub fn enter_block(&mut self) -> u32 {
        match self.top() {
            Some(f) => {
                f.depth += 1;
                f.depth
            }
            None => 0,
        }
    }

    /// Leave a nested block
    pub fn exit_block(&mut self) {
        if let Some(f) = self.top() {
            f.depth = f.depth.saturating_sub(1);
        }
    }

    /// Counters of the innermost function
    pub fn current(&self) -> FunctionMetrics {
        self.open
            .last()
            .map(|f| f.record.metrics)
            .unwrap_or_default()
    }

    /// Finished functions in close order
    pub fn into_records(self) -> Vec<FunctionRecord> {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_order_and_counts() {
        let mut metrics = MetricsCollector::new();
        metrics.open("outer", 1, 1);
        metrics.add_statement();
        metrics.open("inner", 2, 5);
        metrics.add_branch();
        metrics.set_parameters(2);
        let inner = metrics.close().unwrap();
        assert_eq!(inner.metrics, FunctionMetrics { statements: 0, complexity: 2, parameters: 2 });
        let outer = metrics.close().unwrap();
        assert_eq!(outer.metrics.statements, 1);
        assert_eq!(outer.metrics.complexity, 1);

        let names: Vec<_> = metrics.into_records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["inner", "outer"]);
    }

    #[test]
    fn test_global_is_never_closed() {
        let mut metrics = MetricsCollector::new();
        assert!(metrics.close().is_none());
        assert!(metrics.into_records().is_empty());
    }

    #[test]
    fn test_depth_is_per_function() {
        let mut metrics = MetricsCollector::new();
        assert_eq!(metrics.enter_block(), 1);
        metrics.open("f", 1, 1);
        assert_eq!(metrics.enter_block(), 1);
        assert_eq!(metrics.enter_block(), 2);
        metrics.exit_block();
        metrics.exit_block();
        metrics.close();
        assert_eq!(metrics.enter_block(), 2);
    }
}
