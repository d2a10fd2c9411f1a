//! Explain output
//!
//! Describes the stages a query will run, in execution order, without
//! touching any data.

use std::fmt;

use serde::Serialize;

use super::ast::{Criterion, JoinSpec, LimitSpec, SortSpec};

/// Deterministic description of a configured query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainPlan {
    /// Number of records in the source collection
    pub collection_size: usize,
    /// Stages in execution order
    pub stages: Vec<String>,
}

impl ExplainPlan {
    pub fn new(
        collection_size: usize,
        joins: &[JoinSpec],
        criteria: &[Criterion],
        limit: Option<&LimitSpec>,
        sort: Option<&SortSpec>,
        sort_before_limit: bool,
    ) -> Self {
        let mut stages = Vec::new();

        for join in joins {
            stages.push(format!(
                "JOIN {} ON {} = {}.{}",
                join.attach_as, join.parent_key, join.attach_as, join.foreign_key
            ));
        }

        for criterion in criteria {
            let mut line = format!(
                "FILTER {} {} {}",
                criterion.key.path(),
                criterion.operator,
                criterion.value
            );
            if let Some(format) = &criterion.date_format {
                line.push_str(&format!(" FORMAT {}", format));
            }
            stages.push(line);
            if let Some(alias) = criterion.key.alias() {
                stages.push(format!("ALIAS {} AS {}", criterion.key.path(), alias));
            }
        }

        let limit_line = limit.map(|l| format!("LIMIT {} OFFSET {}", l.length, l.offset));
        let sort_line = sort.map(|s| {
            let mut line = format!("SORT {} {}", s.key.path(), s.order);
            if let Some(format) = &s.date_format {
                line.push_str(&format!(" FORMAT {}", format));
            }
            line
        });

        if sort_before_limit {
            stages.extend(sort_line);
            stages.extend(limit_line);
        } else {
            stages.extend(limit_line);
            stages.extend(sort_line);
        }

        Self {
            collection_size,
            stages,
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Collection: {} records", self.collection_size)?;
        if self.stages.is_empty() {
            writeln!(f, "Stages: none (full scan)")?;
        } else {
            writeln!(f, "Stages:")?;
            for (i, stage) in self.stages.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, stage)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;
    use serde_json::json;

    #[test]
    fn test_stage_order_limit_then_sort() {
        let criteria = vec![Criterion::new("company.name as c", Operator::Eq, json!("x"))];
        let plan = ExplainPlan::new(
            10,
            &[],
            &criteria,
            Some(&LimitSpec { offset: 0, length: 3 }),
            Some(&SortSpec::desc("id")),
            false,
        );

        assert_eq!(
            plan.stages,
            vec![
                "FILTER company.name = \"x\"".to_string(),
                "ALIAS company.name AS c".to_string(),
                "LIMIT 3 OFFSET 0".to_string(),
                "SORT id DESC".to_string(),
            ]
        );
    }

    #[test]
    fn test_sort_before_limit() {
        let plan = ExplainPlan::new(
            10,
            &[],
            &[],
            Some(&LimitSpec { offset: 1, length: 2 }),
            Some(&SortSpec::asc("id")),
            true,
        );
        assert_eq!(plan.stages[0], "SORT id ASC");
        assert_eq!(plan.stages[1], "LIMIT 2 OFFSET 1");
    }

    #[test]
    fn test_display() {
        let plan = ExplainPlan::new(4, &[], &[], None, None, false);
        let out = plan.to_string();
        assert!(out.contains("=== EXPLAIN PLAN ==="));
        assert!(out.contains("Collection: 4 records"));
        assert!(out.contains("full scan"));
    }
}
