use schemalens_catalog::NamedObjectKey;
use schemalens_core::{Finding, Severity};

use super::{join_names, LintContext, LintError, Linter};
use crate::graph::TableGraph;

/// Reports every group of tables whose foreign keys form a cycle
///
/// One finding per strongly connected component of the relationship graph,
/// naming its tables in full-name order. A table referencing only itself is not
/// a cycle. The graph holds only the tables still in the catalog that pass the
/// table rule, so every reported table passes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableCycles;

impl Linter for TableCycles {
    fn id(&self) -> &'static str {
        "table_cycles"
    }

    fn summary(&self) -> &'static str {
        "cycles in table relationships"
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let graph = TableGraph::from_tables(ctx.tables());

        Ok(graph
            .cycles()
            .into_iter()
            .map(|cycle| {
                ctx.catalog_finding(self.summary())
                    .with_value(join_names(cycle.iter().map(NamedObjectKey::to_string)))
            })
            .collect())
    }
}
