//! Cycle detection over template partial references

use crate::diagnostics::{Defect, DefectKind};
use assist_core::ast::TemplatePartial;
use std::collections::{HashMap, HashSet};

/// Find every cycle among partial references.
///
/// `index` maps partial ids to their position in `partials`. References to
/// undeclared partials are ignored here; they are reported separately.
pub fn find_partial_cycles(
    partials: &[TemplatePartial],
    index: &HashMap<String, usize>,
) -> Vec<Defect> {
    // DFS with a recursion stack; a reference back into the stack closes a cycle
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();
    let mut defects = Vec::new();

    fn dfs<'a>(
        partial_id: &'a str,
        partials: &'a [TemplatePartial],
        index: &HashMap<String, usize>,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        defects: &mut Vec<Defect>,
    ) {
        visited.insert(partial_id);
        rec_stack.insert(partial_id);
        path.push(partial_id);

        if let Some(&pos) = index.get(partial_id) {
            for next in partials[pos].content.partial_refs() {
                if rec_stack.contains(next) {
                    let start = path.iter().position(|p| *p == next).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(next);
                    defects.push(Defect::new(
                        DefectKind::CyclicPartialReference,
                        format!("partials/{}", partial_id),
                        format!("partials include each other: {}", cycle.join(" -> ")),
                    ));
                } else if !visited.contains(next) {
                    dfs(next, partials, index, visited, rec_stack, path, defects);
                }
            }
        }

        path.pop();
        rec_stack.remove(partial_id);
    }

    for partial in partials {
        if !visited.contains(partial.id.as_str()) {
            dfs(
                &partial.id,
                partials,
                index,
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut defects,
            );
        }
    }

    defects
}

#[cfg(test)]
mod tests {
    use super::*;
    use assist_core::ast::TemplateNode;

    fn partial(id: &str, refs: &[&str]) -> TemplatePartial {
        let nodes: Vec<TemplateNode> = refs.iter().map(|r| TemplateNode::insert_partial(*r)).collect();
        TemplatePartial::new(id, nodes)
    }

    fn index_of(partials: &[TemplatePartial]) -> HashMap<String, usize> {
        partials
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect()
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let partials = vec![partial("a", &["b"]), partial("b", &["c"]), partial("c", &[])];
        assert!(find_partial_cycles(&partials, &index_of(&partials)).is_empty());
    }

    #[test]
    fn test_shared_child_is_not_a_cycle() {
        let partials = vec![partial("a", &["c"]), partial("b", &["c"]), partial("c", &[])];
        assert!(find_partial_cycles(&partials, &index_of(&partials)).is_empty());
    }

    #[test]
    fn test_self_reference() {
        let partials = vec![partial("a", &["a"])];
        let defects = find_partial_cycles(&partials, &index_of(&partials));
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].kind, DefectKind::CyclicPartialReference);
        assert!(defects[0].reason.contains("a -> a"));
    }

    #[test]
    fn test_indirect_cycle_reports_path() {
        let partials = vec![partial("a", &["b"]), partial("b", &["c"]), partial("c", &["a"])];
        let defects = find_partial_cycles(&partials, &index_of(&partials));
        assert_eq!(defects.len(), 1);
        assert_eq!(defects[0].location, "partials/c");
        assert!(defects[0].reason.contains("a -> b -> c -> a"));
    }

    #[test]
    fn test_missing_partial_ignored() {
        let partials = vec![partial("a", &["ghost"])];
        assert!(find_partial_cycles(&partials, &index_of(&partials)).is_empty());
    }
}
