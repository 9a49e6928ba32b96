use std::collections::HashSet;
use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use nodescope::graph::Node;

use super::super::{SearchMatch, SearchMatchCache, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Best score over a node's name and id, matches sorted best first.
fn rank_nodes(nodes: &[Node], query: &str) -> Vec<SearchMatch> {
    let matcher = SkimMatcherV2::default();
    let mut matches = nodes
        .iter()
        .enumerate()
        .filter_map(|(node, candidate)| {
            let by_name = fuzzy_match_score(&matcher, &candidate.name, query);
            let by_id = fuzzy_match_score(&matcher, &candidate.id, query);
            let score = by_name.max(by_id)?;
            Some(SearchMatch { node, score })
        })
        .collect::<Vec<_>>();
    matches.sort_by(|a, b| b.score.cmp(&a.score).then(a.node.cmp(&b.node)));
    matches
}

impl ViewModel {
    /// Ranked matches plus their node set for the current query, or `None`
    /// when the query is blank.
    pub(in crate::app) fn search_matches(
        &mut self,
    ) -> Option<(Arc<Vec<SearchMatch>>, Arc<HashSet<usize>>)> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some((Arc::clone(&cached.matches), Arc::clone(&cached.matched)));
        }

        let matches = Arc::new(rank_nodes(&self.loaded.graph.nodes, query));
        let matched = Arc::new(matches.iter().map(|entry| entry.node).collect::<HashSet<_>>());

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
            matched: Arc::clone(&matched),
        });

        Some((matches, matched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> Node {
        Node {
            id: id.to_owned(),
            name: name.to_owned(),
            categories: Vec::new(),
            level: None,
            color: None,
            properties: None,
        }
    }

    #[test]
    fn matches_name_or_id_ignoring_case() {
        let nodes = [
            node("svc-auth", "Authentication"),
            node("db-main", "Primary Database"),
            node("cache", "Redis"),
        ];

        let by_name = rank_nodes(&nodes, "database");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].node, 1);

        let by_id = rank_nodes(&nodes, "svc");
        assert_eq!(by_id.first().map(|entry| entry.node), Some(0));

        assert!(rank_nodes(&nodes, "zzzz").is_empty());
    }
}
