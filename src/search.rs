use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::engine::NodePoint;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Indices of node points whose theme or cluster fuzzy-matches `query`, best match first.
pub fn search_themes(nodes: &[NodePoint], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = nodes
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let theme = fuzzy_match_score(&matcher, &node.theme, query);
            let cluster = fuzzy_match_score(&matcher, &node.cluster, query);
            theme.max(cluster).map(|score| (score, index))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().map(|(_score, index)| index).collect()
}
