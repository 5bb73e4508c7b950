//! Basic lexical search over the store's own full-text index.

use tracing::debug;

use reelrank_protocols::{Catalog, RankingError, ScoredCandidate, SignalBreakdown};

use crate::fusion::sort_by_score;

/// Rank by store relevance alone.
///
/// Every match the store returns is passed through, re-sorted by relevance
/// (descending, ties in store order). No fusion and no top-K cut.
pub async fn basic_search(
    catalog: &dyn Catalog,
    query: &str,
) -> Result<Vec<ScoredCandidate>, RankingError> {
    let query = validate_query(query)?;

    let matches = catalog.text_search(query).await?;
    let mut results: Vec<ScoredCandidate> = matches
        .into_iter()
        .map(|(item, relevance)| {
            let signals = SignalBreakdown {
                text_relevance: Some(relevance),
                ..Default::default()
            };
            ScoredCandidate::new(item, relevance, signals)
        })
        .collect();
    sort_by_score(&mut results);

    debug!("Basic search for '{}' matched {} items", query, results.len());
    Ok(results)
}

/// Trimmed query, or a validation error when nothing is left.
pub(crate) fn validate_query(query: &str) -> Result<&str, RankingError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(RankingError::Validation("query missing".to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockCatalog;
    use reelrank_protocols::Item;

    #[tokio::test]
    async fn test_empty_query_skips_store() {
        let catalog = MockCatalog::new(vec![]);
        for query in ["", "   ", "\t\n"] {
            let result = basic_search(&catalog, query).await;
            assert!(matches!(result, Err(RankingError::Validation(_))));
        }
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resorts_by_relevance() {
        let catalog = MockCatalog::new(vec![]).with_search_results(vec![
            (Item::new("a", "A"), 1.0),
            (Item::new("b", "B"), 3.0),
            (Item::new("c", "C"), 1.0),
            (Item::new("d", "D"), 2.0),
        ]);

        let results = basic_search(&catalog, "anything").await.unwrap();
        let ids: Vec<&str> = results.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
        assert_eq!(results[0].signals.text_relevance, Some(3.0));
        assert!(results[0].signals.semantic.is_none());
    }

    #[tokio::test]
    async fn test_no_top_k_truncation() {
        let matches = (0..25)
            .map(|i| (Item::new(i.to_string(), "Alien"), i as f32))
            .collect();
        let catalog = MockCatalog::new(vec![]).with_search_results(matches);

        let results = basic_search(&catalog, "alien").await.unwrap();
        assert_eq!(results.len(), 25);
    }

    #[tokio::test]
    async fn test_store_failure_is_dependency_error() {
        let catalog = MockCatalog::failing();
        let result = basic_search(&catalog, "alien").await;
        assert!(matches!(result, Err(RankingError::Dependency(_))));
    }
}
