use crate::types::{AggregateResult, PeerOutcome, RequestId};

/// Assemble the reply to a task from the outcomes collected for it.
///
/// `outcomes` must already be in peer registry order; it is kept as is.
pub fn aggregate(request_id: RequestId, node: &str, outcomes: Vec<PeerOutcome>) -> AggregateResult {
    AggregateResult {
        request_id,
        node: node.to_string(),
        aggregated_results: outcomes,
    }
}

/// Put `(peer index, outcome)` pairs back into registry order.
///
/// Used by the dispatcher, which collects outcomes in completion order.
/// Each index in `0..peer_count` must appear exactly once; a missing slot
/// is reported as a failure outcome so every peer still has an entry.
pub fn order_outcomes(peer_count: usize, completed: Vec<(usize, PeerOutcome)>) -> Vec<PeerOutcome> {
    let mut slots: Vec<Option<PeerOutcome>> = vec![None; peer_count];
    for (idx, outcome) in completed {
        if let Some(slot) = slots.get_mut(idx) {
            *slot = Some(outcome);
        }
    }
    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| PeerOutcome::failure("no outcome recorded for peer")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubtaskResponse;

    fn ok(s: &str) -> PeerOutcome {
        PeerOutcome::Success(SubtaskResponse {
            processed: s.to_string(),
            request_id: RequestId("r".to_string()),
        })
    }

    #[test]
    fn test_aggregate_keeps_order_and_all_failures() {
        let id = RequestId::new();
        let result = aggregate(
            id.clone(),
            "http://localhost:3000",
            vec![PeerOutcome::failure("a"), PeerOutcome::failure("b")],
        );

        assert_eq!(result.request_id, id);
        assert_eq!(result.node, "http://localhost:3000");
        assert_eq!(result.aggregated_results.len(), 2);
        assert_eq!(result.aggregated_results[0].error(), Some("a"));
        assert_eq!(result.aggregated_results[1].error(), Some("b"));
    }

    #[test]
    fn test_aggregate_empty() {
        let result = aggregate(RequestId::new(), "n", vec![]);
        assert!(result.aggregated_results.is_empty());
    }

    #[test]
    fn test_order_outcomes_restores_registry_order() {
        let completed = vec![(2, ok("C")), (0, ok("A")), (1, PeerOutcome::failure("B down"))];
        let ordered = order_outcomes(3, completed);

        assert_eq!(ordered[0], ok("A"));
        assert_eq!(ordered[1].error(), Some("B down"));
        assert_eq!(ordered[2], ok("C"));
    }

    #[test]
    fn test_order_outcomes_fills_missing_slot() {
        let ordered = order_outcomes(2, vec![(1, ok("B"))]);
        assert_eq!(ordered.len(), 2);
        assert!(!ordered[0].is_success());
        assert!(ordered[1].is_success());
    }
}
