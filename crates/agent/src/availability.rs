//! Per-turn tool availability policy.
//!
//! A pure function of the context counters and the configured limits. The
//! returned subset is never empty: at the iteration cap the concluding pair
//! is injected even if the toolkit lacks it.

use sgr_core::config::ExecutionConfig;
use sgr_core::context::AgentContext;
use sgr_core::tool::{ToolDescriptor, Toolkit};
use sgr_tools::{clarification, final_answer, reasoning};

/// Compute the tools offered to the model this turn.
///
/// - At or past the iteration cap: only the concluding subset (reasoning +
///   final answer), injected if the toolkit does not carry them.
///   Search-capable descriptors stay excluded even when flagged concluding.
/// - At the search cap: search-capable tools are withdrawn.
/// - At the clarification cap: the clarification tool is withdrawn.
pub fn available_tools(
    toolkit: &Toolkit,
    context: &AgentContext,
    limits: &ExecutionConfig,
) -> Vec<ToolDescriptor> {
    if context.iteration >= limits.max_iterations {
        let mut concluding: Vec<ToolDescriptor> = toolkit
            .descriptors()
            .iter()
            .filter(|d| d.is_concluding() && !d.is_search_capable())
            .cloned()
            .collect();
        if !concluding.iter().any(|d| d.name() == reasoning::NAME) {
            concluding.insert(0, reasoning::descriptor());
        }
        if !concluding.iter().any(|d| d.name() == final_answer::NAME) {
            concluding.push(final_answer::descriptor());
        }
        return concluding;
    }

    toolkit
        .descriptors()
        .iter()
        .filter(|d| !(d.is_search_capable() && context.searches_used >= limits.max_searches))
        .filter(|d| {
            !(d.name() == clarification::NAME
                && context.clarifications_used >= limits.max_clarifications)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgr_tools::default_toolkit;

    fn limits() -> ExecutionConfig {
        ExecutionConfig {
            max_iterations: 10,
            max_searches: 4,
            max_clarifications: 3,
            ..ExecutionConfig::default()
        }
    }

    fn names(tools: &[ToolDescriptor]) -> Vec<&'static str> {
        tools.iter().map(|d| d.name()).collect()
    }

    #[test]
    fn full_toolkit_under_all_limits() {
        let kit = default_toolkit();
        let ctx = AgentContext::new();
        let offered = available_tools(&kit, &ctx, &limits());
        assert_eq!(offered.len(), kit.len());
    }

    #[test]
    fn search_cap_withdraws_search_capable_tools() {
        let kit = default_toolkit();
        let mut ctx = AgentContext::new();
        ctx.searches_used = 4;
        let offered = available_tools(&kit, &ctx, &limits());
        assert!(!names(&offered).contains(&"web_search"));
        assert!(names(&offered).contains(&"extract_page_content"));
        assert!(names(&offered).contains(&"final_answer"));
    }

    #[test]
    fn search_cap_boundary_is_inclusive() {
        let kit = default_toolkit();
        let mut ctx = AgentContext::new();
        ctx.searches_used = 3;
        assert!(names(&available_tools(&kit, &ctx, &limits())).contains(&"web_search"));
        ctx.searches_used = 4;
        assert!(!names(&available_tools(&kit, &ctx, &limits())).contains(&"web_search"));
    }

    #[test]
    fn iteration_cap_restricts_to_concluding_subset() {
        let kit = default_toolkit();
        let mut ctx = AgentContext::new();
        ctx.iteration = 10;
        let offered = available_tools(&kit, &ctx, &limits());
        assert_eq!(names(&offered), vec!["reasoning", "final_answer"]);
    }

    #[test]
    fn concluding_subset_is_injected_when_missing() {
        // A toolkit without any concluding tools still yields the pair.
        let kit = Toolkit::new(vec![sgr_tools::web_search::descriptor()]).unwrap();
        let mut ctx = AgentContext::new();
        ctx.iteration = 10;
        let offered = available_tools(&kit, &ctx, &limits());
        assert_eq!(names(&offered), vec!["reasoning", "final_answer"]);
    }

    #[test]
    fn iteration_cap_excludes_search_capable_concluding_tools() {
        // A tool may be flagged both concluding and search-capable; the
        // search exclusion wins at the iteration cap.
        let crawler = ToolDescriptor::new(
            "crawler",
            "Crawl and summarize in one pass",
            || serde_json::json!({ "type": "object" }),
            |_| Err(sgr_core::error::ToolError::Unknown("crawler".into())),
        )
        .search_capable()
        .concluding();
        let kit = Toolkit::new(vec![crawler, sgr_tools::final_answer::descriptor()]).unwrap();
        let mut ctx = AgentContext::new();
        ctx.iteration = 10;
        let offered = available_tools(&kit, &ctx, &limits());
        assert_eq!(names(&offered), vec!["reasoning", "final_answer"]);
    }

    #[test]
    fn clarification_cap_withdraws_the_clarification_tool() {
        let kit = default_toolkit();
        let mut ctx = AgentContext::new();
        ctx.clarifications_used = 3;
        let offered = available_tools(&kit, &ctx, &limits());
        assert!(!names(&offered).contains(&"clarification"));
        assert!(names(&offered).contains(&"web_search"));
    }

    #[test]
    fn offered_set_is_never_empty() {
        let kit = Toolkit::default();
        let mut ctx = AgentContext::new();
        ctx.iteration = 99;
        let offered = available_tools(&kit, &ctx, &limits());
        assert!(!offered.is_empty());
    }

    #[test]
    fn policy_is_pure() {
        let kit = default_toolkit();
        let mut ctx = AgentContext::new();
        ctx.searches_used = 4;
        let a = names(&available_tools(&kit, &ctx, &limits()));
        let b = names(&available_tools(&kit, &ctx, &limits()));
        assert_eq!(a, b);
    }
}
