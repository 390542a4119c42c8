//! Planning and selection
//!
//! The plan is a fixed decomposition of the goal; it is stored with the job
//! so a report shows what the run set out to do.

use crate::config::RankStrategy;
use crate::search::SearchHit;

pub const DEFAULT_GOAL: &str =
    "Find the top 3 recent AI research papers on agriculture, summarize them, and store output.";

/// Query sent to the search backend for every run.
pub const SEARCH_QUERY: &str = "recent AI research papers in agriculture arxiv journal";

const PAPER_MARKERS: [&str; 4] = ["paper", "arxiv", "research", "journal"];

/// Deterministic five-step plan for `goal`.
pub fn build_plan(goal: &str, result_cap: usize) -> Vec<String> {
    vec![
        format!("Interpret goal: {}", goal),
        "Search the web for recent AI research papers related to agriculture".to_string(),
        format!("Rank and select the top {} recent papers", result_cap),
        "Summarize each paper with an agriculture impact lens".to_string(),
        "Store result in SQLite and return structured output".to_string(),
    ]
}

/// Picks at most `cap` hits.
///
/// `AsReturned` keeps the backend's order. `Recent` keeps hits that look like
/// papers (all hits if none do) and orders them newest first; hits without a
/// year sort last and ties keep their original order.
pub fn select_candidates(hits: Vec<SearchHit>, cap: usize, strategy: RankStrategy) -> Vec<SearchHit> {
    match strategy {
        RankStrategy::AsReturned => hits.into_iter().take(cap).collect(),
        RankStrategy::Recent => {
            let (papers, others): (Vec<_>, Vec<_>) =
                hits.into_iter().partition(looks_like_paper);
            let mut ranked = if papers.is_empty() { others } else { papers };
            ranked.sort_by_key(|hit| std::cmp::Reverse(hit.year.unwrap_or(0)));
            ranked.truncate(cap);
            ranked
        }
    }
}

fn looks_like_paper(hit: &SearchHit) -> bool {
    let text = format!("{} {}", hit.title, hit.snippet).to_lowercase();
    PAPER_MARKERS.iter().any(|marker| text.contains(marker))
}
