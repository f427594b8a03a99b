// src/analytics/mod.rs

//! In-memory performance analytics over completed quiz attempts.
//!
//! The aggregator folds each submitted [`TestResult`] into per-user state
//! (recent scores, per-topic and per-difficulty history). Read-only reports
//! and recommendations are derived in [`report`] and [`recommend`]. The
//! state here is rebuilt at startup by replaying stored results; nothing in
//! this module touches I/O.

pub mod recommend;
pub mod report;

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::question::Difficulty;
use crate::models::quiz::TestResult;

/// How many entries `recent_performance` keeps per user.
const RECENT_CAPACITY: usize = 10;

/// One per-ingest correctness record for a bucket. Historical snapshots are
/// never rewritten, only summed on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSnapshot {
    pub correct: u32,
    pub total: u32,
    pub score: f64,
}

impl BucketSnapshot {
    fn new(correct: u32, total: u32) -> Self {
        Self {
            correct,
            total,
            score: percentage(correct, total),
        }
    }
}

pub(crate) fn percentage(correct: u32, total: u32) -> f64 {
    if total > 0 {
        correct as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// One entry of the bounded recent-score window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentEntry {
    pub test_name: String,
    pub score: f64,
    pub timestamp: String,
}

/// Everything the aggregator tracks for a single user.
///
/// `tests` is append-only in arrival order. `recent_performance` is kept
/// sorted by timestamp descending and truncated to [`RECENT_CAPACITY`].
#[derive(Debug, Default)]
pub struct UserPerformanceState {
    tests: Vec<TestResult>,
    topic_performance: BTreeMap<String, Vec<BucketSnapshot>>,
    difficulty_performance: BTreeMap<Difficulty, Vec<BucketSnapshot>>,
    recent_performance: Vec<RecentEntry>,
}

/// Per-user rolling performance statistics.
#[derive(Debug, Default)]
pub struct PerformanceAnalytics {
    users: HashMap<String, UserPerformanceState>,
}

impl PerformanceAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn user(&self, user_id: &str) -> Option<&UserPerformanceState> {
        self.users.get(user_id)
    }

    /// Records one completed quiz attempt for `user_id`, creating the
    /// user's state on first sight.
    ///
    /// When the result carries graded answers, each answer is tallied under
    /// its topic and difficulty buckets and one snapshot per bucket touched
    /// is appended. Results without answers still update the test list and
    /// the recent-score window.
    pub fn ingest(&mut self, user_id: &str, result: &TestResult) {
        let state = self.users.entry(user_id.to_string()).or_default();

        state.tests.push(result.clone());

        state.recent_performance.push(RecentEntry {
            test_name: result.test_name.clone(),
            score: result.score,
            timestamp: result.timestamp.clone(),
        });
        state
            .recent_performance
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        state.recent_performance.truncate(RECENT_CAPACITY);

        let Some(answers) = &result.answers else {
            return;
        };

        // Tallies cover this ingest only; history lives in the snapshots.
        let mut topic_tallies: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
        let mut difficulty_tallies: BTreeMap<Difficulty, (u32, u32)> = BTreeMap::new();

        for answer in answers {
            let (correct, total) = topic_tallies.entry(answer.topic.as_str()).or_insert((0, 0));
            *total += 1;
            if answer.is_correct {
                *correct += 1;
            }

            let (correct, total) = difficulty_tallies.entry(answer.difficulty).or_insert((0, 0));
            *total += 1;
            if answer.is_correct {
                *correct += 1;
            }
        }

        for (topic, (correct, total)) in topic_tallies {
            state
                .topic_performance
                .entry(topic.to_string())
                .or_default()
                .push(BucketSnapshot::new(correct, total));
        }

        for (difficulty, (correct, total)) in difficulty_tallies {
            state
                .difficulty_performance
                .entry(difficulty)
                .or_default()
                .push(BucketSnapshot::new(correct, total));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::{answer, result, tagged_answer};
    use super::*;

    #[test]
    fn ingest_creates_user_state() {
        let mut analytics = PerformanceAnalytics::new();
        analytics.ingest("alice", &result("T1", 80.0, "2024-01-01"));
        assert!(analytics.user("alice").is_some());
        assert!(analytics.user("bob").is_none());
    }

    #[test]
    fn recent_window_is_bounded_and_sorted() {
        let mut analytics = PerformanceAnalytics::new();
        for day in 1..=15 {
            analytics.ingest(
                "alice",
                &result("T", 50.0, &format!("2024-01-{day:02}")),
            );
        }

        let state = analytics.user("alice").unwrap();
        assert_eq!(state.recent_performance.len(), RECENT_CAPACITY);
        // Newest first; day 15 survives, days 1-5 fell off.
        assert_eq!(state.recent_performance[0].timestamp, "2024-01-15");
        assert_eq!(state.recent_performance[9].timestamp, "2024-01-06");
        for pair in state.recent_performance.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn out_of_order_timestamps_resort_on_each_ingest() {
        let mut analytics = PerformanceAnalytics::new();
        analytics.ingest("alice", &result("T2", 60.0, "2024-01-02"));
        analytics.ingest("alice", &result("T1", 80.0, "2024-01-01"));
        analytics.ingest("alice", &result("T3", 70.0, "2024-01-03"));

        let names: Vec<&str> = analytics.user("alice").unwrap().recent_performance.iter()
            .map(|e| e.test_name.as_str())
            .collect();
        assert_eq!(names, ["T3", "T2", "T1"]);
    }

    #[test]
    fn untagged_answers_share_one_bucket() {
        // Without per-question tags every answer lands in the default
        // General/Medium buckets, matching the reference behavior.
        let mut analytics = PerformanceAnalytics::new();
        let mut r = result("T1", 50.0, "2024-01-01");
        r.answers = Some(vec![answer(true), answer(false)]);
        analytics.ingest("alice", &r);

        let state = analytics.user("alice").unwrap();
        assert_eq!(state.topic_performance.len(), 1);
        let snapshots = &state.topic_performance["General"];
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0], BucketSnapshot { correct: 1, total: 2, score: 50.0 });
        assert_eq!(state.difficulty_performance.len(), 1);
        assert!(state.difficulty_performance.contains_key(&Difficulty::Medium));
    }

    #[test]
    fn aggregates_per_answer_tags() {
        let mut analytics = PerformanceAnalytics::new();
        let mut r = result("T1", 66.7, "2024-01-01");
        r.answers = Some(vec![
            tagged_answer(true, "Algebra", Difficulty::Easy),
            tagged_answer(true, "Algebra", Difficulty::Hard),
            tagged_answer(false, "Geometry", Difficulty::Easy),
        ]);
        analytics.ingest("alice", &r);

        let state = analytics.user("alice").unwrap();
        assert_eq!(state.topic_performance["Algebra"][0].correct, 2);
        assert_eq!(state.topic_performance["Geometry"][0].total, 1);
        assert_eq!(state.difficulty_performance[&Difficulty::Easy][0].total, 2);
        assert_eq!(state.difficulty_performance[&Difficulty::Hard][0].correct, 1);
    }

    #[test]
    fn result_without_answers_appends_no_snapshots() {
        let mut analytics = PerformanceAnalytics::new();
        analytics.ingest("alice", &result("T1", 90.0, "2024-01-01"));

        let state = analytics.user("alice").unwrap();
        assert_eq!(state.tests.len(), 1);
        assert!(state.topic_performance.is_empty());
        assert!(state.difficulty_performance.is_empty());
    }

    #[test]
    fn snapshots_accumulate_per_ingest() {
        let mut analytics = PerformanceAnalytics::new();
        for day in 1..=3 {
            let mut r = result("T", 100.0, &format!("2024-01-0{day}"));
            r.answers = Some(vec![answer(true)]);
            analytics.ingest("alice", &r);
        }

        let snapshots = &analytics.user("alice").unwrap().topic_performance["General"];
        assert_eq!(snapshots.len(), 3);
    }

    #[test]
    fn users_are_isolated() {
        let mut analytics = PerformanceAnalytics::new();
        analytics.ingest("alice", &result("T1", 80.0, "2024-01-01"));
        analytics.ingest("bob", &result("T2", 40.0, "2024-01-02"));

        assert_eq!(analytics.user("alice").unwrap().tests.len(), 1);
        assert_eq!(analytics.user("bob").unwrap().tests.len(), 1);
    }
}
