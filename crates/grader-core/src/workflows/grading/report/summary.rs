use super::super::domain::{EvaluationResult, QuestionResult, Tier};
use serde::Serialize;

const HIGH_THRESHOLD: f64 = 80.0;
const MEDIUM_THRESHOLD: f64 = 60.0;
const LOW_THRESHOLD: f64 = 40.0;

/// Totals across every question of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_score: f64,
    pub total_out_of: f64,
    /// One decimal place, within `[0, 100]`.
    pub percentage: f64,
    pub tier: Tier,
}

impl SummaryStats {
    fn from_totals(total_score: f64, total_out_of: f64) -> Self {
        let percentage = percentage_of(total_score, total_out_of);
        Self {
            total_score,
            total_out_of,
            percentage,
            tier: tier_for_percentage(percentage),
        }
    }
}

pub fn aggregate(evaluation: &EvaluationResult) -> SummaryStats {
    let (total_score, total_out_of) = evaluation
        .questions()
        .fold((0.0, 0.0), |(score, out_of), question| {
            (score + question.score, out_of + question.out_of)
        });

    SummaryStats::from_totals(total_score, total_out_of)
}

/// Band for a single question; shares thresholds with the overall summary.
pub fn tier_of(score: f64, out_of: f64) -> Tier {
    tier_for_percentage(percentage_of(score, out_of))
}

/// Inclusive lower bounds: 80 High, 60 Medium, 40 Low, otherwise Critical.
pub fn tier_for_percentage(percentage: f64) -> Tier {
    if percentage >= HIGH_THRESHOLD {
        Tier::High
    } else if percentage >= MEDIUM_THRESHOLD {
        Tier::Medium
    } else if percentage >= LOW_THRESHOLD {
        Tier::Low
    } else {
        Tier::Critical
    }
}

/// Zero-guarded, rounded to one decimal, clamped to `[0, 100]`. Banding uses
/// this rounded value so a displayed percentage and its tier never disagree.
pub fn percentage_of(score: f64, out_of: f64) -> f64 {
    if !score.is_finite() || !out_of.is_finite() || out_of <= 0.0 {
        return 0.0;
    }

    let rounded = (score / out_of * 1000.0).round() / 10.0;
    rounded.clamp(0.0, 100.0)
}

pub(crate) fn question_percentage(question: &QuestionResult) -> f64 {
    percentage_of(question.score, question.out_of)
}

#[cfg(test)]
mod tests {
    use super::super::super::domain::QuestionId;
    use super::*;

    fn question(id: &str, score: f64, out_of: f64) -> QuestionResult {
        QuestionResult {
            id: QuestionId::from(id),
            score,
            out_of,
            matched: Vec::new(),
            missing: Vec::new(),
            feedback: None,
            audio_ref: None,
        }
    }

    fn evaluation(questions: Vec<QuestionResult>) -> EvaluationResult {
        EvaluationResult {
            results: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
            ..EvaluationResult::default()
        }
    }

    #[test]
    fn totals_and_percentage_cover_all_questions() {
        let stats = aggregate(&evaluation(vec![
            question("A", 5.0, 10.0),
            question("B", 3.0, 5.0),
        ]));
        assert_eq!(stats.total_score, 8.0);
        assert_eq!(stats.total_out_of, 15.0);
        assert!((stats.percentage - 53.3).abs() <= 0.1);
        assert_eq!(stats.tier, Tier::Low);
    }

    #[test]
    fn empty_evaluation_has_zero_percentage() {
        let stats = aggregate(&EvaluationResult::default());
        assert_eq!(stats.total_score, 0.0);
        assert_eq!(stats.total_out_of, 0.0);
        assert_eq!(stats.percentage, 0.0);
        assert_eq!(stats.tier, Tier::Critical);
    }

    #[test]
    fn tier_boundaries_are_inclusive_lower_bounds() {
        assert_eq!(tier_for_percentage(100.0), Tier::High);
        assert_eq!(tier_for_percentage(80.0), Tier::High);
        assert_eq!(tier_for_percentage(79.9), Tier::Medium);
        assert_eq!(tier_for_percentage(60.0), Tier::Medium);
        assert_eq!(tier_for_percentage(59.9), Tier::Low);
        assert_eq!(tier_for_percentage(40.0), Tier::Low);
        assert_eq!(tier_for_percentage(39.9), Tier::Critical);
        assert_eq!(tier_for_percentage(0.0), Tier::Critical);
    }

    #[test]
    fn question_tier_uses_the_same_banding() {
        assert_eq!(tier_of(4.0, 5.0), Tier::High);
        assert_eq!(tier_of(3.0, 5.0), Tier::Medium);
        assert_eq!(tier_of(2.0, 5.0), Tier::Low);
        assert_eq!(tier_of(1.0, 5.0), Tier::Critical);
        assert_eq!(tier_of(3.0, 0.0), Tier::Critical);
    }

    #[test]
    fn bands_on_the_rounded_percentage_not_the_raw_ratio() {
        // 79.96% displays as 80.0 and is banded High, even though the raw
        // ratio sits below the 80 threshold.
        assert_eq!(percentage_of(79.96, 100.0), 80.0);
        assert_eq!(tier_of(79.96, 100.0), Tier::High);
        assert_eq!(percentage_of(79.94, 100.0), 79.9);
        assert_eq!(tier_of(79.94, 100.0), Tier::Medium);
    }

    #[test]
    fn over_scored_questions_do_not_break_aggregation() {
        let stats = aggregate(&evaluation(vec![question("Q1", 12.0, 10.0)]));
        assert_eq!(stats.total_score, 12.0);
        assert_eq!(stats.percentage, 100.0);
        assert_eq!(stats.tier, Tier::High);

        assert_eq!(percentage_of(-2.0, 10.0), 0.0);
        assert_eq!(percentage_of(f64::NAN, 10.0), 0.0);
        assert_eq!(percentage_of(1.0, -5.0), 0.0);
    }
}
