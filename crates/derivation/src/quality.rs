//! Heuristic data-quality scoring — a composite grade from crossover rate,
//! average adjusted confidence, and sample size.

use crate::confidence::average_adjusted_confidence;
use crate::funnel::crossover_rate;
use ctv_core::config::DerivationConfig;
use ctv_core::types::{AttributionMode, CampaignRecord};
use serde::{Deserialize, Serialize};

/// Letter grade for a campaign's data quality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QualityGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
}

impl QualityGrade {
    /// Grade tiers are inclusive on their lower bound.
    pub fn for_composite(composite: f64) -> Self {
        if composite >= 85.0 {
            QualityGrade::APlus
        } else if composite >= 70.0 {
            QualityGrade::A
        } else if composite >= 55.0 {
            QualityGrade::B
        } else {
            QualityGrade::C
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityGrade::APlus => "A+",
            QualityGrade::A => "A",
            QualityGrade::B => "B",
            QualityGrade::C => "C",
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three sub-scores feeding the composite. Crossover and sample size
/// cap at 33 points each, confidence at 34, for a 0-100 composite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityComponents {
    pub crossover_score: f64,
    pub confidence_score: f64,
    pub sample_size_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    pub grade: QualityGrade,
    pub composite_score: f64,
    pub components: QualityComponents,
    pub crossover_rate: f64,
    pub avg_confidence: f64,
    pub sample_size: u64,
}

/// Score a campaign's data quality under the given attribution mode.
/// Confidence averages over ALL edges, unfiltered by any display threshold.
pub fn score_data_quality(
    record: &CampaignRecord,
    mode: AttributionMode,
    config: &DerivationConfig,
) -> QualityScore {
    let rate = crossover_rate(record);
    let crossover_score = (rate / config.crossover_ceiling).min(1.0) * 33.0;

    let avg_confidence = average_adjusted_confidence(&record.links, mode);
    let confidence_score = avg_confidence.min(1.0) * 34.0;

    let sample_size = record.impression_node().map_or(0, |n| n.value);
    let sample_size_score = (sample_size as f64 / config.sample_size_ceiling).min(1.0) * 33.0;

    let composite = crossover_score + confidence_score + sample_size_score;

    QualityScore {
        grade: QualityGrade::for_composite(composite),
        composite_score: composite,
        components: QualityComponents {
            crossover_score,
            confidence_score,
            sample_size_score,
        },
        crossover_rate: rate,
        avg_confidence,
        sample_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctv_catalog::CampaignCatalog;

    fn grade_rank(grade: QualityGrade) -> u8 {
        match grade {
            QualityGrade::C => 0,
            QualityGrade::B => 1,
            QualityGrade::A => 2,
            QualityGrade::APlus => 3,
        }
    }

    #[test]
    fn test_grade_boundaries_inclusive() {
        assert_eq!(QualityGrade::for_composite(85.0), QualityGrade::APlus);
        assert_eq!(QualityGrade::for_composite(84.999), QualityGrade::A);
        assert_eq!(QualityGrade::for_composite(70.0), QualityGrade::A);
        assert_eq!(QualityGrade::for_composite(55.0), QualityGrade::B);
        assert_eq!(QualityGrade::for_composite(54.9), QualityGrade::C);
    }

    #[test]
    fn test_component_caps() {
        let catalog = CampaignCatalog::load().unwrap();
        let config = DerivationConfig::default();
        for summary in catalog.list() {
            let record = catalog.get(&summary.id).unwrap();
            for mode in [AttributionMode::Household, AttributionMode::Individual] {
                let score = score_data_quality(record, mode, &config);
                assert!(score.components.crossover_score <= 33.0);
                assert!(score.components.confidence_score <= 34.0);
                assert!(score.components.sample_size_score <= 33.0);
                assert!((0.0..=100.0).contains(&score.composite_score));
            }
        }
    }

    #[test]
    fn test_household_mode_never_grades_below_individual() {
        // Household boosts every edge confidence, so with the other two
        // components fixed the grade can only improve.
        let catalog = CampaignCatalog::load().unwrap();
        let config = DerivationConfig::default();
        for summary in catalog.list() {
            let record = catalog.get(&summary.id).unwrap();
            let household = score_data_quality(record, AttributionMode::Household, &config);
            let individual = score_data_quality(record, AttributionMode::Individual, &config);
            assert!(grade_rank(household.grade) >= grade_rank(individual.grade));
        }
    }

    #[test]
    fn test_larger_sample_never_decreases_grade() {
        let catalog = CampaignCatalog::load().unwrap();
        let config = DerivationConfig::default();
        let mut record = catalog.get("camp-cpg-awareness").unwrap().clone();
        let before = score_data_quality(&record, AttributionMode::Household, &config);

        for node in &mut record.nodes {
            if node.id == "ctv" {
                node.value = 2_500_000;
            }
        }
        let after = score_data_quality(&record, AttributionMode::Household, &config);
        assert!(grade_rank(after.grade) >= grade_rank(before.grade));
        assert!(after.components.sample_size_score >= before.components.sample_size_score);
    }

    #[test]
    fn test_ecom_spring_grades_well() {
        let catalog = CampaignCatalog::load().unwrap();
        let record = catalog.get("camp-ecom-spring").unwrap();
        let score = score_data_quality(record, AttributionMode::Household, &DerivationConfig::default());
        // Crossover 38.3% of the 50% ceiling, high avg confidence, 1.5M of
        // the 2M ceiling: lands in the A range.
        assert_eq!(score.grade, QualityGrade::A);
    }
}
