//! Country checklist completion engine
//!
//! Evaluates every cached employee of a country against that country's rule
//! set and aggregates a completion summary. Results are cached for ten
//! minutes under the country tag, so any employee mutation for the country
//! invalidates them.

use super::cache_service::{country_tag, CacheService};
use super::checklist_rules::{ChecklistItem, CountryRules};
use crate::cache::CacheError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// TTL for evaluated checklist results
pub const CHECKLIST_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("unsupported country: {0}")]
    UnsupportedCountry(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Aggregated checklist result for one country
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistReport {
    pub summary: ChecklistSummary,
    pub employees: Vec<EmployeeChecklist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistSummary {
    pub total: usize,
    pub complete: usize,
    pub incomplete: usize,
    /// Percentage of fully complete employees, two decimals, 0 when empty
    pub completion_rate: f64,
}

/// Per-employee checklist evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeChecklist {
    pub employee_id: i64,
    pub name: String,
    pub last_name: String,
    pub checklist: Vec<ChecklistItem>,
    /// Percentage of complete rules, two decimals; 100 only when every
    /// rule passes
    pub overall_completion: f64,
}

impl EmployeeChecklist {
    pub fn is_complete(&self) -> bool {
        self.checklist.iter().all(ChecklistItem::is_complete)
    }
}

/// Checklist evaluator over the employee cache
pub struct ChecklistService {
    cache: Arc<CacheService>,
}

impl ChecklistService {
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self { cache }
    }

    /// Evaluate the checklist for a supported country
    ///
    /// Fails with [`ChecklistError::UnsupportedCountry`] outside the closed
    /// USA/Germany set. The computed report is cached under
    /// `checklist:{country}` with the `country:{country}` tag.
    pub async fn evaluate(&self, country: &str) -> Result<ChecklistReport, ChecklistError> {
        let rules = CountryRules::for_country(country)
            .ok_or_else(|| ChecklistError::UnsupportedCountry(country.to_string()))?;

        let key = format!("checklist:{country}");
        let tag = country_tag(country);

        let report = self
            .cache
            .remember_tagged(&key, &tag, CHECKLIST_TTL, || async {
                let employees = self.cache.employees_by_country(country).await?;
                Ok(build_report(rules, &employees))
            })
            .await?;

        Ok(report)
    }
}

fn build_report(
    rules: CountryRules,
    employees: &[crate::contracts::EmployeeRecord],
) -> ChecklistReport {
    let evaluated: Vec<EmployeeChecklist> = employees
        .iter()
        .map(|employee| {
            let checklist = rules.validate(employee);
            let complete_count = checklist.iter().filter(|item| item.is_complete()).count();
            let overall_completion = round2(complete_count as f64 / checklist.len() as f64 * 100.0);

            EmployeeChecklist {
                employee_id: employee.id,
                name: employee.name.clone(),
                last_name: employee.last_name.clone(),
                checklist,
                overall_completion,
            }
        })
        .collect();

    let total = evaluated.len();
    let complete = evaluated
        .iter()
        .filter(|employee| employee.is_complete())
        .count();
    let completion_rate = if total == 0 {
        0.0
    } else {
        round2(complete as f64 / total as f64 * 100.0)
    };

    ChecklistReport {
        summary: ChecklistSummary {
            total,
            complete,
            incomplete: total - complete,
            completion_rate,
        },
        employees: evaluated,
    }
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
        assert_eq!(round2(2.0 / 3.0 * 100.0), 66.67);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_build_report_empty() {
        let report = build_report(CountryRules::Usa, &[]);
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.complete, 0);
        assert_eq!(report.summary.incomplete, 0);
        assert_eq!(report.summary.completion_rate, 0.0);
        assert!(report.employees.is_empty());
    }
}
