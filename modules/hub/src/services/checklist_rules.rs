//! Country-specific checklist completion rules
//!
//! Closed set: USA and Germany. Each rule yields a (field, status, message)
//! item; the message is populated only for incomplete fields.

use crate::contracts::EmployeeRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static GERMAN_TAX_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DE\d{9}$").expect("tax id pattern is valid"));

/// Completion status of a single checklist field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistStatus {
    Complete,
    Incomplete,
}

/// One evaluated checklist rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub field: String,
    pub status: ChecklistStatus,
    pub message: Option<String>,
}

impl ChecklistItem {
    fn complete(field: &str) -> Self {
        Self {
            field: field.to_string(),
            status: ChecklistStatus::Complete,
            message: None,
        }
    }

    fn incomplete(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            status: ChecklistStatus::Incomplete,
            message: Some(message.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == ChecklistStatus::Complete
    }
}

/// Rule set for a supported country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryRules {
    Usa,
    Germany,
}

impl CountryRules {
    /// Resolve the rule set for a country string; `None` for countries
    /// outside the supported set
    pub fn for_country(country: &str) -> Option<Self> {
        match country {
            "USA" => Some(CountryRules::Usa),
            "Germany" => Some(CountryRules::Germany),
            _ => None,
        }
    }

    /// Evaluate every rule of this country against an employee record
    pub fn validate(&self, employee: &EmployeeRecord) -> Vec<ChecklistItem> {
        match self {
            CountryRules::Usa => vec![
                check_ssn(employee),
                check_salary(employee),
                check_address(employee),
            ],
            CountryRules::Germany => vec![
                check_salary(employee),
                check_goal(employee),
                check_tax_id(employee),
            ],
        }
    }
}

fn check_ssn(employee: &EmployeeRecord) -> ChecklistItem {
    match employee.ssn.as_deref() {
        Some(ssn) if !ssn.is_empty() => ChecklistItem::complete("ssn"),
        _ => ChecklistItem::incomplete("ssn", "SSN is required"),
    }
}

fn check_salary(employee: &EmployeeRecord) -> ChecklistItem {
    match employee.salary {
        Some(salary) if salary > 0.0 => ChecklistItem::complete("salary"),
        _ => ChecklistItem::incomplete("salary", "Salary must be greater than 0"),
    }
}

fn check_address(employee: &EmployeeRecord) -> ChecklistItem {
    match employee.address.as_deref() {
        Some(address) if !address.is_empty() => ChecklistItem::complete("address"),
        _ => ChecklistItem::incomplete("address", "Address is required"),
    }
}

fn check_goal(employee: &EmployeeRecord) -> ChecklistItem {
    match employee.goal.as_deref() {
        Some(goal) if !goal.is_empty() => ChecklistItem::complete("goal"),
        _ => ChecklistItem::incomplete("goal", "Goal is required"),
    }
}

fn check_tax_id(employee: &EmployeeRecord) -> ChecklistItem {
    match employee.tax_id.as_deref() {
        Some(tax_id) if GERMAN_TAX_ID.is_match(tax_id) => ChecklistItem::complete("tax_id"),
        _ => ChecklistItem::incomplete("tax_id", "Tax ID must be DE followed by 9 digits"),
    }
}
