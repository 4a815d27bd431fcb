use serde::{Deserialize, Serialize};

use super::model::FeedbackRecord;

/// Optional narrowing filters accepted alongside a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackFilters {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Canonical query predicate. Absent keys are not serialized: an included
/// empty filter would exclude every record that lacks the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPredicate {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

pub fn build_predicate(category: &str, filters: &FeedbackFilters) -> FeedbackPredicate {
    FeedbackPredicate {
        category: category.to_string(),
        department: present(filters.department.as_deref()),
        year: present(filters.year.as_deref()),
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value.filter(|inner| !inner.is_empty()).map(str::to_string)
}

impl FeedbackPredicate {
    /// Included `(column, value)` pairs, in the order category, department, year.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("category", self.category.as_str())];
        if let Some(department) = self.department.as_deref() {
            fields.push(("department", department));
        }
        if let Some(year) = self.year.as_deref() {
            fields.push(("year", year));
        }
        fields
    }

    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        if record.category != self.category {
            return false;
        }
        if let Some(department) = self.department.as_deref() {
            if record.department.as_deref() != Some(department) {
                return false;
            }
        }
        if let Some(year) = self.year.as_deref() {
            if record.year.as_deref() != Some(year) {
                return false;
            }
        }
        true
    }
}
