//! Canned expense summaries and a summary source that returns them.

use std::{sync::Mutex, time::Duration};

use crate::{Error, client::SummarySource, period::Period, summary::ExpenseSummary};

/// Three groups summarised by category. The totals mapping lists the groups
/// in a different order than the category mapping.
pub(crate) const CATEGORY_SUMMARY_JSON: &str = r#"{
    "total_sum": 350.5,
    "total_sum_by_category": {
        "Home": {"Rent": 200, "Electricity": 50.5},
        "Food": {"Groceries": 80},
        "Fun": {"Games": 20}
    },
    "total_sum_by_group": {"Fun": 20, "Home": 250.5, "Food": 80}
}"#;

/// Two groups listing individual expenses, with amounts as decimal strings.
pub(crate) const EXPENSE_SUMMARY_JSON: &str = r#"{
    "total_sum": "15.80",
    "total_sum_by_group": {"Flat": "12.30", "Personal": "3.50"},
    "expenses_by_group": {
        "Flat": [{
            "id": 7,
            "group": "Flat",
            "created_at": "2016-10-03",
            "description": "Milk",
            "parent_category": "Food and drink",
            "child_category": "Groceries",
            "cost": "12.30"
        }],
        "Personal": [{
            "id": 8,
            "group": "Personal",
            "created_at": "2016-10-04",
            "description": "Coffee",
            "parent_category": "Food and drink",
            "child_category": "Cafe",
            "cost": "3.50"
        }]
    }
}"#;

/// A summary source that records each request and answers with a fixed result.
pub(crate) struct StubSource {
    result: Result<ExpenseSummary, Error>,
    delay: Option<Duration>,
    requested: Mutex<Vec<Period>>,
}

impl StubSource {
    pub fn returning(result: Result<ExpenseSummary, Error>) -> Self {
        Self {
            result,
            delay: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Wait `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The periods requested so far, oldest first.
    pub fn requested(&self) -> Vec<Period> {
        self.requested.lock().unwrap().clone()
    }
}

impl SummarySource for StubSource {
    async fn fetch_summary(&self, period: &Period) -> Result<ExpenseSummary, Error> {
        self.requested.lock().unwrap().push(period.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.result.clone()
    }
}
