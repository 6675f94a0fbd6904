//! The expense summary returned by the expense API.
//!
//! The response is parsed and validated in one step, so rendering code never
//! touches a field that might be missing. Two response shapes are accepted:
//!
//! - groups with category totals (`total_sum_by_category`), and
//! - groups with individual expense records (`expenses_by_group`).
//!
//! When both are present, category totals win.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::{Map, Value};
use time::Date;

use crate::Error;

/// A validated expense summary for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    /// The sum of all expenses in the period.
    pub total: f64,
    /// The groups in the order the expense API listed them.
    pub groups: Vec<GroupSummary>,
}

/// One top-level bucket of the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// The group name.
    pub name: String,
    /// The group's subtotal, `None` if the totals mapping has no entry for it.
    pub total: Option<f64>,
    /// What the group contains.
    pub detail: GroupDetail,
}

/// The contents of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupDetail {
    /// Totals per category.
    Categories(Vec<CategoryTotal>),
    /// Individual expenses.
    Expenses(Vec<ExpenseRecord>),
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name.
    pub name: String,
    /// The amount spent.
    pub total: f64,
}

/// A single expense as listed by the expense API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseRecord {
    /// The expense ID.
    pub id: i64,
    /// The group the expense belongs to.
    pub group: String,
    /// The date of the expense.
    pub created_at: Date,
    /// Text describing the expense.
    pub description: String,
    /// The top-level category, e.g. "Food and drink".
    pub parent_category: String,
    /// The sub-category, e.g. "Groceries".
    pub child_category: String,
    /// The amount spent.
    #[serde(deserialize_with = "deserialize_amount")]
    pub cost: f64,
}

impl ExpenseRecord {
    /// The full category name, e.g. "Food and drink/Groceries".
    pub fn category(&self) -> String {
        format!("{}/{}", self.parent_category, self.child_category)
    }
}

/// The response body before validation.
#[derive(Debug, Deserialize)]
struct RawSummary {
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    total_sum: Option<f64>,
    total_sum_by_group: Option<Map<String, Value>>,
    total_sum_by_category: Option<Map<String, Value>>,
    expenses_by_group: Option<Map<String, Value>>,
}

/// Amounts are sent either as JSON numbers or as decimal strings like "12.30".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(f64),
    Text(String),
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Number(number) => number,
        AmountRepr::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("invalid amount \"{text}\"")))?,
    };

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(D::Error::custom(format!("invalid amount {amount}")))
    }
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_amount(deserializer).map(Some)
}

fn parse_amount(value: Value, context: &str) -> Result<f64, Error> {
    deserialize_amount(value)
        .map_err(|error| Error::MalformedResponse(format!("{context}: {error}")))
}

impl ExpenseSummary {
    /// Parse and validate the JSON body returned by the expense API.
    ///
    /// # Errors
    /// Returns [Error::MalformedResponse] if the body is not a JSON object or
    /// a field has the wrong type, and [Error::MissingField] if a field needed
    /// for rendering is absent.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        let raw: RawSummary = serde_json::from_str(body)
            .map_err(|error| Error::MalformedResponse(error.to_string()))?;

        Self::try_from(raw)
    }
}

impl TryFrom<RawSummary> for ExpenseSummary {
    type Error = Error;

    fn try_from(raw: RawSummary) -> Result<Self, Self::Error> {
        let total = raw.total_sum.ok_or(Error::MissingField("total_sum"))?;

        let mut group_totals = raw
            .total_sum_by_group
            .ok_or(Error::MissingField("total_sum_by_group"))?;

        let groups = match (raw.total_sum_by_category, raw.expenses_by_group) {
            (Some(by_category), _) => by_category
                .into_iter()
                .map(|(name, categories)| {
                    let detail = GroupDetail::Categories(parse_categories(&name, categories)?);
                    group_summary(name, detail, &mut group_totals)
                })
                .collect::<Result<Vec<_>, Error>>()?,
            (None, Some(by_group)) => by_group
                .into_iter()
                .map(|(name, expenses)| {
                    let expenses = Vec::<ExpenseRecord>::deserialize(expenses).map_err(|error| {
                        Error::MalformedResponse(format!("expenses for group \"{name}\": {error}"))
                    })?;
                    group_summary(name, GroupDetail::Expenses(expenses), &mut group_totals)
                })
                .collect::<Result<Vec<_>, Error>>()?,
            (None, None) => {
                return Err(Error::MissingField(
                    "total_sum_by_category or expenses_by_group",
                ));
            }
        };

        if !group_totals.is_empty() {
            tracing::debug!(
                "Ignoring totals for groups without details: {:?}",
                group_totals.keys().collect::<Vec<_>>()
            );
        }

        Ok(Self { total, groups })
    }
}

/// Pair a group's details with its subtotal, taking the subtotal out of
/// `group_totals` so that the leftovers are the groups without details.
fn group_summary(
    name: String,
    detail: GroupDetail,
    group_totals: &mut Map<String, Value>,
) -> Result<GroupSummary, Error> {
    let total = match group_totals.remove(&name) {
        Some(value) => Some(parse_amount(value, &format!("total for group \"{name}\""))?),
        None => {
            tracing::warn!("The expense API sent no total for the group \"{name}\"");
            None
        }
    };

    Ok(GroupSummary {
        name,
        total,
        detail,
    })
}

fn parse_categories(group: &str, categories: Value) -> Result<Vec<CategoryTotal>, Error> {
    let Value::Object(categories) = categories else {
        return Err(Error::MalformedResponse(format!(
            "categories for group \"{group}\" are not an object"
        )));
    };

    categories
        .into_iter()
        .map(|(name, total)| {
            let total = parse_amount(total, &format!("total for category \"{name}\""))?;
            Ok(CategoryTotal { name, total })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        summary::{ExpenseSummary, GroupDetail},
    };

    #[test]
    fn parses_category_shape_in_response_order() {
        let body = r#"{
            "total_sum": 350.5,
            "total_sum_by_category": {
                "Home": {"Rent": 200, "Electricity": 50.5},
                "Food": {"Groceries": 80},
                "Fun": {"Games": 20}
            },
            "total_sum_by_group": {"Fun": 20, "Home": 250.5, "Food": 80}
        }"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert_eq!(summary.total, 350.5);
        let names = summary
            .groups
            .iter()
            .map(|group| group.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Home", "Food", "Fun"]);
        assert_eq!(summary.groups[0].total, Some(250.5));
        assert_eq!(summary.groups[2].total, Some(20.0));

        let GroupDetail::Categories(categories) = &summary.groups[0].detail else {
            panic!("want category detail, got {:?}", summary.groups[0].detail);
        };
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Rent");
        assert_eq!(categories[1].total, 50.5);
    }

    #[test]
    fn parses_expense_shape_with_decimal_strings() {
        let body = r#"{
            "total_sum": "12.30",
            "total_sum_by_group": {"Flat": "12.30"},
            "expenses_by_group": {
                "Flat": [{
                    "id": 7,
                    "group": "Flat",
                    "created_at": "2016-10-03",
                    "description": "Milk",
                    "parent_category": "Food and drink",
                    "child_category": "Groceries",
                    "cost": "12.30"
                }]
            }
        }"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert_eq!(summary.total, 12.3);
        assert_eq!(summary.groups[0].total, Some(12.3));
        let GroupDetail::Expenses(expenses) = &summary.groups[0].detail else {
            panic!("want expense detail, got {:?}", summary.groups[0].detail);
        };
        assert_eq!(expenses[0].id, 7);
        assert_eq!(expenses[0].created_at, date!(2016 - 10 - 03));
        assert_eq!(expenses[0].cost, 12.3);
        assert_eq!(expenses[0].category(), "Food and drink/Groceries");
    }

    #[test]
    fn category_shape_wins_when_both_are_present() {
        let body = r#"{
            "total_sum": 1,
            "total_sum_by_group": {"A": 1},
            "total_sum_by_category": {"A": {"x": 1}},
            "expenses_by_group": {"A": []}
        }"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert!(matches!(
            summary.groups[0].detail,
            GroupDetail::Categories(_)
        ));
    }

    #[test]
    fn empty_grouping_has_no_groups() {
        let body = r#"{"total_sum": 0, "total_sum_by_group": {}, "total_sum_by_category": {}}"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert_eq!(summary.total, 0.0);
        assert!(summary.groups.is_empty());
    }

    #[test]
    fn group_without_details_is_dropped() {
        let body = r#"{
            "total_sum": 30,
            "total_sum_by_group": {"A": 10, "Ghost": 20},
            "total_sum_by_category": {"A": {"x": 10}}
        }"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert_eq!(summary.groups.len(), 1);
        assert_eq!(summary.groups[0].name, "A");
    }

    #[test]
    fn group_without_total_has_unknown_total() {
        let body = r#"{
            "total_sum": 10,
            "total_sum_by_group": {},
            "total_sum_by_category": {"A": {"x": 10}}
        }"#;

        let summary = ExpenseSummary::from_json(body).unwrap();

        assert_eq!(summary.groups[0].total, None);
    }

    #[test]
    fn missing_grouping_is_an_error() {
        let body = r#"{"total_sum": 10, "total_sum_by_group": {"A": 10}}"#;

        let result = ExpenseSummary::from_json(body);

        assert_eq!(
            result,
            Err(Error::MissingField(
                "total_sum_by_category or expenses_by_group"
            ))
        );
    }

    #[test]
    fn missing_totals_are_errors() {
        assert_eq!(
            ExpenseSummary::from_json(r#"{"total_sum_by_group": {}, "total_sum_by_category": {}}"#),
            Err(Error::MissingField("total_sum"))
        );
        assert_eq!(
            ExpenseSummary::from_json(r#"{"total_sum": 1, "total_sum_by_category": {}}"#),
            Err(Error::MissingField("total_sum_by_group"))
        );
    }

    #[test]
    fn wrong_types_are_malformed() {
        let cases = [
            "[]",
            "not json",
            r#"{"total_sum": "lots", "total_sum_by_group": {}, "total_sum_by_category": {}}"#,
            r#"{"total_sum": 1, "total_sum_by_group": {"A": 1}, "total_sum_by_category": {"A": [1]}}"#,
            r#"{"total_sum": 1, "total_sum_by_group": {"A": "one"}, "total_sum_by_category": {"A": {}}}"#,
            r#"{"total_sum": 1, "total_sum_by_group": {"A": 1}, "expenses_by_group": {"A": [{"id": 1}]}}"#,
        ];

        for body in cases {
            let result = ExpenseSummary::from_json(body);

            assert!(
                matches!(result, Err(Error::MalformedResponse(_))),
                "want malformed response error for {body}, got {result:?}"
            );
        }
    }
}
