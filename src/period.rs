//! Resolves which reporting period the view displays.

use std::fmt::Display;

use time::Month;

/// The token the expense API uses for the current month.
pub const THIS_MONTH_TOKEN: &str = "this_month";

/// A reporting period, identified by the token sent to the expense API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// The current month.
    ThisMonth,
    /// A historical month, identified by an opaque year-and-month token,
    /// e.g. "2023-05".
    YearMonth(String),
}

impl Period {
    /// Resolve the period from the page's location fragment, the text after '#'.
    ///
    /// A missing or empty fragment is the current month. Any other fragment is
    /// used verbatim as the token. A leading '#' is ignored.
    pub fn resolve(fragment: Option<&str>) -> Self {
        let fragment = fragment.map(|fragment| fragment.strip_prefix('#').unwrap_or(fragment));

        match fragment {
            None | Some("") | Some(THIS_MONTH_TOKEN) => Period::ThisMonth,
            Some(token) => Period::YearMonth(token.to_owned()),
        }
    }

    /// Resolve the period from a full location, e.g. "https://example.com/#2023-05".
    pub fn from_location(location: &str) -> Self {
        Self::resolve(location.split_once('#').map(|(_, fragment)| fragment))
    }

    /// The token identifying this period in the expense API path.
    pub fn token(&self) -> &str {
        match self {
            Period::ThisMonth => THIS_MONTH_TOKEN,
            Period::YearMonth(token) => token,
        }
    }

    /// The year-and-month token for historical periods, `None` for the current month.
    pub fn year_and_month(&self) -> Option<&str> {
        match self {
            Period::ThisMonth => None,
            Period::YearMonth(token) => Some(token),
        }
    }

    /// A human readable label, e.g. "May 2023".
    ///
    /// Tokens that do not look like "YYYY-MM" are shown as is.
    pub fn label(&self) -> String {
        match self {
            Period::ThisMonth => "This month".to_owned(),
            Period::YearMonth(token) => match parse_year_and_month(token) {
                Some((year, month)) => format!("{month} {year}"),
                None => token.clone(),
            },
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

fn parse_year_and_month(token: &str) -> Option<(i32, Month)> {
    let (year, month) = token.split_once('-')?;

    if year.len() != 4 || month.len() != 2 {
        return None;
    }

    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u8>().ok()?;
    let month = Month::try_from(month).ok()?;

    Some((year, month))
}
