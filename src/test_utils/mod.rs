#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod upstream;

pub(crate) use fixtures::{CATEGORY_SUMMARY_JSON, EXPENSE_SUMMARY_JSON, StubSource};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_markup, select_text};
pub(crate) use http::assert_html_ok;
pub(crate) use upstream::{spawn_fake_upstream, spawn_slow_upstream};
