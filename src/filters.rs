//! Filter controls and query building
//!
//! The admin dashboard has seven controls. Five narrow the data set and are
//! shared by the KPI and pie endpoints; the two top-N controls limit one pie
//! chart each. A control left at the empty string means "no filter" and is
//! omitted from the query entirely.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::model::{FilterVocabulary, SelectOption};

/// Every control that triggers a dashboard refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterControl {
    User,
    Office,
    Head,
    Subhead,
    Date,
    HeadTop,
    OfficeTop,
}

impl FilterControl {
    /// The five controls shared by KPIs and both pies
    pub const SHARED: [FilterControl; 5] = [
        FilterControl::User,
        FilterControl::Office,
        FilterControl::Head,
        FilterControl::Subhead,
        FilterControl::Date,
    ];

    /// All controls whose change event refreshes the dashboard
    pub const ALL: [FilterControl; 7] = [
        FilterControl::User,
        FilterControl::Office,
        FilterControl::Head,
        FilterControl::Subhead,
        FilterControl::Date,
        FilterControl::HeadTop,
        FilterControl::OfficeTop,
    ];

    /// Query parameter key sent to the backend
    pub fn key(&self) -> &'static str {
        match self {
            FilterControl::User => "user",
            FilterControl::Office => "office",
            FilterControl::Head => "head",
            FilterControl::Subhead => "subhead",
            FilterControl::Date => "date",
            FilterControl::HeadTop | FilterControl::OfficeTop => "top",
        }
    }

    /// Element id of the control on the page
    pub fn element_id(&self) -> &'static str {
        match self {
            FilterControl::User => "f-user",
            FilterControl::Office => "f-office",
            FilterControl::Head => "f-head",
            FilterControl::Subhead => "f-subhead",
            FilterControl::Date => "f-date",
            FilterControl::HeadTop => "head-top",
            FilterControl::OfficeTop => "office-top",
        }
    }

    /// Label of the "no filter" option for select controls
    pub fn sentinel_label(&self) -> Option<&'static str> {
        match self {
            FilterControl::User => Some("All Users"),
            FilterControl::Office => Some("All Offices"),
            FilterControl::Head => Some("All Heads"),
            FilterControl::Subhead => Some("All Subheads"),
            _ => None,
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.element_id() == id)
    }
}

/// Current values of the five shared filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub user: String,
    pub office: String,
    pub head: String,
    pub subhead: String,
    pub date: String,
}

impl FilterState {
    pub fn get(&self, control: FilterControl) -> &str {
        match control {
            FilterControl::User => &self.user,
            FilterControl::Office => &self.office,
            FilterControl::Head => &self.head,
            FilterControl::Subhead => &self.subhead,
            FilterControl::Date => &self.date,
            FilterControl::HeadTop | FilterControl::OfficeTop => "",
        }
    }

    /// Set a shared control. Top-N controls are not part of this state.
    pub fn set(&mut self, control: FilterControl, value: impl Into<String>) {
        let value = value.into();
        match control {
            FilterControl::User => self.user = value,
            FilterControl::Office => self.office = value,
            FilterControl::Head => self.head = value,
            FilterControl::Subhead => self.subhead = value,
            FilterControl::Date => self.date = value,
            FilterControl::HeadTop | FilterControl::OfficeTop => {}
        }
    }

    pub fn with(mut self, control: FilterControl, value: impl Into<String>) -> Self {
        self.set(control, value);
        self
    }

    /// Non-empty controls as `(key, value)` pairs, in control order
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        FilterControl::SHARED
            .iter()
            .map(|c| (c.key(), self.get(*c)))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.params().is_empty()
    }

    /// Query string for the KPI endpoint
    pub fn to_query(&self) -> String {
        encode_query(&self.params())
    }

    /// Query string for a pie endpoint
    pub fn to_query_with_top(&self, top: Option<TopN>) -> String {
        let top = top.map(|t| t.to_string());
        let mut params = self.params();
        if let Some(top) = top.as_deref() {
            params.push(("top", top));
        }
        encode_query(&params)
    }
}

/// Percent-encode `key=value` pairs joined with `&`
pub fn encode_query(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append a query string to a path, skipping the `?` when it is empty
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

/// Limit on the number of pie slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopN(u32);

impl TopN {
    /// What the backend uses when `top` is absent
    pub const BACKEND_DEFAULT: TopN = TopN(3);

    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Read a control value; empty or invalid means "not set"
    pub fn from_control(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::BACKEND_DEFAULT
    }
}

impl fmt::Display for TopN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopN {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s.parse().map_err(|_| format!("Invalid top-N value: {}", s))?;
        TopN::new(n).ok_or_else(|| "Top-N must be at least 1".to_string())
    }
}

/// Options for every select control, each led by its "All ..." sentinel
pub fn select_options(vocab: &FilterVocabulary) -> Vec<(FilterControl, Vec<SelectOption>)> {
    let with_sentinel = |control: FilterControl, rest: Vec<SelectOption>| {
        let mut options = Vec::with_capacity(rest.len() + 1);
        options.push(SelectOption::new("", control.sentinel_label().unwrap_or("All")));
        options.extend(rest);
        (control, options)
    };

    vec![
        with_sentinel(
            FilterControl::User,
            vocab
                .users
                .iter()
                .map(|u| SelectOption::new(u.id.to_string(), u.label.clone()))
                .collect(),
        ),
        with_sentinel(
            FilterControl::Office,
            vocab.offices.iter().map(|o| SelectOption::plain(o)).collect(),
        ),
        with_sentinel(
            FilterControl::Head,
            vocab.heads.iter().map(|h| SelectOption::plain(h)).collect(),
        ),
        with_sentinel(
            FilterControl::Subhead,
            vocab.subheads.iter().map(|s| SelectOption::plain(s)).collect(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserOption;

    #[test]
    fn test_empty_filters_build_empty_query() {
        let filters = FilterState::default();
        assert!(filters.is_empty());
        assert_eq!(filters.to_query(), "");
        assert_eq!(with_query("/api/dashboard/kpis", &filters.to_query()), "/api/dashboard/kpis");
    }

    #[test]
    fn test_only_non_empty_controls_are_sent() {
        // Every combination of the five shared controls
        for mask in 0u32..32 {
            let mut filters = FilterState::default();
            for (bit, control) in FilterControl::SHARED.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    filters.set(*control, format!("v{}", bit));
                }
            }

            let params = filters.params();
            assert_eq!(params.len() as u32, mask.count_ones());
            for (bit, control) in FilterControl::SHARED.iter().enumerate() {
                let present = params.iter().any(|(k, _)| *k == control.key());
                assert_eq!(present, mask & (1 << bit) != 0, "mask {:#b}", mask);
            }
        }
    }

    #[test]
    fn test_query_encoding() {
        let filters = FilterState::default()
            .with(FilterControl::Office, "New Delhi")
            .with(FilterControl::Head, "Pickup & Delivery");

        assert_eq!(filters.to_query(), "office=New%20Delhi&head=Pickup%20%26%20Delivery");
    }

    #[test]
    fn test_top_appended_last() {
        let filters = FilterState::default().with(FilterControl::User, "7");
        assert_eq!(filters.to_query_with_top(TopN::new(5)), "user=7&top=5");
        assert_eq!(filters.to_query_with_top(None), "user=7");
        assert_eq!(FilterState::default().to_query_with_top(TopN::new(3)), "top=3");
    }

    #[test]
    fn test_top_n_parsing() {
        assert_eq!(TopN::from_control(""), None);
        assert_eq!(TopN::from_control("0"), None);
        assert_eq!(TopN::from_control(" 4 "), TopN::new(4));
        assert!("abc".parse::<TopN>().is_err());
        assert_eq!(TopN::default().get(), 3);
    }

    #[test]
    fn test_element_ids_round_trip() {
        for control in FilterControl::ALL {
            assert_eq!(FilterControl::from_element_id(control.element_id()), Some(control));
        }
        assert_eq!(FilterControl::from_element_id("kpis"), None);
    }

    #[test]
    fn test_select_options_have_sentinels() {
        let vocab = FilterVocabulary {
            users: vec![UserOption { id: 3, label: "Ravi".into() }],
            offices: vec!["Mumbai".into(), "Pune".into()],
            heads: vec![],
            subheads: vec!["Fuel".into()],
        };

        let options = select_options(&vocab);
        assert_eq!(options.len(), 4);

        for (control, opts) in &options {
            assert!(opts[0].is_sentinel());
            assert_eq!(Some(opts[0].label.as_str()), control.sentinel_label());
        }

        assert_eq!(options[0].1[1], SelectOption::new("3", "Ravi"));
        assert_eq!(options[1].1.len(), 3);
        assert_eq!(options[2].1.len(), 1);
    }
}
