use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GrantsError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lifecycle state of a funding round. Derived on every query, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Upcoming,
    Active,
    Closed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Upcoming => "upcoming",
            RoundStatus::Active => "active",
            RoundStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" => Some(RoundStatus::Upcoming),
            "active" => Some(RoundStatus::Active),
            "closed" => Some(RoundStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar window of a round. Effective dates, when set, drive eligibility
/// while the display dates stay untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub effective_start_date: Option<NaiveDate>,
    pub effective_end_date: Option<NaiveDate>,
}

impl RoundWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            effective_start_date: None,
            effective_end_date: None,
        }
    }

    pub fn with_effective_dates(
        mut self,
        effective_start_date: Option<NaiveDate>,
        effective_end_date: Option<NaiveDate>,
    ) -> Self {
        self.effective_start_date = effective_start_date;
        self.effective_end_date = effective_end_date;
        self
    }

    /// Build a window from `YYYY-MM-DD` strings.
    pub fn parse(
        start_date: &str,
        end_date: &str,
        effective_start_date: Option<&str>,
        effective_end_date: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            start_date: parse_date(start_date)?,
            end_date: parse_date(end_date)?,
            effective_start_date: effective_start_date.map(parse_date).transpose()?,
            effective_end_date: effective_end_date.map(parse_date).transpose()?,
        })
    }

    /// First AoE day on which the round accepts applications.
    pub fn status_start(&self) -> NaiveDate {
        self.effective_start_date.unwrap_or(self.start_date)
    }

    /// Last AoE day on which the round accepts applications.
    pub fn status_end(&self) -> NaiveDate {
        self.effective_end_date.unwrap_or(self.end_date)
    }

    /// True when the dates used for status computation run backwards.
    pub fn is_inverted(&self) -> bool {
        self.status_start() > self.status_end()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| GrantsError::InvalidDate {
        value: value.to_string(),
    })
}

/// Round metadata as persisted in the content store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundFrontmatter {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(rename = "startDate", alias = "startdate", alias = "start_date")]
    pub start_date: String,
    #[serde(rename = "endDate", alias = "enddate", alias = "end_date")]
    pub end_date: String,
    #[serde(
        rename = "effectiveStartDate",
        alias = "effectivestartdate",
        alias = "effective_start_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_start_date: Option<String>,
    #[serde(
        rename = "effectiveEndDate",
        alias = "effectiveenddate",
        alias = "effective_end_date",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_end_date: Option<String>,
}

impl RoundFrontmatter {
    pub fn window(&self) -> Result<RoundWindow> {
        RoundWindow::parse(
            &self.start_date,
            &self.end_date,
            self.effective_start_date.as_deref(),
            self.effective_end_date.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Round {
    pub id: String,
    pub frontmatter: RoundFrontmatter,
    pub body: String,
}
