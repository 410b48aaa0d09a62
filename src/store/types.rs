//! Record and filter types for the lead store

use crate::pagination::Keyed;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::StoreError;

/// Pipeline status of a scraped lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Discarded,
}

impl LeadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Discarded => "discarded",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "converted" => Ok(Self::Converted),
            "discarded" => Ok(Self::Discarded),
            other => Err(format!(
                "unknown lead status '{other}' (expected new, contacted, converted or discarded)"
            )),
        }
    }
}

/// A lead produced by a scraping run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    /// Scraping run that produced the lead
    pub run_id: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Keyed for Lead {
    type Key = String;

    fn key(&self) -> &String {
        &self.id
    }
}

/// Fields supplied when creating a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub run_id: String,
}

impl NewLead {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: None,
            run_id: run_id.into(),
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

/// A contact created from a converted lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Lead the contact was converted from
    pub lead_id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub converted_at: DateTime<Utc>,
}

impl Contact {
    #[must_use]
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            lead_id: lead.id.clone(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            converted_at: Utc::now(),
        }
    }
}

/// Which leads a view shows
///
/// Field order is part of the filter signature; all fields serialize even
/// when unset so equal filters always produce equal JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadFilter {
    pub run_id: Option<String>,
    pub status: Option<LeadStatus>,
    /// Case-insensitive regex over name, email and company
    pub search: Option<String>,
}

impl LeadFilter {
    #[must_use]
    pub fn for_run(run_id: impl Into<String>) -> Self {
        Self {
            run_id: Some(run_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_search(mut self, pattern: impl Into<String>) -> Self {
        self.search = Some(pattern.into());
        self
    }

    /// Compile into a matcher
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPattern` if `search` is not a valid regex.
    pub fn compile(&self) -> Result<LeadMatcher, StoreError> {
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .transpose()?;
        Ok(LeadMatcher {
            run_id: self.run_id.clone(),
            status: self.status,
            search,
        })
    }
}

/// Compiled form of a [`LeadFilter`]
#[derive(Debug, Clone)]
pub struct LeadMatcher {
    run_id: Option<String>,
    status: Option<LeadStatus>,
    search: Option<Regex>,
}

impl LeadMatcher {
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(run) = &self.run_id
            && &lead.run_id != run
        {
            return false;
        }
        if let Some(status) = self.status
            && lead.status != status
        {
            return false;
        }
        match &self.search {
            None => true,
            Some(re) => {
                re.is_match(&lead.name)
                    || re.is_match(&lead.email)
                    || lead.company.as_deref().is_some_and(|c| re.is_match(c))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(name: &str, run: &str, status: LeadStatus) -> Lead {
        Lead {
            id: format!("L-{name}"),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            company: Some("Acme".to_string()),
            run_id: run.to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Converted".parse::<LeadStatus>().unwrap(), LeadStatus::Converted);
        assert_eq!(LeadStatus::Contacted.to_string(), "contacted");
        assert!("lost".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let matcher = LeadFilter::default().compile().unwrap();
        assert!(matcher.matches(&lead("Ana", "r1", LeadStatus::New)));
        assert!(matcher.matches(&lead("Bo", "r2", LeadStatus::Discarded)));
    }

    #[test]
    fn test_run_and_status_filter() {
        let matcher = LeadFilter::for_run("r1")
            .with_status(LeadStatus::New)
            .compile()
            .unwrap();
        assert!(matcher.matches(&lead("Ana", "r1", LeadStatus::New)));
        assert!(!matcher.matches(&lead("Ana", "r2", LeadStatus::New)));
        assert!(!matcher.matches(&lead("Ana", "r1", LeadStatus::Converted)));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let matcher = LeadFilter::default().with_search("acme").compile().unwrap();
        assert!(matcher.matches(&lead("Ana", "r1", LeadStatus::New)));

        let matcher = LeadFilter::default().with_search("^ANA@").compile().unwrap();
        assert!(matcher.matches(&lead("Ana", "r1", LeadStatus::New)));
        assert!(!matcher.matches(&lead("Bo", "r1", LeadStatus::New)));
    }

    #[test]
    fn test_invalid_search_pattern() {
        let result = LeadFilter::default().with_search("(unclosed").compile();
        assert!(matches!(result, Err(StoreError::InvalidPattern(_))));
    }

    #[test]
    fn test_filter_json_includes_unset_fields() {
        let json = serde_json::to_string(&LeadFilter::default()).unwrap();
        assert_eq!(json, r#"{"run_id":null,"status":null,"search":null}"#);
    }
}
