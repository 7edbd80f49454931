use serde::Serialize;

/// Where a rule's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContributionSource {
    /// The rule's own field had a value.
    Primary,
    /// The primary field was empty and the alternate chain supplied the text.
    Alternate,
    /// The rule's static default was used.
    Default,
    /// The rule's condition was false.
    SkippedByCondition,
    /// Nothing resolved.
    Empty,
}

impl ContributionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionSource::Primary => "primary",
            ContributionSource::Alternate => "alternate",
            ContributionSource::Default => "default",
            ContributionSource::SkippedByCondition => "skipped",
            ContributionSource::Empty => "empty",
        }
    }
}

/// Result of resolving one field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub field: String,
    pub source: ContributionSource,
    pub text: String,
}

impl Contribution {
    pub fn contributes(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Aggregated view of how the rules produced a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameOutcome {
    pub value: String,
    pub contributions: Vec<Contribution>,
    pub truncated: bool,
}

impl NameOutcome {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            contributions: Vec::new(),
            truncated: false,
        }
    }

    pub fn record(&mut self, field: impl Into<String>, source: ContributionSource, text: String) {
        self.value.push_str(&text);
        self.contributions.push(Contribution {
            field: field.into(),
            source,
            text,
        });
    }

    /// Fields whose text made it into the concatenation, in order.
    pub fn contributing_fields(&self) -> Vec<&str> {
        self.contributions
            .iter()
            .filter(|contribution| contribution.contributes())
            .map(|contribution| contribution.field.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Default for NameOutcome {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_contributions_in_order() {
        let mut outcome = NameOutcome::new();
        outcome.record("first", ContributionSource::Primary, "Ada ".into());
        outcome.record("middle", ContributionSource::Empty, String::new());
        outcome.record("last", ContributionSource::Default, "Lovelace".into());

        assert_eq!(outcome.value, "Ada Lovelace");
        assert_eq!(outcome.contributing_fields(), vec!["first", "last"]);
        assert_eq!(outcome.len(), 12);
    }

    #[test]
    fn serializes_sources_in_camel_case() {
        let json = serde_json::to_value(ContributionSource::SkippedByCondition).unwrap();
        assert_eq!(json, serde_json::json!("skippedByCondition"));
    }
}
