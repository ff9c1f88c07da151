use std::fmt;

use tracing::info;

/// Comparison policy used to grade an attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Trimmed, case-folded equality
    #[default]
    Exact,
    /// Canonical answer contains the trimmed, case-folded candidate
    Contains,
}

impl MatchPolicy {
    pub fn matches(self, candidate: &str, canonical: &str) -> bool {
        let candidate = normalize(candidate);
        let canonical = normalize(canonical);
        match self {
            MatchPolicy::Exact => candidate == canonical,
            MatchPolicy::Contains => !candidate.is_empty() && canonical.contains(&candidate),
        }
    }

    /// Parse a policy name, falling back to `Exact` for unknown values
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "exact" | "equals" => MatchPolicy::Exact,
            "contains" | "substring" => MatchPolicy::Contains,
            _ => {
                info!("Unknown match policy '{}', defaulting to exact", name);
                MatchPolicy::Exact
            }
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "exact"),
            MatchPolicy::Contains => write!(f, "contains"),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Grade with the default exact policy
pub fn matches(candidate: &str, canonical: &str) -> bool {
    MatchPolicy::Exact.matches(candidate, canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        assert!(matches(" Paris ", "paris"));
        assert!(matches("H2O", "h2o"));
        assert!(matches("París", "PARÍS"));
    }

    #[test]
    fn test_exact_match_rejects_near_misses() {
        assert!(!matches("Pariss", "Paris"));
        assert!(!matches("Paris", "Paris, France"));
        assert!(!matches("", "Paris"));
    }

    #[test]
    fn test_contains_policy() {
        let policy = MatchPolicy::Contains;
        assert!(policy.matches("Paris", "Paris, France"));
        assert!(policy.matches(" FRANCE", "Paris, France"));
        assert!(!policy.matches("Lyon", "Paris, France"));
        assert!(!policy.matches("   ", "Paris, France"));
    }

    #[test]
    fn test_policy_parsing() {
        let test_cases = vec![
            ("exact", MatchPolicy::Exact),
            ("EXACT", MatchPolicy::Exact),
            ("contains", MatchPolicy::Contains),
            ("Substring", MatchPolicy::Contains),
            ("fuzzy", MatchPolicy::Exact), // defaults to exact
        ];

        for (input, expected) in test_cases {
            assert_eq!(MatchPolicy::from_name(input), expected, "Input '{}'", input);
        }
    }
}
