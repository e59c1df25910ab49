// Platform registry
// The closed set of coding platforms the dashboard tracks

use serde::{Deserialize, Serialize};

/// A coding platform tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Leetcode,
    Codeforces,
    Codechef,
    Atcoder,
    Geeksforgeeks,
    Hackerrank,
    Github,
}

impl Platform {
    /// Every tracked platform, in display order
    pub const ALL: [Platform; 7] = [
        Platform::Leetcode,
        Platform::Codeforces,
        Platform::Codechef,
        Platform::Atcoder,
        Platform::Geeksforgeeks,
        Platform::Hackerrank,
        Platform::Github,
    ];

    /// Lowercase wire key, as used in API paths and JSON field names
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Leetcode => "leetcode",
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Atcoder => "atcoder",
            Platform::Geeksforgeeks => "geeksforgeeks",
            Platform::Hackerrank => "hackerrank",
            Platform::Github => "github",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Leetcode => "LeetCode",
            Platform::Codeforces => "Codeforces",
            Platform::Codechef => "CodeChef",
            Platform::Atcoder => "AtCoder",
            Platform::Geeksforgeeks => "GeeksforGeeks",
            Platform::Hackerrank => "HackerRank",
            Platform::Github => "GitHub",
        }
    }

    /// Resolve a profile field name like "leetcodeStats" (or a bare
    /// "leetcode") to its platform. Unknown names resolve to None.
    pub fn from_bundle_key(key: &str) -> Option<Platform> {
        let lower = key.to_lowercase();
        let name = lower.strip_suffix("stats").unwrap_or(&lower);
        Platform::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower || p.label().to_lowercase() == lower)
            .ok_or_else(|| format!("Unknown platform: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bundle_key_strips_stats_suffix() {
        assert_eq!(Platform::from_bundle_key("leetcodeStats"), Some(Platform::Leetcode));
        assert_eq!(Platform::from_bundle_key("codeforcesStats"), Some(Platform::Codeforces));
        assert_eq!(Platform::from_bundle_key("geeksforgeeksStats"), Some(Platform::Geeksforgeeks));
    }

    #[test]
    fn test_from_bundle_key_accepts_bare_names() {
        assert_eq!(Platform::from_bundle_key("codechef"), Some(Platform::Codechef));
        assert_eq!(Platform::from_bundle_key("AtCoder"), Some(Platform::Atcoder));
    }

    #[test]
    fn test_from_bundle_key_is_case_insensitive() {
        assert_eq!(Platform::from_bundle_key("LeetCodeStats"), Some(Platform::Leetcode));
        assert_eq!(Platform::from_bundle_key("HACKERRANKSTATS"), Some(Platform::Hackerrank));
    }

    #[test]
    fn test_from_bundle_key_rejects_unknown() {
        assert_eq!(Platform::from_bundle_key("kaggleStats"), None);
        assert_eq!(Platform::from_bundle_key("Stats"), None);
        assert_eq!(Platform::from_bundle_key(""), None);
    }

    #[test]
    fn test_from_str_accepts_labels_and_keys() {
        assert_eq!("leetcode".parse::<Platform>(), Ok(Platform::Leetcode));
        assert_eq!("GeeksforGeeks".parse::<Platform>(), Ok(Platform::Geeksforgeeks));
        assert!("unknown".parse::<Platform>().is_err());
    }

    #[test]
    fn test_wire_key_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_bundle_key(platform.as_str()), Some(platform));
        }
    }
}
