//! Scoring rules.

use std::str::FromStr;

use crate::crypto::Address;

/// How an address is scored. Higher is rarer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreRule {
    /// Consecutive "00" byte pairs at the start of the address
    #[default]
    LeadingZeroBytes,
    /// Consecutive '0' hex digits at the start of the address
    LeadingZeroNibbles,
    /// The longer of the identical-character runs at the start and at the end
    LongestUniformRun,
}

impl FromStr for ScoreRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leading-zero-bytes" | "bytes" | "zero-bytes" => Ok(ScoreRule::LeadingZeroBytes),
            "leading-zero-nibbles" | "nibbles" | "zeros" => Ok(ScoreRule::LeadingZeroNibbles),
            "longest-run" | "run" | "uniform" => Ok(ScoreRule::LongestUniformRun),
            _ => Err(format!("Unknown score rule: {}", s)),
        }
    }
}

impl std::fmt::Display for ScoreRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreRule::LeadingZeroBytes => write!(f, "leading-zero-bytes"),
            ScoreRule::LeadingZeroNibbles => write!(f, "leading-zero-nibbles"),
            ScoreRule::LongestUniformRun => write!(f, "longest-run"),
        }
    }
}

impl ScoreRule {
    /// Scores a lowercase hex address (no 0x prefix).
    #[inline]
    pub fn score(self, hex: &str) -> u32 {
        let bytes = hex.as_bytes();
        let count = match self {
            ScoreRule::LeadingZeroBytes => bytes
                .chunks_exact(2)
                .take_while(|pair| *pair == b"00")
                .count(),
            ScoreRule::LeadingZeroNibbles => bytes.iter().take_while(|&&c| c == b'0').count(),
            ScoreRule::LongestUniformRun => {
                let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
                    return 0;
                };
                let leading = bytes.iter().take_while(|&&c| c == first).count();
                let trailing = bytes.iter().rev().take_while(|&&c| c == last).count();
                leading.max(trailing)
            }
        };
        count as u32
    }

    #[inline]
    pub fn score_address(self, address: &Address) -> u32 {
        self.score(&address.to_hex())
    }

    /// Search space multiplier for each additional point of score.
    pub fn difficulty_base(self) -> u32 {
        match self {
            ScoreRule::LeadingZeroBytes => 256,
            ScoreRule::LeadingZeroNibbles | ScoreRule::LongestUniformRun => 16,
        }
    }

    /// Highest score a 20-byte address can reach.
    pub fn max_score(self) -> u32 {
        match self {
            ScoreRule::LeadingZeroBytes => 20,
            ScoreRule::LeadingZeroNibbles | ScoreRule::LongestUniformRun => 40,
        }
    }

    /// Expected candidates needed to reach `score`.
    pub fn estimated_attempts(self, score: u32) -> u64 {
        u64::from(self.difficulty_base()).saturating_pow(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_bytes() {
        let rule = ScoreRule::LeadingZeroBytes;
        assert_eq!(rule.score("0000ab0000000000000000000000000000000000"), 2);
        assert_eq!(rule.score("000abc0000000000000000000000000000000000"), 1);
        assert_eq!(rule.score("9858effd232b4033e47d90003d41ec34ecaeda94"), 0);
        assert_eq!(rule.score(&"0".repeat(40)), 20);
    }

    #[test]
    fn test_leading_zero_nibbles() {
        let rule = ScoreRule::LeadingZeroNibbles;
        assert_eq!(rule.score("000abc0000000000000000000000000000000000"), 3);
        assert_eq!(rule.score("a000000000000000000000000000000000000000"), 0);
    }

    #[test]
    fn test_longest_run_prefers_longer_end() {
        let rule = ScoreRule::LongestUniformRun;
        let addr = format!("00{}fffff", "1".repeat(33));
        assert_eq!(addr.len(), 40);
        assert_eq!(rule.score(&addr), 5);

        let addr = format!("aaaa{}b", "c".repeat(35));
        assert_eq!(rule.score(&addr), 4);
        assert_eq!(rule.score(&"7".repeat(40)), 40);
        assert_eq!(rule.score(""), 0);
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!("bytes".parse::<ScoreRule>().unwrap(), ScoreRule::LeadingZeroBytes);
        assert_eq!(
            "Leading-Zero-Nibbles".parse::<ScoreRule>().unwrap(),
            ScoreRule::LeadingZeroNibbles
        );
        assert_eq!("run".parse::<ScoreRule>().unwrap(), ScoreRule::LongestUniformRun);
        assert!("prefix".parse::<ScoreRule>().is_err());
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(ScoreRule::LeadingZeroBytes.estimated_attempts(2), 65536);
        assert_eq!(ScoreRule::LeadingZeroNibbles.estimated_attempts(4), 65536);
    }
}
