use serde::{Deserialize, Serialize};

/// Outcome of one successful analysis pass, handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta_percent: f64,
    pub improved: bool,
    pub is_first_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    /// First capture; nothing to compare against yet.
    Baseline,
    Rising,
    Dipping,
    Steady,
}

impl AnalysisResult {
    pub fn trend(&self) -> Trend {
        if self.is_first_time {
            Trend::Baseline
        } else if self.improved && self.delta_percent > 0.0 {
            Trend::Rising
        } else if !self.improved && self.delta_percent < 0.0 {
            Trend::Dipping
        } else {
            Trend::Steady
        }
    }

    /// One-line description suitable for a share card caption.
    pub fn summary_line(&self) -> String {
        match self.trend() {
            Trend::Baseline => {
                "Baseline under-eye brightness recorded. Come back tomorrow to see the change."
                    .to_string()
            }
            Trend::Rising => format!(
                "Under-eye brightness is up {}% from baseline.",
                self.delta_percent
            ),
            _ => format!(
                "Under-eye brightness changed {}% from baseline.",
                self.delta_percent
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(delta_percent: f64, improved: bool, is_first_time: bool) -> AnalysisResult {
        AnalysisResult {
            baseline_score: 100.0,
            current_score: 100.0 + delta_percent,
            delta_percent,
            improved,
            is_first_time,
        }
    }

    #[test]
    fn trend_follows_delta_and_first_run() {
        assert_eq!(result(0.0, false, true).trend(), Trend::Baseline);
        assert_eq!(result(4.2, true, false).trend(), Trend::Rising);
        assert_eq!(result(-3.1, false, false).trend(), Trend::Dipping);
        assert_eq!(result(0.0, false, false).trend(), Trend::Steady);
        // improved by less than the rounding step
        assert_eq!(result(0.0, true, false).trend(), Trend::Steady);
    }

    #[test]
    fn summary_mentions_delta() {
        assert_eq!(
            result(8.7, true, false).summary_line(),
            "Under-eye brightness is up 8.7% from baseline."
        );
        assert_eq!(
            result(-1.5, false, false).summary_line(),
            "Under-eye brightness changed -1.5% from baseline."
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(result(0.0, false, true)).unwrap();
        assert_eq!(json["isFirstTime"], true);
        assert_eq!(json["deltaPercent"], 0.0);
    }
}
