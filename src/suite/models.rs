use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordWithVolume {
    pub keyword: String,
    pub search_volume: String,
}

impl KeywordWithVolume {
    pub fn new(keyword: impl Into<String>, search_volume: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: search_volume.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Keywords {
    pub primary_keywords: Vec<KeywordWithVolume>,
    pub long_tail_keywords: Vec<KeywordWithVolume>,
    pub question_based_keywords: Vec<KeywordWithVolume>,
    pub lsi_keywords: Vec<KeywordWithVolume>,
}

impl Keywords {
    /// Groups in display order with their headings.
    pub fn groups(&self) -> [(&'static str, &[KeywordWithVolume]); 4] {
        [
            ("Primary Keywords", self.primary_keywords.as_slice()),
            ("Long-Tail Keywords", self.long_tail_keywords.as_slice()),
            ("Question-Based Keywords", self.question_based_keywords.as_slice()),
            ("LSI Keywords", self.lsi_keywords.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub url: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerpAnalysis {
    pub competitors: Vec<Competitor>,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorKeywordInfo {
    pub keyword: String,
    pub rank: String,
    pub search_volume: String,
    pub difficulty: String,
}

pub type CompetitorKeywords = Vec<CompetitorKeywordInfo>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    #[serde(default)]
    pub subheadings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentBriefData {
    pub title_suggestion: String,
    pub meta_description_suggestion: String,
    pub outline: Vec<OutlineSection>,
    pub lsi_keywords: Vec<String>,
    pub suggested_word_count: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationResult {
    pub seo_score: f64,
    pub keyword_density: String,
    pub readability: String,
    pub title_and_headings: String,
    pub meta_description: String,
    pub linking: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWithDescription {
    pub keyword: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordStrategyResult {
    pub informational_keywords: Vec<KeywordWithDescription>,
    pub commercial_keywords: Vec<KeywordWithDescription>,
    pub transactional_keywords: Vec<KeywordWithDescription>,
}

impl KeywordStrategyResult {
    pub fn intents(&self) -> [(&'static str, &[KeywordWithDescription]); 3] {
        [
            ("Informational", self.informational_keywords.as_slice()),
            ("Commercial", self.commercial_keywords.as_slice()),
            ("Transactional", self.transactional_keywords.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCluster {
    pub pillar_keyword: String,
    pub cluster_description: String,
    pub cluster_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicClusterResult {
    pub topic_clusters: Vec<TopicCluster>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordStrategy {
    pub keyword_analysis: KeywordStrategyResult,
    pub topic_clusters: TopicClusterResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Pass,
    Fail,
    Warning,
    Info,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditStatus::Pass => "Pass",
            AuditStatus::Fail => "Fail",
            AuditStatus::Warning => "Warning",
            AuditStatus::Info => "Info",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditCheck {
    pub check: String,
    pub status: AuditStatus,
    pub recommendation: String,
}

impl AuditCheck {
    pub fn new(check: &str, status: AuditStatus, recommendation: &str) -> Self {
        Self {
            check: check.to_string(),
            status,
            recommendation: recommendation.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoAuditResult {
    pub overall_score: f64,
    pub on_page_seo: Vec<AuditCheck>,
    pub content_quality: Vec<AuditCheck>,
    pub technical_seo: Vec<AuditCheck>,
}

impl SeoAuditResult {
    pub fn sections(&self) -> [(&'static str, &[AuditCheck]); 3] {
        [
            ("On-Page SEO", self.on_page_seo.as_slice()),
            ("Content Quality", self.content_quality.as_slice()),
            ("Technical SEO", self.technical_seo.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_use_camel_case() {
        let keywords = Keywords {
            primary_keywords: vec![KeywordWithVolume::new("vegan cake", "12K")],
            ..Keywords::default()
        };

        let json = serde_json::to_value(&keywords).unwrap();

        assert_eq!(json["primaryKeywords"][0]["searchVolume"], "12K");
        assert!(json.get("longTailKeywords").is_some());
    }

    #[test]
    fn test_missing_keyword_groups_default_to_empty() {
        let keywords: Keywords =
            serde_json::from_str(r#"{"primaryKeywords":[{"keyword":"a","searchVolume":"1K"}]}"#).unwrap();

        assert_eq!(keywords.primary_keywords.len(), 1);
        assert!(keywords.lsi_keywords.is_empty());
    }

    #[test]
    fn test_audit_status_parses_capitalized_names() {
        let check: AuditCheck =
            serde_json::from_str(r#"{"check":"Title Tag","status":"Warning","recommendation":"Shorten it."}"#)
                .unwrap();

        assert_eq!(check.status, AuditStatus::Warning);
        assert_eq!(check.status.to_string(), "Warning");
    }
}
