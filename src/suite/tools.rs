use super::backend::{BackendError, SeoBackend};
use super::models::{
    CompetitorKeywords, ContentBriefData, KeywordStrategy, Keywords, OptimizationResult, SeoAuditResult,
    SerpAnalysis,
};
use super::route::ToolKind;
use super::store::ToolPage;
use super::ToolSuite;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Missing input, reported before any request is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

pub trait Tool: Sized + 'static {
    const KIND: ToolKind;
    const STORAGE_KEY: &'static str;
    const TITLE: &'static str;
    /// Labels of the editable input fields, in form order.
    const FIELDS: &'static [&'static str];
    const FAILURE: &'static str;

    type Query: Clone + Default + PartialEq + Debug + Serialize + DeserializeOwned + Send + 'static;
    type Output: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + 'static;

    fn field(query: &Self::Query, index: usize) -> Option<&str>;
    fn field_mut(query: &mut Self::Query, index: usize) -> Option<&mut String>;
    fn validate(query: &Self::Query) -> Result<(), ValidationError>;
    fn request(backend: &dyn SeoBackend, query: &Self::Query) -> Result<Self::Output, BackendError>;
    fn summary(query: &Self::Query) -> String;
    fn describe(output: &Self::Output) -> Vec<String>;

    fn page(suite: &ToolSuite) -> &ToolPage<Self>;
    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self>;

    fn failure_message(_error: &BackendError) -> String {
        Self::FAILURE.to_string()
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ---------------------------------------------------------------- keywords

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub topic: String,
}

pub struct KeywordResearchTool;

impl Tool for KeywordResearchTool {
    const KIND: ToolKind = ToolKind::KeywordResearch;
    const STORAGE_KEY: &'static str = "savedKeywordAnalyses";
    const TITLE: &'static str = "Keyword Research";
    const FIELDS: &'static [&'static str] = &["Topic"];
    const FAILURE: &'static str = "Failed to generate keywords. Please try again.";

    type Query = KeywordQuery;
    type Output = Keywords;

    fn field(query: &KeywordQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.topic),
            _ => None,
        }
    }

    fn field_mut(query: &mut KeywordQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.topic),
            _ => None,
        }
    }

    fn validate(query: &KeywordQuery) -> Result<(), ValidationError> {
        if blank(&query.topic) {
            return Err(ValidationError("Please enter a topic."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &KeywordQuery) -> Result<Keywords, BackendError> {
        backend.generate_keywords(query.topic.trim())
    }

    fn summary(query: &KeywordQuery) -> String {
        query.topic.clone()
    }

    fn describe(output: &Keywords) -> Vec<String> {
        let mut lines = Vec::new();
        for (heading, keywords) in output.groups() {
            if keywords.is_empty() {
                continue;
            }
            lines.push(heading.to_string());
            for kw in keywords {
                lines.push(format!("  {}  [{}]", kw.keyword, kw.search_volume));
            }
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.keyword_research
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.keyword_research
    }
}

// -------------------------------------------------------------------- SERP

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerpQuery {
    pub keyword: String,
    pub domain: String,
}

pub struct SerpTool;

impl Tool for SerpTool {
    const KIND: ToolKind = ToolKind::SerpAnalysis;
    const STORAGE_KEY: &'static str = "savedSerpAnalyses";
    const TITLE: &'static str = "SERP Analysis";
    const FIELDS: &'static [&'static str] = &["Keyword", "Your domain"];
    const FAILURE: &'static str = "Failed to analyze SERP. Please try again.";

    type Query = SerpQuery;
    type Output = SerpAnalysis;

    fn field(query: &SerpQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.keyword),
            1 => Some(&query.domain),
            _ => None,
        }
    }

    fn field_mut(query: &mut SerpQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.keyword),
            1 => Some(&mut query.domain),
            _ => None,
        }
    }

    fn validate(query: &SerpQuery) -> Result<(), ValidationError> {
        if blank(&query.keyword) || blank(&query.domain) {
            return Err(ValidationError("Please enter both a keyword and your domain."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &SerpQuery) -> Result<SerpAnalysis, BackendError> {
        backend.analyze_serp(query.keyword.trim(), query.domain.trim())
    }

    fn failure_message(error: &BackendError) -> String {
        error.to_string()
    }

    fn summary(query: &SerpQuery) -> String {
        format!("{} ({})", query.keyword, query.domain)
    }

    fn describe(output: &SerpAnalysis) -> Vec<String> {
        let mut lines = vec!["Top Competitors".to_string()];
        for (i, competitor) in output.competitors.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, competitor.title));
            lines.push(format!("     {}", competitor.url));
            lines.push(format!("     {}", competitor.description));
        }
        lines.push(String::new());
        lines.push("Analysis".to_string());
        lines.push(format!("  {}", output.analysis));
        lines.push(String::new());
        lines.push("Recommendations".to_string());
        for recommendation in &output.recommendations {
            lines.push(format!("  - {}", recommendation));
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.serp_analysis
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.serp_analysis
    }
}

// ----------------------------------------------------- competitor keywords

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorQuery {
    pub domain: String,
}

pub struct CompetitorKeywordsTool;

impl Tool for CompetitorKeywordsTool {
    const KIND: ToolKind = ToolKind::CompetitorKeywords;
    const STORAGE_KEY: &'static str = "savedCompetitorKeywordAnalyses";
    const TITLE: &'static str = "Competitor Keywords";
    const FIELDS: &'static [&'static str] = &["Competitor domain"];
    const FAILURE: &'static str = "Failed to find competitor keywords.";

    type Query = CompetitorQuery;
    type Output = CompetitorKeywords;

    fn field(query: &CompetitorQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.domain),
            _ => None,
        }
    }

    fn field_mut(query: &mut CompetitorQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.domain),
            _ => None,
        }
    }

    fn validate(query: &CompetitorQuery) -> Result<(), ValidationError> {
        if blank(&query.domain) {
            return Err(ValidationError("Please enter a competitor domain."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &CompetitorQuery) -> Result<CompetitorKeywords, BackendError> {
        backend.find_competitor_keywords(query.domain.trim())
    }

    fn failure_message(error: &BackendError) -> String {
        error.to_string()
    }

    fn summary(query: &CompetitorQuery) -> String {
        query.domain.clone()
    }

    fn describe(output: &CompetitorKeywords) -> Vec<String> {
        let mut lines = vec![format!("{:<32} {:>6} {:>8}  {}", "Keyword", "Rank", "Volume", "Difficulty")];
        for item in output {
            lines.push(format!(
                "{:<32} {:>6} {:>8}  {}",
                item.keyword, item.rank, item.search_volume, item.difficulty
            ));
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.competitor_keywords
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.competitor_keywords
    }
}

// ----------------------------------------------------------- content brief

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BriefQuery {
    pub keyword: String,
}

pub struct ContentBriefTool;

impl Tool for ContentBriefTool {
    const KIND: ToolKind = ToolKind::ContentBrief;
    const STORAGE_KEY: &'static str = "savedContentBriefs";
    const TITLE: &'static str = "Content Brief";
    const FIELDS: &'static [&'static str] = &["Target keyword"];
    const FAILURE: &'static str = "Failed to create content brief. Please try again.";

    type Query = BriefQuery;
    type Output = ContentBriefData;

    fn field(query: &BriefQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.keyword),
            _ => None,
        }
    }

    fn field_mut(query: &mut BriefQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.keyword),
            _ => None,
        }
    }

    fn validate(query: &BriefQuery) -> Result<(), ValidationError> {
        if blank(&query.keyword) {
            return Err(ValidationError("Please enter a target keyword."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &BriefQuery) -> Result<ContentBriefData, BackendError> {
        backend.create_content_brief(query.keyword.trim())
    }

    fn summary(query: &BriefQuery) -> String {
        query.keyword.clone()
    }

    fn describe(output: &ContentBriefData) -> Vec<String> {
        let mut lines = vec![
            format!("Title: {}", output.title_suggestion),
            format!("Meta description: {}", output.meta_description_suggestion),
            format!("Target audience: {}", output.target_audience),
            format!("Suggested word count: {}", output.suggested_word_count),
            String::new(),
            "Outline".to_string(),
        ];
        for section in &output.outline {
            lines.push(format!("  H2 {}", section.heading));
            for sub in &section.subheadings {
                lines.push(format!("    H3 {}", sub));
            }
        }
        if !output.lsi_keywords.is_empty() {
            lines.push(String::new());
            lines.push(format!("LSI keywords: {}", output.lsi_keywords.join(", ")));
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.content_brief
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.content_brief
    }
}

// --------------------------------------------------------------- optimizer

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerQuery {
    pub keyword: String,
    pub content: String,
}

pub struct OptimizerTool;

impl Tool for OptimizerTool {
    const KIND: ToolKind = ToolKind::OnPageOptimizer;
    const STORAGE_KEY: &'static str = "savedOptimizerReports";
    const TITLE: &'static str = "On-Page Optimizer";
    const FIELDS: &'static [&'static str] = &["Target keyword", "Content"];
    const FAILURE: &'static str = "Failed to optimize content. Please try again.";

    type Query = OptimizerQuery;
    type Output = OptimizationResult;

    fn field(query: &OptimizerQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.keyword),
            1 => Some(&query.content),
            _ => None,
        }
    }

    fn field_mut(query: &mut OptimizerQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.keyword),
            1 => Some(&mut query.content),
            _ => None,
        }
    }

    fn validate(query: &OptimizerQuery) -> Result<(), ValidationError> {
        if blank(&query.keyword) || blank(&query.content) {
            return Err(ValidationError("Please enter a keyword and content to optimize."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &OptimizerQuery) -> Result<OptimizationResult, BackendError> {
        backend.optimize_content(query.keyword.trim(), &query.content)
    }

    fn summary(query: &OptimizerQuery) -> String {
        query.keyword.clone()
    }

    fn describe(output: &OptimizationResult) -> Vec<String> {
        vec![
            format!("SEO score: {}/100", output.seo_score),
            format!("Keyword density: {}", output.keyword_density),
            format!("Readability: {}", output.readability),
            format!("Title & headings: {}", output.title_and_headings),
            format!("Meta description: {}", output.meta_description),
            format!("Linking: {}", output.linking),
        ]
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.optimizer
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.optimizer
    }
}

// ---------------------------------------------------------------- strategy

pub const DEFAULT_GOAL: &str = "Increase Website Traffic";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyQuery {
    pub goal: String,
    pub audience: String,
    pub seed_keywords: String,
}

impl Default for StrategyQuery {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL.to_string(),
            audience: String::new(),
            seed_keywords: String::new(),
        }
    }
}

pub struct StrategyTool;

impl Tool for StrategyTool {
    const KIND: ToolKind = ToolKind::KeywordStrategy;
    const STORAGE_KEY: &'static str = "savedKeywordStrategies";
    const TITLE: &'static str = "Keyword Strategist";
    const FIELDS: &'static [&'static str] = &["Goal", "Audience", "Seed keywords"];
    const FAILURE: &'static str = "Failed to create topic clusters. Please try again.";

    type Query = StrategyQuery;
    type Output = KeywordStrategy;

    fn field(query: &StrategyQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.goal),
            1 => Some(&query.audience),
            2 => Some(&query.seed_keywords),
            _ => None,
        }
    }

    fn field_mut(query: &mut StrategyQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.goal),
            1 => Some(&mut query.audience),
            2 => Some(&mut query.seed_keywords),
            _ => None,
        }
    }

    fn validate(query: &StrategyQuery) -> Result<(), ValidationError> {
        if blank(&query.audience) || blank(&query.seed_keywords) {
            return Err(ValidationError(
                "Please describe your audience and provide at least one seed keyword.",
            ));
        }
        Ok(())
    }

    /// Intent analysis first, then clustering of that analysis.
    fn request(backend: &dyn SeoBackend, query: &StrategyQuery) -> Result<KeywordStrategy, BackendError> {
        let goal = if blank(&query.goal) { DEFAULT_GOAL } else { query.goal.trim() };
        let keyword_analysis =
            backend.generate_keyword_strategy(goal, query.audience.trim(), query.seed_keywords.trim())?;
        let topic_clusters = backend.generate_topic_clusters(&keyword_analysis)?;
        Ok(KeywordStrategy {
            keyword_analysis,
            topic_clusters,
        })
    }

    fn summary(query: &StrategyQuery) -> String {
        format!("{} ({})", query.seed_keywords, query.goal)
    }

    fn describe(output: &KeywordStrategy) -> Vec<String> {
        let mut lines = vec!["Keywords by intent".to_string()];
        for (intent, keywords) in output.keyword_analysis.intents() {
            if keywords.is_empty() {
                continue;
            }
            lines.push(format!("  {}", intent));
            for kw in keywords {
                lines.push(format!("    {}: {}", kw.keyword, kw.description));
            }
        }
        lines.push(String::new());
        lines.push("Topic clusters".to_string());
        for cluster in &output.topic_clusters.topic_clusters {
            lines.push(format!("  Pillar: {}", cluster.pillar_keyword));
            lines.push(format!("    {}", cluster.cluster_description));
            for kw in &cluster.cluster_keywords {
                lines.push(format!("    - {}", kw));
            }
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.keyword_strategy
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.keyword_strategy
    }
}

// ------------------------------------------------------------------- audit

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditQuery {
    pub url: String,
    pub keyword: String,
}

pub struct AuditTool;

impl Tool for AuditTool {
    const KIND: ToolKind = ToolKind::SeoAudit;
    const STORAGE_KEY: &'static str = "savedSeoAudits";
    const TITLE: &'static str = "SEO Audit";
    const FIELDS: &'static [&'static str] = &["URL", "Focus keyword"];
    const FAILURE: &'static str = "Failed to run SEO audit. Please try again.";

    type Query = AuditQuery;
    type Output = SeoAuditResult;

    fn field(query: &AuditQuery, index: usize) -> Option<&str> {
        match index {
            0 => Some(&query.url),
            1 => Some(&query.keyword),
            _ => None,
        }
    }

    fn field_mut(query: &mut AuditQuery, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut query.url),
            1 => Some(&mut query.keyword),
            _ => None,
        }
    }

    fn validate(query: &AuditQuery) -> Result<(), ValidationError> {
        if blank(&query.url) || blank(&query.keyword) {
            return Err(ValidationError("Please enter both a URL and a focus keyword."));
        }
        Ok(())
    }

    fn request(backend: &dyn SeoBackend, query: &AuditQuery) -> Result<SeoAuditResult, BackendError> {
        backend.audit_seo(query.url.trim(), query.keyword.trim())
    }

    fn failure_message(error: &BackendError) -> String {
        error.to_string()
    }

    fn summary(query: &AuditQuery) -> String {
        format!("{} ({})", query.url, query.keyword)
    }

    fn describe(output: &SeoAuditResult) -> Vec<String> {
        let mut lines = vec![format!("Overall score: {}/100", output.overall_score)];
        for (section, checks) in output.sections() {
            lines.push(String::new());
            lines.push(section.to_string());
            for check in checks {
                lines.push(format!("  [{}] {}: {}", check.status, check.check, check.recommendation));
            }
        }
        lines
    }

    fn page(suite: &ToolSuite) -> &ToolPage<Self> {
        &suite.seo_audit
    }

    fn page_mut(suite: &mut ToolSuite) -> &mut ToolPage<Self> {
        &mut suite.seo_audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::backend::MockBackend;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            KeywordResearchTool::validate(&KeywordQuery::default()),
            Err(ValidationError("Please enter a topic."))
        );
        let partial = SerpQuery {
            keyword: "seo".to_string(),
            domain: "  ".to_string(),
        };
        assert!(SerpTool::validate(&partial).is_err());
        assert!(AuditTool::validate(&AuditQuery::default()).is_err());
    }

    #[test]
    fn test_strategy_default_goal_does_not_satisfy_validation() {
        let query = StrategyQuery::default();
        assert_eq!(query.goal, DEFAULT_GOAL);
        assert!(StrategyTool::validate(&query).is_err());
    }

    #[test]
    fn test_strategy_request_runs_both_steps() {
        let backend = MockBackend::default();
        let query = StrategyQuery {
            audience: "home bakers".to_string(),
            seed_keywords: "sourdough".to_string(),
            ..StrategyQuery::default()
        };

        let strategy = StrategyTool::request(&backend, &query).unwrap();

        assert_eq!(strategy.keyword_analysis.commercial_keywords.len(), 1);
        assert_eq!(strategy.topic_clusters.topic_clusters[0].pillar_keyword, "Best sourdough tools");
    }

    #[test]
    fn test_strategy_query_serializes_camel_case() {
        let query = StrategyQuery {
            seed_keywords: "sourdough".to_string(),
            ..StrategyQuery::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["seedKeywords"], "sourdough");
    }

    #[test]
    fn test_fields_cover_labels() {
        let mut query = OptimizerQuery::default();
        *OptimizerTool::field_mut(&mut query, 1).unwrap() = "body text".to_string();

        assert_eq!(OptimizerTool::field(&query, 1), Some("body text"));
        assert_eq!(OptimizerTool::field(&query, OptimizerTool::FIELDS.len()), None);
    }

    #[test]
    fn test_describe_skips_empty_keyword_groups() {
        let backend = MockBackend::default();
        let mut keywords = backend.generate_keywords("tea").unwrap();
        keywords.lsi_keywords.clear();

        let lines = KeywordResearchTool::describe(&keywords);

        assert_eq!(lines[0], "Primary Keywords");
        assert!(!lines.iter().any(|line| line == "LSI Keywords"));
    }

    #[test]
    fn test_failure_messages() {
        let error = BackendError::InvalidInput("Domain is required.".to_string());
        assert_eq!(CompetitorKeywordsTool::failure_message(&error), "Domain is required.");
        assert_eq!(
            KeywordResearchTool::failure_message(&error),
            "Failed to generate keywords. Please try again."
        );
    }
}
