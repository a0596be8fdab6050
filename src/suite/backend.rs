use super::models::{
    AuditCheck, AuditStatus, Competitor, CompetitorKeywordInfo, CompetitorKeywords, ContentBriefData,
    KeywordStrategyResult, KeywordWithDescription, KeywordWithVolume, Keywords, OptimizationResult,
    OutlineSection, SeoAuditResult, SerpAnalysis, TopicCluster, TopicClusterResult,
};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("{0}")]
    InvalidInput(String),
}

/// Content generation calls. Implementations may block; the TUI calls them
/// off the UI thread.
pub trait SeoBackend: Send + Sync {
    fn generate_keywords(&self, topic: &str) -> Result<Keywords, BackendError>;
    fn analyze_serp(&self, keyword: &str, domain: &str) -> Result<SerpAnalysis, BackendError>;
    fn find_competitor_keywords(&self, domain: &str) -> Result<CompetitorKeywords, BackendError>;
    fn create_content_brief(&self, keyword: &str) -> Result<ContentBriefData, BackendError>;
    fn optimize_content(&self, keyword: &str, content: &str) -> Result<OptimizationResult, BackendError>;
    fn generate_keyword_strategy(
        &self,
        goal: &str,
        audience: &str,
        seed_keywords: &str,
    ) -> Result<KeywordStrategyResult, BackendError>;
    fn generate_topic_clusters(
        &self,
        keyword_data: &KeywordStrategyResult,
    ) -> Result<TopicClusterResult, BackendError>;
    fn audit_seo(&self, url: &str, keyword: &str) -> Result<SeoAuditResult, BackendError>;
}

/// Canned responses shaped like the real service, with optional latency.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    latency: Duration,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn wait(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}

fn require(values: &[&str], message: &str) -> Result<(), BackendError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(BackendError::InvalidInput(message.to_string()));
    }
    Ok(())
}

impl SeoBackend for MockBackend {
    fn generate_keywords(&self, topic: &str) -> Result<Keywords, BackendError> {
        self.wait();
        if topic.trim().is_empty() || topic.to_lowercase().contains("error") {
            return Err(BackendError::InvalidInput("Invalid topic.".to_string()));
        }
        tracing::debug!(topic, "mock keyword generation");
        Ok(Keywords {
            primary_keywords: vec![
                KeywordWithVolume::new(format!("Primary keyword for {}", topic), "12K"),
                KeywordWithVolume::new(format!("{} strategies", topic), "8.5K"),
            ],
            long_tail_keywords: vec![
                KeywordWithVolume::new(format!("Best long tail keyword for {} in 2024", topic), "1.1K"),
                KeywordWithVolume::new(format!("how to implement {} for small business", topic), "750"),
            ],
            question_based_keywords: vec![
                KeywordWithVolume::new(format!("What is {}?", topic), "2.5K"),
                KeywordWithVolume::new(format!("How does {} work?", topic), "1.8K"),
            ],
            lsi_keywords: vec![
                KeywordWithVolume::new(format!("{} alternatives", topic), "900"),
                KeywordWithVolume::new(format!("advanced {} techniques", topic), "450"),
            ],
        })
    }

    fn analyze_serp(&self, keyword: &str, domain: &str) -> Result<SerpAnalysis, BackendError> {
        self.wait();
        require(&[keyword, domain], "Keyword and domain are required.")?;
        tracing::debug!(keyword, domain, "mock SERP analysis");
        let competitor = |url: &str, title: String, description: String| Competitor {
            url: url.to_string(),
            title,
            description,
        };
        Ok(SerpAnalysis {
            competitors: vec![
                competitor(
                    "https://competitor1.com/blog/post",
                    format!("Ultimate Guide to {}", keyword),
                    format!("A deep dive into everything you need to know about {}.", keyword),
                ),
                competitor(
                    "https://competitor2.com/resource",
                    format!("{}: A Beginner's Guide", keyword),
                    format!("Learn the basics of {} with our comprehensive guide.", keyword),
                ),
                competitor(
                    "https://competitor3.com/main",
                    format!("Top 10 {} Strategies", keyword),
                    format!("Explore the top 10 effective strategies for mastering {}.", keyword),
                ),
            ],
            analysis: format!(
                "The SERP for \"{}\" is dominated by long-form guides. Your domain, {}, will need to produce \
                 highly comprehensive content to compete. There is an opportunity to target \"how-to\" queries.",
                keyword, domain
            ),
            recommendations: [
                "Create a 2500+ word \"pillar page\" covering all aspects of the topic.",
                "Include a unique case study or original research to stand out.",
                "Build high-authority backlinks from relevant industry sites.",
                "Optimize title and meta description for click-through rate.",
                "Ensure the page is mobile-friendly and loads quickly.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        })
    }

    fn find_competitor_keywords(&self, domain: &str) -> Result<CompetitorKeywords, BackendError> {
        self.wait();
        require(&[domain], "Domain is required.")?;
        tracing::debug!(domain, "mock competitor keyword analysis");
        let info = |keyword: &str, rank: &str, search_volume: &str, difficulty: &str| CompetitorKeywordInfo {
            keyword: keyword.to_string(),
            rank: rank.to_string(),
            search_volume: search_volume.to_string(),
            difficulty: difficulty.to_string(),
        };
        Ok(vec![
            info("top seo strategies", "1", "22K", "High"),
            info("content marketing examples", "3", "15K", "Medium"),
            info("how to build backlinks", "5", "18K", "Very High"),
            info("local seo checklist", "2", "9K", "Medium"),
        ])
    }

    fn create_content_brief(&self, keyword: &str) -> Result<ContentBriefData, BackendError> {
        self.wait();
        require(&[keyword], "Keyword is required.")?;
        tracing::debug!(keyword, "mock content brief");
        let section = |heading: &str, subheadings: &[&str]| OutlineSection {
            heading: heading.to_string(),
            subheadings: subheadings.iter().map(|s| s.to_string()).collect(),
        };
        Ok(ContentBriefData {
            title_suggestion: format!("The Ultimate Guide to Mastering {}", keyword),
            meta_description_suggestion: format!(
                "Unlock the secrets to {} with our comprehensive guide. Learn actionable tips and strategies to succeed in 2024.",
                keyword
            ),
            outline: vec![
                section("Introduction: What is [Keyword]?", &["Why it matters", "Common misconceptions"]),
                section("Core Concepts of [Keyword]", &["Concept A", "Concept B", "Concept C"]),
                section("Advanced Strategies", &["Strategy for experts", "Tools and resources"]),
                section("Conclusion", &["Key takeaways", "Future trends"]),
            ],
            lsi_keywords: ["related term 1", "related term 2", "synonym for keyword", "keyword topic ideas"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            suggested_word_count: "2000-2500 words".to_string(),
            target_audience: "Intermediate-level professionals in the industry looking to improve their skills."
                .to_string(),
        })
    }

    fn optimize_content(&self, keyword: &str, content: &str) -> Result<OptimizationResult, BackendError> {
        self.wait();
        require(&[keyword, content], "Keyword and content are required.")?;
        tracing::debug!(keyword, content_len = content.len(), "mock content optimization");
        Ok(OptimizationResult {
            seo_score: 88.0,
            keyword_density: "Good (1.5%). The keyword appears a healthy number of times.".to_string(),
            readability: "Excellent. The content is easy to read and understand.".to_string(),
            title_and_headings:
                "Needs Improvement. Consider including the primary keyword in at least one H2 subheading."
                    .to_string(),
            meta_description: "Pass. The meta description is a good length and compelling.".to_string(),
            linking: "Good. A healthy mix of internal and external links was found.".to_string(),
        })
    }

    fn generate_keyword_strategy(
        &self,
        goal: &str,
        audience: &str,
        seed_keywords: &str,
    ) -> Result<KeywordStrategyResult, BackendError> {
        self.wait();
        tracing::debug!(goal, audience, seed_keywords, "mock keyword strategy");
        let entry = |keyword: String, description: &str| KeywordWithDescription {
            keyword,
            description: description.to_string(),
        };
        Ok(KeywordStrategyResult {
            informational_keywords: vec![entry(
                format!("How to start with {}", seed_keywords),
                "Users are looking for basic information.",
            )],
            commercial_keywords: vec![entry(
                format!("Best {} tools", seed_keywords),
                "Users are comparing options before purchasing.",
            )],
            transactional_keywords: vec![entry(
                format!("Buy {} subscription", seed_keywords),
                "Users are ready to make a purchase.",
            )],
        })
    }

    fn generate_topic_clusters(
        &self,
        keyword_data: &KeywordStrategyResult,
    ) -> Result<TopicClusterResult, BackendError> {
        self.wait();
        let pillar = keyword_data
            .commercial_keywords
            .first()
            .map(|kw| kw.keyword.clone())
            .unwrap_or_else(|| "Pillar Keyword".to_string());
        tracing::debug!(pillar = %pillar, "mock topic clusters");
        Ok(TopicClusterResult {
            topic_clusters: vec![TopicCluster {
                cluster_description: format!("A central hub for everything related to {}.", pillar),
                pillar_keyword: pillar,
                cluster_keywords: vec![
                    "Subtopic A".to_string(),
                    "Subtopic B".to_string(),
                    "Subtopic C".to_string(),
                ],
            }],
        })
    }

    fn audit_seo(&self, url: &str, keyword: &str) -> Result<SeoAuditResult, BackendError> {
        self.wait();
        require(&[url, keyword], "URL and keyword are required.")?;
        tracing::debug!(url, keyword, "mock SEO audit");
        use AuditStatus::*;
        Ok(SeoAuditResult {
            overall_score: 78.0,
            on_page_seo: vec![
                AuditCheck::new("Title Tag", Pass, "Title tag is unique, within length limits, and contains the keyword."),
                AuditCheck::new(
                    "Meta Description",
                    Warning,
                    "Meta description is slightly too long. Consider shortening to under 160 characters.",
                ),
                AuditCheck::new("Header Tags", Pass, "Proper H1 and H2 structure is in place."),
                AuditCheck::new(
                    "Image SEO",
                    Fail,
                    "Missing alt text on several images. Add descriptive alt text to improve accessibility and SEO.",
                ),
            ],
            content_quality: vec![
                AuditCheck::new("Keyword Strategy", Pass, "The focus keyword is well-integrated into the content."),
                AuditCheck::new("Content Originality", Pass, "Content appears to be original."),
                AuditCheck::new("Readability", Warning, "Some paragraphs are long. Break them up for better readability."),
            ],
            technical_seo: vec![
                AuditCheck::new("Mobile-Friendliness", Pass, "Page is mobile-friendly."),
                AuditCheck::new(
                    "Page Speed",
                    Info,
                    "Page speed is acceptable, but could be improved by optimizing images.",
                ),
                AuditCheck::new("Internal Linking", Pass, "Good use of internal links to other relevant pages."),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_keywords_mention_topic() {
        let backend = MockBackend::default();
        let keywords = backend.generate_keywords("vegan baking").unwrap();

        assert_eq!(keywords.primary_keywords.len(), 2);
        assert!(keywords.primary_keywords[0].keyword.contains("vegan baking"));
        assert_eq!(keywords.question_based_keywords[0].keyword, "What is vegan baking?");
    }

    #[test]
    fn test_mock_keywords_reject_error_topics() {
        let backend = MockBackend::default();
        assert!(matches!(
            backend.generate_keywords("trigger an ERROR please"),
            Err(BackendError::InvalidInput(_))
        ));
        assert!(backend.generate_keywords("   ").is_err());
    }

    #[test]
    fn test_mock_serp_requires_both_inputs() {
        let backend = MockBackend::default();
        assert!(backend.analyze_serp("seo", "").is_err());

        let analysis = backend.analyze_serp("seo", "example.com").unwrap();
        assert_eq!(analysis.competitors.len(), 3);
        assert_eq!(analysis.recommendations.len(), 5);
        assert!(analysis.analysis.contains("example.com"));
    }

    #[test]
    fn test_mock_topic_clusters_use_commercial_pillar() {
        let backend = MockBackend::default();
        let analysis = backend
            .generate_keyword_strategy("Increase Website Traffic", "bakers", "sourdough")
            .unwrap();

        let clusters = backend.generate_topic_clusters(&analysis).unwrap();
        assert_eq!(clusters.topic_clusters[0].pillar_keyword, "Best sourdough tools");

        let fallback = backend
            .generate_topic_clusters(&KeywordStrategyResult::default())
            .unwrap();
        assert_eq!(fallback.topic_clusters[0].pillar_keyword, "Pillar Keyword");
    }

    #[test]
    fn test_mock_audit_sections() {
        let backend = MockBackend::default();
        let audit = backend.audit_seo("https://example.com", "seo").unwrap();

        assert_eq!(audit.overall_score, 78.0);
        assert_eq!(audit.on_page_seo.len(), 4);
        assert_eq!(audit.on_page_seo[3].status, AuditStatus::Fail);
        assert_eq!(audit.technical_seo.len(), 3);
    }
}
