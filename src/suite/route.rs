use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    KeywordResearch,
    SerpMonitoring,
    ContentBrief,
    OnPageOptimizer,
    KeywordStrategist,
    SeoAudit,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::KeywordResearch,
        Route::SerpMonitoring,
        Route::ContentBrief,
        Route::OnPageOptimizer,
        Route::KeywordStrategist,
        Route::SeoAudit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Route::KeywordResearch => "keywordResearch",
            Route::SerpMonitoring => "serpMonitoring",
            Route::ContentBrief => "contentBrief",
            Route::OnPageOptimizer => "onPageOptimizer",
            Route::KeywordStrategist => "keywordStrategist",
            Route::SeoAudit => "seoAudit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::KeywordResearch => "Keyword Research",
            Route::SerpMonitoring => "SERP",
            Route::ContentBrief => "Content",
            Route::OnPageOptimizer => "On-Page",
            Route::KeywordStrategist => "Strategy",
            Route::SeoAudit => "Audit",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::KeywordResearch => "Keyword Research",
            Route::SerpMonitoring => "SERP Monitoring",
            Route::ContentBrief => "AI Content Briefs",
            Route::OnPageOptimizer => "On-Page Optimizer",
            Route::KeywordStrategist => "AI Keyword Strategist",
            Route::SeoAudit => "AI Website SEO Audit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Route::KeywordResearch => {
                "Uncover valuable long-tail, LSI, and question-based keywords with estimated search volumes."
            }
            Route::SerpMonitoring => {
                "Analyze the SERP for any keyword, identify top competitors and get recommendations to outrank them."
            }
            Route::ContentBrief => {
                "Generate SEO-optimized content briefs: article structure, title ideas and keywords."
            }
            Route::OnPageOptimizer => {
                "Score your content against SEO best practices for density, readability, metadata and linking."
            }
            Route::KeywordStrategist => {
                "Organize keywords by search intent and group them into pillar and cluster topics."
            }
            Route::SeoAudit => {
                "Health-check a page across technical SEO, content quality and on-page factors."
            }
        }
    }

    /// Unknown keys land on the first route.
    pub fn from_key(key: &str) -> Route {
        Route::ALL
            .into_iter()
            .find(|route| route.key() == key)
            .unwrap_or(Route::ALL[0])
    }

    pub fn tools(self) -> &'static [ToolKind] {
        match self {
            Route::KeywordResearch => &[ToolKind::KeywordResearch],
            Route::SerpMonitoring => &[ToolKind::SerpAnalysis, ToolKind::CompetitorKeywords],
            Route::ContentBrief => &[ToolKind::ContentBrief],
            Route::OnPageOptimizer => &[ToolKind::OnPageOptimizer],
            Route::KeywordStrategist => &[ToolKind::KeywordStrategy],
            Route::SeoAudit => &[ToolKind::SeoAudit],
        }
    }

    pub fn next(self) -> Route {
        let index = self.index();
        Route::ALL[(index + 1) % Route::ALL.len()]
    }

    pub fn previous(self) -> Route {
        let index = self.index();
        Route::ALL[(index + Route::ALL.len() - 1) % Route::ALL.len()]
    }

    pub fn index(self) -> usize {
        Route::ALL.iter().position(|route| *route == self).unwrap_or(0)
    }
}

/// One independently saved tool. The SERP route hosts two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ToolKind {
    KeywordResearch,
    SerpAnalysis,
    CompetitorKeywords,
    ContentBrief,
    OnPageOptimizer,
    KeywordStrategy,
    SeoAudit,
}

impl ToolKind {
    /// Prefix for exported file names.
    pub fn slug(self) -> &'static str {
        match self {
            ToolKind::KeywordResearch => "keyword-research",
            ToolKind::SerpAnalysis => "serp-analysis",
            ToolKind::CompetitorKeywords => "competitor-keywords",
            ToolKind::ContentBrief => "content-brief",
            ToolKind::OnPageOptimizer => "optimization-report",
            ToolKind::KeywordStrategy => "keyword-strategy",
            ToolKind::SeoAudit => "seo-audit",
        }
    }
}
