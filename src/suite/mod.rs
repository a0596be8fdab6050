pub mod backend;
pub mod export;
pub mod models;
pub mod route;
pub mod store;
pub mod tools;

use crate::history::HistoryManager;
use crate::persistence::KeyValueStore;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use store::{SavedSnapshot, ToolPage};
use tools::{
    AuditTool, CompetitorKeywordsTool, ContentBriefTool, KeywordResearchTool, OptimizerTool, SerpTool,
    StrategyTool, Tool,
};

pub type History = HistoryManager<ToolSuite>;

/// Runs `$body` with `$tool` bound to the tool type behind a `ToolKind`.
macro_rules! with_tool {
    ($kind:expr, $tool:ident => $body:expr) => {
        match $kind {
            $crate::suite::route::ToolKind::KeywordResearch => {
                type $tool = $crate::suite::tools::KeywordResearchTool;
                $body
            }
            $crate::suite::route::ToolKind::SerpAnalysis => {
                type $tool = $crate::suite::tools::SerpTool;
                $body
            }
            $crate::suite::route::ToolKind::CompetitorKeywords => {
                type $tool = $crate::suite::tools::CompetitorKeywordsTool;
                $body
            }
            $crate::suite::route::ToolKind::ContentBrief => {
                type $tool = $crate::suite::tools::ContentBriefTool;
                $body
            }
            $crate::suite::route::ToolKind::OnPageOptimizer => {
                type $tool = $crate::suite::tools::OptimizerTool;
                $body
            }
            $crate::suite::route::ToolKind::KeywordStrategy => {
                type $tool = $crate::suite::tools::StrategyTool;
                $body
            }
            $crate::suite::route::ToolKind::SeoAudit => {
                type $tool = $crate::suite::tools::AuditTool;
                $body
            }
        }
    };
}
pub(crate) use with_tool;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Every tool page plus the store they persist to.
pub struct ToolSuite {
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    last_id: u64,
    pub(crate) keyword_research: ToolPage<KeywordResearchTool>,
    pub(crate) serp_analysis: ToolPage<SerpTool>,
    pub(crate) competitor_keywords: ToolPage<CompetitorKeywordsTool>,
    pub(crate) content_brief: ToolPage<ContentBriefTool>,
    pub(crate) optimizer: ToolPage<OptimizerTool>,
    pub(crate) keyword_strategy: ToolPage<StrategyTool>,
    pub(crate) seo_audit: ToolPage<AuditTool>,
}

impl ToolSuite {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Builds the suite and loads every saved list.
    pub fn with_clock(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let mut suite = Self {
            store,
            clock,
            last_id: 0,
            keyword_research: ToolPage::default(),
            serp_analysis: ToolPage::default(),
            competitor_keywords: ToolPage::default(),
            content_brief: ToolPage::default(),
            optimizer: ToolPage::default(),
            keyword_strategy: ToolPage::default(),
            seo_audit: ToolPage::default(),
        };
        suite.load::<KeywordResearchTool>();
        suite.load::<SerpTool>();
        suite.load::<CompetitorKeywordsTool>();
        suite.load::<ContentBriefTool>();
        suite.load::<OptimizerTool>();
        suite.load::<StrategyTool>();
        suite.load::<AuditTool>();
        suite
    }

    pub fn load<T: Tool>(&mut self) {
        let mut page = std::mem::take(T::page_mut(self));
        page.load(self.store.as_mut());
        *T::page_mut(self) = page;
    }

    pub fn page<T: Tool>(&self) -> &ToolPage<T> {
        T::page(self)
    }

    #[cfg(test)]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn storage_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    // Never reuses an id, even for two saves within one clock tick.
    fn next_id<T: Tool>(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let newest = T::page(self).saved.iter().map(|s| s.id).max().unwrap_or(0);
        let id = millis.max(self.last_id + 1).max(newest + 1);
        self.last_id = id;
        id
    }

    /// Saves a successful run at the head of the tool's list and records it
    /// as one undoable step. Returns the new snapshot's id.
    pub fn commit<T: Tool>(&mut self, history: &mut History, query: T::Query, result: T::Output) -> Result<u64> {
        let now = self.clock.now();
        let id = self.next_id::<T>(now);
        let snapshot = SavedSnapshot {
            id,
            query,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            result,
        };
        let change = T::page(self).prepare_commit(snapshot);
        history.perform(Box::new(change), self)?;
        tracing::info!(tool = T::TITLE, id, "saved result");
        Ok(id)
    }

    pub fn view<T: Tool>(&mut self, id: u64) -> bool {
        T::page_mut(self).view(id)
    }

    /// Removes a saved run as an undoable step. Unknown ids change nothing
    /// and return `false`.
    pub fn delete<T: Tool>(&mut self, history: &mut History, id: u64) -> Result<bool> {
        let Some(change) = T::page(self).prepare_delete(id) else {
            return Ok(false);
        };
        history.perform(Box::new(change), self)?;
        tracing::info!(tool = T::TITLE, id, "deleted saved result");
        Ok(true)
    }
}
