use super::models::{
    CompetitorKeywords, ContentBriefData, KeywordStrategy, Keywords, OptimizationResult, SeoAuditResult,
    SerpAnalysis,
};
use super::tools::{
    AuditQuery, AuditTool, BriefQuery, CompetitorKeywordsTool, CompetitorQuery, ContentBriefTool, KeywordQuery,
    KeywordResearchTool, OptimizerQuery, OptimizerTool, SerpQuery, SerpTool, StrategyQuery, StrategyTool, Tool,
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Flat row layout used when a result is exported as CSV. Rows may have
/// different lengths; an empty row separates sections.
pub trait CsvExport: Tool {
    fn csv_rows(output: &Self::Output) -> Vec<Vec<String>>;

    /// The input that names exported files.
    fn export_subject(query: &Self::Query) -> &str;
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

impl CsvExport for KeywordResearchTool {
    fn csv_rows(output: &Keywords) -> Vec<Vec<String>> {
        let mut rows = vec![row(["type", "keyword", "searchVolume"])];
        let kinds = [
            "Primary Keyword",
            "Long-Tail Keyword",
            "Question-Based Keyword",
            "LSI Keyword",
        ];
        for (kind, (_, keywords)) in kinds.iter().zip(output.groups()) {
            for kw in keywords {
                rows.push(row([*kind, &kw.keyword, &kw.search_volume]));
            }
        }
        rows
    }

    fn export_subject(query: &KeywordQuery) -> &str {
        &query.topic
    }
}

impl CsvExport for SerpTool {
    fn csv_rows(output: &SerpAnalysis) -> Vec<Vec<String>> {
        let mut rows = vec![row(["type", "value1", "value2", "value3"])];
        for c in &output.competitors {
            rows.push(row(["competitor", &c.url, &c.title, &c.description]));
        }
        rows.push(Vec::new());
        rows.push(row(["analysis", &output.analysis]));
        rows.push(Vec::new());
        for r in &output.recommendations {
            rows.push(row(["recommendation", r]));
        }
        rows
    }

    fn export_subject(query: &SerpQuery) -> &str {
        &query.keyword
    }
}

impl CsvExport for CompetitorKeywordsTool {
    fn csv_rows(output: &CompetitorKeywords) -> Vec<Vec<String>> {
        let mut rows = vec![row(["Keyword", "Rank", "Search Volume", "Difficulty"])];
        for item in output {
            rows.push(row([&item.keyword, &item.rank, &item.search_volume, &item.difficulty]));
        }
        rows
    }

    fn export_subject(query: &CompetitorQuery) -> &str {
        &query.domain
    }
}

impl CsvExport for ContentBriefTool {
    fn csv_rows(output: &ContentBriefData) -> Vec<Vec<String>> {
        let mut rows = vec![
            row(["type", "value1", "value2"]),
            row(["title_suggestion", &output.title_suggestion]),
            row(["meta_description_suggestion", &output.meta_description_suggestion]),
            row(["target_audience", &output.target_audience]),
            row(["suggested_word_count", &output.suggested_word_count]),
            Vec::new(),
        ];
        for kw in &output.lsi_keywords {
            rows.push(row(["lsi_keyword", kw]));
        }
        rows.push(Vec::new());
        for section in &output.outline {
            rows.push(row(["outline_h2", &section.heading]));
            for sub in &section.subheadings {
                rows.push(row(["outline_h3", sub]));
            }
        }
        rows
    }

    fn export_subject(query: &BriefQuery) -> &str {
        &query.keyword
    }
}

impl CsvExport for OptimizerTool {
    fn csv_rows(output: &OptimizationResult) -> Vec<Vec<String>> {
        vec![
            row(["metric", "value"]),
            row(["seoScore", &output.seo_score.to_string()]),
            row(["keywordDensity", &output.keyword_density]),
            row(["readability", &output.readability]),
            row(["titleAndHeadings", &output.title_and_headings]),
            row(["metaDescription", &output.meta_description]),
            row(["linking", &output.linking]),
        ]
    }

    fn export_subject(query: &OptimizerQuery) -> &str {
        &query.keyword
    }
}

impl CsvExport for StrategyTool {
    fn csv_rows(output: &KeywordStrategy) -> Vec<Vec<String>> {
        let mut rows = vec![
            row(["Part", "Type/Pillar", "Keyword/Description", "Details"]),
            row(["Keyword Analysis by Intent"]),
        ];
        for (intent, keywords) in output.keyword_analysis.intents() {
            for kw in keywords {
                rows.push(row(["", intent, &kw.keyword, &kw.description]));
            }
        }
        rows.push(Vec::new());
        rows.push(row(["Topic Cluster Strategy"]));
        for cluster in &output.topic_clusters.topic_clusters {
            rows.push(row([
                "",
                &cluster.pillar_keyword,
                &cluster.cluster_description,
                "--- CLUSTER KEYWORDS ---",
            ]));
            for kw in &cluster.cluster_keywords {
                rows.push(row(["", "", "", kw]));
            }
        }
        rows
    }

    fn export_subject(query: &StrategyQuery) -> &str {
        &query.seed_keywords
    }
}

impl CsvExport for AuditTool {
    fn csv_rows(output: &SeoAuditResult) -> Vec<Vec<String>> {
        let mut rows = vec![
            row(["Category", "Check", "Status", "Recommendation"]),
            row(["Overall Score", &output.overall_score.to_string()]),
        ];
        for (section, checks) in output.sections() {
            rows.push(Vec::new());
            rows.push(row([section]));
            for check in checks {
                rows.push(row(["", &check.check, &check.status.to_string(), &check.recommendation]));
            }
        }
        rows
    }

    fn export_subject(query: &AuditQuery) -> &str {
        &query.keyword
    }
}

/// Collapses every run of characters outside `[A-Za-z0-9_]` into one `_`
/// and keeps at most 50 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out.chars().take(50).collect()
}

pub fn export_file_name<T: CsvExport>(query: &T::Query, format: ExportFormat) -> String {
    let base = format!("{}-{}", T::KIND.slug(), T::export_subject(query));
    format!("{}.{}", sanitize_file_name(&base), format.extension())
}

pub fn to_json<T: Tool>(output: &T::Output) -> Result<String> {
    serde_json::to_string_pretty(output).context("Failed to serialize result")
}

/// Blank rows split the export into sections. Each section goes through one
/// flexible writer since a lone empty field would come out as `""`.
pub fn to_csv<T: CsvExport>(output: &T::Output) -> Result<String> {
    let rows = T::csv_rows(output);
    let mut sections = Vec::new();
    for section in rows.split(|record| record.is_empty()) {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        for record in section {
            wtr.write_record(record)?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        sections.push(String::from_utf8(bytes).context("CSV output was not valid UTF-8")?);
    }
    Ok(sections.join("\n"))
}

pub fn render<T: CsvExport>(output: &T::Output, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json::<T>(output),
        ExportFormat::Csv => to_csv::<T>(output),
    }
}

/// Writes the export into `dir` under its derived file name, or to `output`
/// when one is given. Returns the path written.
pub fn write_export<T: CsvExport>(
    query: &T::Query,
    output: &T::Output,
    format: ExportFormat,
    dir: &Path,
    target: Option<&Path>,
) -> Result<PathBuf> {
    let content = render::<T>(output, format)?;
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => dir.join(export_file_name::<T>(query, format)),
    };
    fs::write(&path, content).with_context(|| format!("Failed to write export: {}", path.display()))?;
    tracing::info!(path = %path.display(), tool = T::TITLE, "exported result");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::backend::{MockBackend, SeoBackend};
    use crate::suite::models::{AuditCheck, AuditStatus, CompetitorKeywordInfo, KeywordWithVolume};

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_file_name("keyword-research-vegan baking"), "keyword_research_vegan_baking");
        assert_eq!(sanitize_file_name("a  --  b"), "a_b");
        assert_eq!(sanitize_file_name("café"), "caf_");
    }

    #[test]
    fn test_sanitize_truncates_to_fifty() {
        let long = "x".repeat(80);
        assert_eq!(sanitize_file_name(&long).len(), 50);
    }

    #[test]
    fn test_export_file_names_use_tool_subject() {
        let query = SerpQuery {
            keyword: "best running shoes".to_string(),
            domain: "example.com".to_string(),
        };
        assert_eq!(
            export_file_name::<SerpTool>(&query, ExportFormat::Csv),
            "serp_analysis_best_running_shoes.csv"
        );

        let query = OptimizerQuery {
            keyword: "seo".to_string(),
            content: "ignored".to_string(),
        };
        assert_eq!(
            export_file_name::<OptimizerTool>(&query, ExportFormat::Json),
            "optimization_report_seo.json"
        );
    }

    #[test]
    fn test_keywords_csv_layout() {
        let keywords = Keywords {
            primary_keywords: vec![KeywordWithVolume::new("vegan cake", "10K")],
            lsi_keywords: vec![KeywordWithVolume::new("dairy-free, eggless", "1K")],
            ..Keywords::default()
        };

        let csv = to_csv::<KeywordResearchTool>(&keywords).unwrap();

        assert_eq!(
            csv,
            "type,keyword,searchVolume\n\
             Primary Keyword,vegan cake,10K\n\
             LSI Keyword,\"dairy-free, eggless\",1K\n"
        );
    }

    #[test]
    fn test_competitor_csv_quotes_embedded_quotes() {
        let result = vec![CompetitorKeywordInfo {
            keyword: "say \"hi\"".to_string(),
            rank: "3".to_string(),
            search_volume: "500".to_string(),
            difficulty: "Low".to_string(),
        }];

        let csv = to_csv::<CompetitorKeywordsTool>(&result).unwrap();

        assert_eq!(
            csv.lines().nth(1),
            Some("\"say \"\"hi\"\"\",3,500,Low")
        );
    }

    #[test]
    fn test_serp_csv_has_blank_separators() {
        let result = MockBackend::default().analyze_serp("tea", "example.com").unwrap();

        let csv = to_csv::<SerpTool>(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "type,value1,value2,value3");
        let analysis = lines.iter().position(|line| line.starts_with("analysis,")).unwrap();
        assert_eq!(lines[analysis - 1], "");
        assert_eq!(lines[analysis + 1], "");
        assert!(lines[analysis + 2].starts_with("recommendation,"));
    }

    #[test]
    fn test_audit_csv_sections() {
        let result = SeoAuditResult {
            overall_score: 72.0,
            on_page_seo: vec![AuditCheck::new("Title tag", AuditStatus::Pass, "Looks good")],
            ..SeoAuditResult::default()
        };

        let csv = to_csv::<AuditTool>(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        // rows of different widths share a section
        assert!(csv.starts_with(
            "Category,Check,Status,Recommendation\n\
             Overall Score,72\n\
             \n"
        ));
        assert!(csv.ends_with('\n'));

        assert_eq!(lines[1], "Overall Score,72");
        assert_eq!(lines[3], "On-Page SEO");
        assert_eq!(lines[4], ",Title tag,Pass,Looks good");
        assert!(lines.contains(&"Technical SEO"));
    }

    #[test]
    fn test_strategy_csv_lists_cluster_keywords() {
        let backend = MockBackend::default();
        let query = StrategyQuery {
            audience: "bakers".to_string(),
            seed_keywords: "sourdough".to_string(),
            ..StrategyQuery::default()
        };
        let strategy = StrategyTool::request(&backend, &query).unwrap();

        let csv = to_csv::<StrategyTool>(&strategy).unwrap();

        assert!(csv.starts_with("Part,Type/Pillar,Keyword/Description,Details\nKeyword Analysis by Intent\n"));
        assert!(csv.contains("--- CLUSTER KEYWORDS ---"));
    }

    #[test]
    fn test_write_export_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let query = KeywordQuery {
            topic: "vegan baking".to_string(),
        };
        let keywords = MockBackend::default().generate_keywords("vegan baking").unwrap();

        let path =
            write_export::<KeywordResearchTool>(&query, &keywords, ExportFormat::Json, dir.path(), None).unwrap();

        assert_eq!(path.file_name().unwrap(), "keyword_research_vegan_baking.json");
        let written: Keywords = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, keywords);
    }
}
