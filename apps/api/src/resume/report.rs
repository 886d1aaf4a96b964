//! Report Renderer: lays an `AnalysisResult` out as a paginated A4 PDF.
//!
//! Two phases:
//! 1. `report_lines` maps analysis fields onto styled text lines (pure, testable).
//! 2. `render_pdf` wraps and paginates those lines into lopdf content streams
//!    using the standard Helvetica faces with WinAnsi encoding.

use anyhow::Result;
use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::resume::models::AnalysisResult;

// A4 in points, 1" margins.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Subheading,
    Body,
    Footer,
}

impl LineStyle {
    fn font(&self) -> &'static str {
        match self {
            LineStyle::Title | LineStyle::Heading | LineStyle::Subheading => "F2",
            LineStyle::Body => "F1",
            LineStyle::Footer => "F3",
        }
    }

    fn size(&self) -> i64 {
        match self {
            LineStyle::Title => 24,
            LineStyle::Heading => 16,
            LineStyle::Subheading => 13,
            LineStyle::Body => 11,
            LineStyle::Footer => 9,
        }
    }

    fn space_before(&self) -> i64 {
        match self {
            LineStyle::Title => 0,
            LineStyle::Heading => 18,
            LineStyle::Subheading => 10,
            LineStyle::Body => 0,
            LineStyle::Footer => 24,
        }
    }

    /// Approximate characters per line for Helvetica at this size.
    fn wrap_width(&self) -> usize {
        let usable = (PAGE_WIDTH - 2 * MARGIN) as f64;
        (usable / (self.size() as f64 * 0.5)).floor() as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

impl ReportLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// Status label shown next to a score.
pub fn score_status(score: u8) -> &'static str {
    match score {
        s if s >= 90 => "Excellent",
        s if s >= 80 => "Good",
        s if s >= 70 => "Fair",
        s if s >= 60 => "Needs Improvement",
        _ => "Poor",
    }
}

/// `resume-analysis-YYYYMMDD.pdf`
pub fn report_filename(generated_at: DateTime<Utc>) -> String {
    format!("resume-analysis-{}.pdf", generated_at.format("%Y%m%d"))
}

/// Maps every analysis field onto report lines, in document order.
pub fn report_lines(
    analysis: &AnalysisResult,
    source_name: &str,
    generated_at: DateTime<Utc>,
) -> Vec<ReportLine> {
    use LineStyle::*;

    let mut lines = vec![
        ReportLine::new(Title, "Resume Analysis Report"),
        ReportLine::new(
            Body,
            format!(
                "Generated: {}",
                generated_at.format("%B %d, %Y at %I:%M %p")
            ),
        ),
        ReportLine::new(Body, format!("Resume File: {source_name}")),
        ReportLine::new(
            Body,
            format!("Overall Score: {}/100", analysis.overall_score),
        ),
    ];

    let report = &analysis.detailed_report;
    lines.push(ReportLine::new(Heading, "Executive Summary"));
    lines.push(ReportLine::new(
        Body,
        or_fallback(&report.executive_summary, "No summary available."),
    ));

    lines.push(ReportLine::new(Heading, "Overall Assessment"));
    for (label, score) in [
        ("Overall Score", analysis.overall_score),
        ("ATS Compatibility", analysis.ats_score),
    ] {
        lines.push(ReportLine::new(
            Body,
            format!("{label}: {score}/100 ({})", score_status(score)),
        ));
    }

    lines.push(ReportLine::new(Heading, "Section Breakdown"));
    for (section, score) in analysis.sections.iter() {
        lines.push(ReportLine::new(
            Body,
            format!(
                "{}: {score}/100 ({})",
                title_case(section.as_str()),
                score_status(score)
            ),
        ));
    }

    push_bullets(
        &mut lines,
        Heading,
        "Strengths",
        &analysis.strengths,
        "No specific strengths identified.",
    );
    push_bullets(
        &mut lines,
        Heading,
        "Areas for Improvement",
        &analysis.improvements,
        "No specific improvements identified.",
    );

    let skills = &analysis.skill_analysis;
    lines.push(ReportLine::new(Heading, "Skill Analysis"));
    lines.push(ReportLine::new(Subheading, "Current Skills"));
    if skills.current_skills.is_empty() {
        lines.push(ReportLine::new(Body, "No skills identified."));
    } else {
        lines.push(ReportLine::new(Body, skills.current_skills.join(", ")));
    }
    push_bullets(
        &mut lines,
        Subheading,
        "Recommended Skills",
        &skills.missing_skills,
        "No additional skills recommended.",
    );

    let format = &analysis.format_analysis;
    lines.push(ReportLine::new(Heading, "Format Analysis"));
    lines.push(ReportLine::new(
        Body,
        format!(
            "Current Format: {}",
            or_fallback(&format.current_format, "Not specified")
        ),
    ));
    lines.push(ReportLine::new(
        Body,
        format!(
            "Recommended Format: {}",
            or_fallback(&format.suggested_format, "Not specified")
        ),
    ));
    push_bullets(
        &mut lines,
        Subheading,
        "Format Improvements",
        &format.format_improvements,
        "No format improvements suggested.",
    );

    let industry = &analysis.industry_insights;
    lines.push(ReportLine::new(Heading, "Industry Insights"));
    lines.push(ReportLine::new(
        Body,
        format!("Industry: {}", industry.industry),
    ));
    lines.push(ReportLine::new(
        Body,
        format!(
            "Salary Insights: {}",
            or_fallback(&industry.salary_insights, "Not available")
        ),
    ));
    push_bullets(
        &mut lines,
        Subheading,
        "Market Trends",
        &industry.market_trends,
        "No market trends available.",
    );

    push_numbered(
        &mut lines,
        "Detailed Recommendations",
        &analysis.recommendations,
        "No specific recommendations available.",
    );

    lines.push(ReportLine::new(Heading, "4-Week Action Plan"));
    if report.action_plan.is_empty() {
        lines.push(ReportLine::new(Body, "No action plan available."));
    }
    for (i, action) in report.action_plan.iter().enumerate() {
        let text = if action.starts_with("Week ") {
            action.clone()
        } else {
            format!("Week {}: {action}", i + 1)
        };
        lines.push(ReportLine::new(Body, text));
    }

    push_numbered(
        &mut lines,
        "Priority Actions",
        &report.priority_actions,
        "No priority actions identified.",
    );

    lines.push(ReportLine::new(
        Footer,
        format!(
            "Report generated by AI Virtual Interviewer on {}",
            generated_at.format("%B %d, %Y")
        ),
    ));
    lines.push(ReportLine::new(
        Footer,
        "For more career guidance and interview preparation, visit our platform.",
    ));

    lines
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn push_bullets(
    lines: &mut Vec<ReportLine>,
    style: LineStyle,
    heading: &str,
    items: &[String],
    fallback: &str,
) {
    lines.push(ReportLine::new(style, heading));
    if items.is_empty() {
        lines.push(ReportLine::new(LineStyle::Body, fallback));
    }
    for item in items {
        lines.push(ReportLine::new(LineStyle::Body, format!("• {item}")));
    }
}

fn push_numbered(lines: &mut Vec<ReportLine>, heading: &str, items: &[String], fallback: &str) {
    lines.push(ReportLine::new(LineStyle::Heading, heading));
    if items.is_empty() {
        lines.push(ReportLine::new(LineStyle::Body, fallback));
    }
    for (i, item) in items.iter().enumerate() {
        lines.push(ReportLine::new(
            LineStyle::Body,
            format!("{}. {item}", i + 1),
        ));
    }
}

/// Greedy word wrap at `width` characters. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// Encodes text for a WinAnsi simple font; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Splits styled lines into pages of text-drawing operations.
fn paginate(lines: &[ReportLine]) -> Vec<Vec<Operation>> {
    let mut pages = Vec::new();
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let size = line.style.size();
        let leading = size * 14 / 10;
        if !ops.is_empty() {
            y -= line.style.space_before();
        }

        for fragment in wrap(&line.text, line.style.wrap_width()) {
            if y - leading < MARGIN {
                pages.push(std::mem::take(&mut ops));
                y = PAGE_HEIGHT - MARGIN;
            }
            y -= leading;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![line.style.font().into(), size.into()],
            ));
            ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(&fragment), StringFormat::Literal)],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
    }

    if !ops.is_empty() {
        pages.push(ops);
    }
    pages
}

/// Renders the analysis to PDF bytes.
pub fn render_pdf(
    analysis: &AnalysisResult,
    source_name: &str,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let lines = report_lines(analysis, source_name, generated_at);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = |doc: &mut Document, base: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let regular = font(&mut doc, "Helvetica");
    let bold = font(&mut doc, "Helvetica-Bold");
    let italic = font(&mut doc, "Helvetica-Oblique");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
            "F3" => italic,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in paginate(&lines) {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)?;
    Ok(buf)
}
