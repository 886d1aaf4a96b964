//! Rubric Analyzer: scores extracted resume text against a fixed nine-section rubric.
//!
//! Algorithm:
//! 1. Draw a jittered baseline for every section from the injected RNG.
//! 2. Collect `Signals` from the text once (patterns on the raw text,
//!    vocabulary hits on the lower-cased text, line structure).
//! 3. Apply `RULES` in order. Each rule OVERWRITES the sections it names and
//!    appends exactly one strength or improvement. Last writer wins.
//! 4. Derive overall score, ATS estimate, skill gaps, industry, and the
//!    templated report text.
//!
//! Given the same RNG seed the result is fully deterministic. Without a fixed
//! seed only the sections no rule touched (`content`, and `achievements`
//! unless experience is quantified) vary between calls.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use tracing::debug;

use crate::resume::catalog::*;
use crate::resume::models::{
    AnalysisResult, DetailedReport, FormatAnalysis, Industry, IndustryInsights, Section,
    SectionScores, SkillAnalysis,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern should compile"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("phone pattern should compile"));
static QUANTIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(QUANTIFIED_PATTERN).expect("quantified pattern should compile"));

// ────────────────────────────────────────────────────────────────────────────
// Progress
// ────────────────────────────────────────────────────────────────────────────

/// Observable stages of one analysis, reported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    ExtractingText,
    AnalyzingStructure,
    AnalyzingSkills,
    CheckingAts,
    GeneratingRecommendations,
    Completed,
}

impl AnalysisStage {
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisStage::ExtractingText => "Extracting text content",
            AnalysisStage::AnalyzingStructure => "Analyzing content structure and formatting",
            AnalysisStage::AnalyzingSkills => "Analyzing skills and keywords",
            AnalysisStage::CheckingAts => "Checking ATS compatibility",
            AnalysisStage::GeneratingRecommendations => "Generating recommendations and insights",
            AnalysisStage::Completed => "Resume analysis completed",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Signals
// ────────────────────────────────────────────────────────────────────────────

/// Everything the rules need to know about a document, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    pub has_email: bool,
    pub has_phone: bool,
    pub has_education: bool,
    pub has_experience: bool,
    pub quantified_achievements: usize,
    pub technical_skills: Vec<&'static str>,
    pub soft_skills: Vec<&'static str>,
    pub industry_keywords: Vec<&'static str>,
    pub non_empty_lines: usize,
    pub has_bullets: bool,
    pub has_headers: bool,
    pub has_summary: bool,
    pub industry: Industry,
}

impl Signals {
    pub fn collect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let contains_any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));
        let matches = |vocabulary: &[&'static str]| -> Vec<&'static str> {
            vocabulary
                .iter()
                .copied()
                .filter(|term| lower.contains(term))
                .collect()
        };

        let lines: Vec<&str> = text.split('\n').collect();
        let trimmed: Vec<&str> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let industry = if contains_any(BUSINESS_TERMS) {
            Industry::Business
        } else if contains_any(FINANCE_TERMS) {
            Industry::Finance
        } else if contains_any(HEALTHCARE_TERMS) {
            Industry::Healthcare
        } else {
            Industry::Technology
        };

        Signals {
            has_email: EMAIL_RE.is_match(text),
            has_phone: PHONE_RE.is_match(text),
            has_education: contains_any(EDUCATION_KEYWORDS),
            has_experience: contains_any(EXPERIENCE_KEYWORDS),
            quantified_achievements: QUANTIFIED_RE.find_iter(text).count(),
            technical_skills: matches(TECHNICAL_SKILLS),
            soft_skills: matches(SOFT_SKILLS),
            industry_keywords: matches(INDUSTRY_KEYWORDS),
            non_empty_lines: trimmed.len(),
            has_bullets: lines.iter().any(|l| l.contains(BULLET_GLYPHS)),
            has_headers: trimmed.iter().any(|l| is_header_line(l)),
            has_summary: contains_any(SUMMARY_INDICATORS),
            industry,
        }
    }
}

/// A header is an all-caps line or a line ending in a colon.
fn is_header_line(line: &str) -> bool {
    let all_caps =
        line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase);
    all_caps || line.ends_with(':')
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    Strength(&'static str),
    Improvement(&'static str),
}

/// Result of evaluating one rule: the section scores it overwrites and the
/// single finding it contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub writes: &'static [(Section, u8)],
    pub finding: Finding,
}

pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&Signals) -> RuleOutcome,
}

/// Applied in this order; the order fixes the order of strengths/improvements.
pub const RULES: &[Rule] = &[
    Rule {
        name: "contact",
        evaluate: contact_rule,
    },
    Rule {
        name: "education",
        evaluate: education_rule,
    },
    Rule {
        name: "experience",
        evaluate: experience_rule,
    },
    Rule {
        name: "skills",
        evaluate: skills_rule,
    },
    Rule {
        name: "keywords",
        evaluate: keywords_rule,
    },
    Rule {
        name: "formatting",
        evaluate: formatting_rule,
    },
    Rule {
        name: "summary",
        evaluate: summary_rule,
    },
];

fn contact_rule(s: &Signals) -> RuleOutcome {
    match (s.has_email, s.has_phone) {
        (true, true) => RuleOutcome {
            writes: &[(Section::Contact, 95)],
            finding: Finding::Strength(MSG_CONTACT_COMPLETE),
        },
        (true, false) | (false, true) => RuleOutcome {
            writes: &[(Section::Contact, 80)],
            finding: Finding::Improvement(MSG_CONTACT_PARTIAL),
        },
        (false, false) => RuleOutcome {
            writes: &[(Section::Contact, 30)],
            finding: Finding::Improvement(MSG_CONTACT_MISSING),
        },
    }
}

fn education_rule(s: &Signals) -> RuleOutcome {
    if s.has_education {
        RuleOutcome {
            writes: &[(Section::Education, 85)],
            finding: Finding::Strength(MSG_EDUCATION_PRESENT),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Education, 40)],
            finding: Finding::Improvement(MSG_EDUCATION_MISSING),
        }
    }
}

fn experience_rule(s: &Signals) -> RuleOutcome {
    if s.has_experience && s.quantified_achievements >= MIN_QUANTIFIED_ACHIEVEMENTS {
        RuleOutcome {
            writes: &[(Section::Experience, 90), (Section::Achievements, 85)],
            finding: Finding::Strength(MSG_EXPERIENCE_QUANTIFIED),
        }
    } else if s.has_experience {
        RuleOutcome {
            writes: &[(Section::Experience, 75)],
            finding: Finding::Improvement(MSG_EXPERIENCE_UNQUANTIFIED),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Experience, 40)],
            finding: Finding::Improvement(MSG_EXPERIENCE_MISSING),
        }
    }
}

fn skills_rule(s: &Signals) -> RuleOutcome {
    let found = s.technical_skills.len();
    if found >= STRONG_TECHNICAL_SKILLS {
        RuleOutcome {
            writes: &[(Section::Skills, 90)],
            finding: Finding::Strength(MSG_SKILLS_STRONG),
        }
    } else if found >= SOME_TECHNICAL_SKILLS {
        RuleOutcome {
            writes: &[(Section::Skills, 75)],
            finding: Finding::Improvement(MSG_SKILLS_SOME),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Skills, 50)],
            finding: Finding::Improvement(MSG_SKILLS_MISSING),
        }
    }
}

fn keywords_rule(s: &Signals) -> RuleOutcome {
    if s.industry_keywords.len() >= MIN_INDUSTRY_KEYWORDS {
        RuleOutcome {
            writes: &[(Section::Keywords, 80)],
            finding: Finding::Strength(MSG_KEYWORDS_GOOD),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Keywords, 60)],
            finding: Finding::Improvement(MSG_KEYWORDS_WEAK),
        }
    }
}

fn formatting_rule(s: &Signals) -> RuleOutcome {
    if s.has_bullets && s.has_headers && s.non_empty_lines > WELL_STRUCTURED_MIN_LINES {
        RuleOutcome {
            writes: &[(Section::Formatting, 90)],
            finding: Finding::Strength(MSG_FORMAT_STRONG),
        }
    } else if s.has_bullets || s.has_headers {
        RuleOutcome {
            writes: &[(Section::Formatting, 75)],
            finding: Finding::Improvement(MSG_FORMAT_PARTIAL),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Formatting, 60)],
            finding: Finding::Improvement(MSG_FORMAT_MISSING),
        }
    }
}

fn summary_rule(s: &Signals) -> RuleOutcome {
    if s.has_summary {
        RuleOutcome {
            writes: &[(Section::Summary, 80)],
            finding: Finding::Strength(MSG_SUMMARY_PRESENT),
        }
    } else {
        RuleOutcome {
            writes: &[(Section::Summary, 40)],
            finding: Finding::Improvement(MSG_SUMMARY_MISSING),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes `text` with baseline jitter drawn from `rng`.
#[cfg(test)]
pub fn analyze<R: Rng>(text: &str, rng: &mut R) -> AnalysisResult {
    analyze_with_progress(text, rng, &mut |_| {})
}

/// Analyzes `text` with baseline jitter drawn from `rng`, reporting each stage to `on_stage` as it starts.
pub fn analyze_with_progress<R: Rng>(
    text: &str,
    rng: &mut R,
    on_stage: &mut dyn FnMut(AnalysisStage),
) -> AnalysisResult {
    on_stage(AnalysisStage::AnalyzingStructure);
    let mut sections = baseline_scores(rng);
    let signals = Signals::collect(text);

    on_stage(AnalysisStage::AnalyzingSkills);
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for rule in RULES {
        let outcome = (rule.evaluate)(&signals);
        debug!(rule = rule.name, finding = ?outcome.finding, "rubric rule applied");
        for &(section, score) in outcome.writes {
            sections.set(section, score);
        }
        match outcome.finding {
            Finding::Strength(msg) => strengths.push(msg.to_string()),
            Finding::Improvement(msg) => improvements.push(msg.to_string()),
        }
    }
    let overall_score = sections.mean();

    on_stage(AnalysisStage::CheckingAts);
    let ats_score = ats_score(&signals);

    on_stage(AnalysisStage::GeneratingRecommendations);
    let current_skills = signals
        .technical_skills
        .iter()
        .chain(signals.soft_skills.iter())
        .map(|s| s.to_string())
        .collect();

    let format_issues = if sections.formatting < FORMAT_ISSUE_THRESHOLD {
        owned(FORMAT_ISSUES)
    } else {
        Vec::new()
    };

    let detailed_report = DetailedReport {
        executive_summary: executive_summary(overall_score),
        key_findings: key_findings(overall_score, ats_score, &signals, &sections),
        action_plan: owned(&ACTION_PLAN),
        priority_actions: owned(PRIORITY_ACTIONS),
    };

    AnalysisResult {
        overall_score,
        strengths,
        improvements,
        ats_score,
        recommendations: owned(RECOMMENDATIONS),
        skill_analysis: SkillAnalysis {
            current_skills,
            missing_skills: missing_skills(&signals),
            skill_gaps: owned(SKILL_GAPS),
            skill_suggestions: owned(SKILL_SUGGESTIONS),
        },
        format_analysis: FormatAnalysis {
            current_format: CURRENT_FORMAT.to_string(),
            suggested_format: SUGGESTED_FORMAT.to_string(),
            format_issues,
            format_improvements: owned(FORMAT_IMPROVEMENTS),
        },
        industry_insights: IndustryInsights {
            industry: signals.industry,
            market_trends: owned(MARKET_TRENDS),
            salary_insights: format!(
                "Salary ranges vary by location and experience in {} sector",
                signals.industry
            ),
            growth_opportunities: owned(GROWTH_OPPORTUNITIES),
        },
        detailed_report,
        sections,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derived metrics
// ────────────────────────────────────────────────────────────────────────────

fn baseline_scores<R: Rng>(rng: &mut R) -> SectionScores {
    let mut scores = SectionScores::default();
    for section in Section::ALL {
        let (low, high) = section.baseline_range();
        scores.set(section, rng.random_range(low..=high));
    }
    scores
}

/// 75 base, bonuses for contact, education, experience and keyword coverage, capped at 100.
fn ats_score(s: &Signals) -> u8 {
    let mut score = ATS_BASE;
    if s.has_email && s.has_phone {
        score += ATS_CONTACT_BONUS;
    }
    if s.has_education {
        score += ATS_EDUCATION_BONUS;
    }
    if s.has_experience {
        score += ATS_EXPERIENCE_BONUS;
    }
    if s.industry_keywords.len() >= MIN_INDUSTRY_KEYWORDS {
        score += ATS_KEYWORD_BONUS;
    }
    score.min(100)
}

fn missing_skills(s: &Signals) -> Vec<String> {
    if s.technical_skills.len() >= STRONG_TECHNICAL_SKILLS {
        return Vec::new();
    }
    TECHNICAL_SKILLS[..MISSING_SKILL_CANDIDATES]
        .iter()
        .filter(|skill| !s.technical_skills.contains(*skill))
        .take(MISSING_SKILL_SUGGESTIONS.min(MAX_MISSING_SKILLS))
        .map(|skill| skill.to_string())
        .collect()
}

fn executive_summary(overall: u8) -> String {
    let assessment = if overall >= 80 {
        SUMMARY_STRONG
    } else {
        SUMMARY_FOUNDATION
    };
    let focus = if overall >= 70 {
        FOCUS_REFINE
    } else {
        FOCUS_STRENGTHEN
    };
    format!("Your resume shows {overall}/100 overall quality. {assessment}. Focus on {focus}.")
}

fn key_findings(overall: u8, ats: u8, s: &Signals, sections: &SectionScores) -> Vec<String> {
    let contact = match sections.contact {
        c if c >= 90 => "Excellent",
        c if c >= 70 => "Good",
        _ => "Needs improvement",
    };
    vec![
        format!("Overall quality score: {overall}/100"),
        format!("ATS compatibility: {ats}/100"),
        format!("Technical skills: {} identified", s.technical_skills.len()),
        format!(
            "Quantified achievements: {} found",
            s.quantified_achievements
        ),
        format!("Contact completeness: {contact}"),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
