use std::fmt;

use serde::{Deserialize, Serialize};

/// The nine rubric dimensions, in their canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Formatting,
    Content,
    Keywords,
    Experience,
    Skills,
    Education,
    Contact,
    Summary,
    Achievements,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Formatting,
        Section::Content,
        Section::Keywords,
        Section::Experience,
        Section::Skills,
        Section::Education,
        Section::Contact,
        Section::Summary,
        Section::Achievements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Formatting => "formatting",
            Section::Content => "content",
            Section::Keywords => "keywords",
            Section::Experience => "experience",
            Section::Skills => "skills",
            Section::Education => "education",
            Section::Contact => "contact",
            Section::Summary => "summary",
            Section::Achievements => "achievements",
        }
    }

    /// Inclusive range the baseline jitter is drawn from.
    pub fn baseline_range(&self) -> (u8, u8) {
        match self {
            Section::Formatting => (70, 85),
            Section::Content => (65, 80),
            Section::Keywords => (60, 75),
            Section::Experience => (70, 85),
            Section::Skills => (65, 80),
            Section::Education => (70, 90),
            Section::Contact => (75, 95),
            Section::Summary => (55, 75),
            Section::Achievements => (60, 80),
        }
    }
}

/// Per-section scores. Every key is always present; values stay in 0..=100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionScores {
    pub formatting: u8,
    pub content: u8,
    pub keywords: u8,
    pub experience: u8,
    pub skills: u8,
    pub education: u8,
    pub contact: u8,
    pub summary: u8,
    pub achievements: u8,
}

impl SectionScores {
    pub fn get(&self, section: Section) -> u8 {
        match section {
            Section::Formatting => self.formatting,
            Section::Content => self.content,
            Section::Keywords => self.keywords,
            Section::Experience => self.experience,
            Section::Skills => self.skills,
            Section::Education => self.education,
            Section::Contact => self.contact,
            Section::Summary => self.summary,
            Section::Achievements => self.achievements,
        }
    }

    /// Overwrites one section's score, clamped to 100.
    pub fn set(&mut self, section: Section, score: u8) {
        let score = score.min(100);
        match section {
            Section::Formatting => self.formatting = score,
            Section::Content => self.content = score,
            Section::Keywords => self.keywords = score,
            Section::Experience => self.experience = score,
            Section::Skills => self.skills = score,
            Section::Education => self.education = score,
            Section::Contact => self.contact = score,
            Section::Summary => self.summary = score,
            Section::Achievements => self.achievements = score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, u8)> + '_ {
        Section::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    /// Rounded arithmetic mean of all nine sections.
    pub fn mean(&self) -> u8 {
        let total: u32 = self.iter().map(|(_, score)| u32::from(score)).sum();
        (f64::from(total) / Section::ALL.len() as f64).round() as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    #[default]
    Technology,
    Business,
    Finance,
    Healthcare,
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Industry::Technology => "Technology",
            Industry::Business => "Business",
            Industry::Finance => "Finance",
            Industry::Healthcare => "Healthcare",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillAnalysis {
    pub current_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub skill_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatAnalysis {
    pub current_format: String,
    pub suggested_format: String,
    pub format_issues: Vec<String>,
    pub format_improvements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryInsights {
    pub industry: Industry,
    pub market_trends: Vec<String>,
    pub salary_insights: String,
    pub growth_opportunities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedReport {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    /// One entry per week; always four when produced by the analyzer.
    pub action_plan: Vec<String>,
    pub priority_actions: Vec<String>,
}

/// Full structured assessment of one resume. Key names are consumed verbatim
/// by the report renderer and by stored analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub sections: SectionScores,
    pub ats_score: u8,
    pub recommendations: Vec<String>,
    pub skill_analysis: SkillAnalysis,
    pub format_analysis: FormatAnalysis,
    pub industry_insights: IndustryInsights,
    pub detailed_report: DetailedReport,
}
