//! Fixed vocabularies and message catalogs used by the rubric analyzer.
//!
//! Scoring logic only ever refers to these tables by name, so wording can be
//! changed (or localized) here without touching `analyzer.rs`.

// ────────────────────────────────────────────────────────────────────────────
// Detection patterns
// ────────────────────────────────────────────────────────────────────────────

pub const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b";
pub const PHONE_PATTERN: &str = r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}";
/// `N%`, `N+`, `$N`, `N years`, `N months`
pub const QUANTIFIED_PATTERN: &str = r"\d+%|\d+\+|\$\d+|\d+ years|\d+ months";

/// Characters that mark a line as a bullet point.
pub const BULLET_GLYPHS: &[char] = &['•', '*', '-'];

// ────────────────────────────────────────────────────────────────────────────
// Vocabularies (matched as lower-case substrings)
// ────────────────────────────────────────────────────────────────────────────

pub const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "degree",
    "university",
    "college",
    "diploma",
    "certification",
];

pub const EXPERIENCE_KEYWORDS: &[&str] = &[
    "experience",
    "worked",
    "job",
    "position",
    "role",
    "company",
    "years",
];

pub const TECHNICAL_SKILLS: &[&str] = &[
    "python",
    "javascript",
    "java",
    "react",
    "angular",
    "sql",
    "html",
    "css",
    "node",
    "git",
    "docker",
    "aws",
    "azure",
    "machine learning",
    "ai",
    "data analysis",
];

pub const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "project management",
    "time management",
];

pub const INDUSTRY_KEYWORDS: &[&str] = &[
    "software",
    "engineering",
    "development",
    "design",
    "marketing",
    "sales",
    "finance",
    "analyst",
    "manager",
    "consultant",
];

pub const SUMMARY_INDICATORS: &[&str] = &["summary", "objective", "profile", "about"];

/// Industry vote groups, evaluated in order; first group with a hit wins.
pub const BUSINESS_TERMS: &[&str] = &["marketing", "sales", "business"];
pub const FINANCE_TERMS: &[&str] = &["finance", "accounting", "banking"];
pub const HEALTHCARE_TERMS: &[&str] = &["healthcare", "medical", "nurse"];

// ────────────────────────────────────────────────────────────────────────────
// Thresholds
// ────────────────────────────────────────────────────────────────────────────

pub const MIN_QUANTIFIED_ACHIEVEMENTS: usize = 2;
pub const STRONG_TECHNICAL_SKILLS: usize = 5;
pub const SOME_TECHNICAL_SKILLS: usize = 3;
pub const MIN_INDUSTRY_KEYWORDS: usize = 3;
pub const WELL_STRUCTURED_MIN_LINES: usize = 10;
/// Only the head of the technical vocabulary is suggested as missing.
pub const MISSING_SKILL_CANDIDATES: usize = 10;
pub const MISSING_SKILL_SUGGESTIONS: usize = 3;
pub const MAX_MISSING_SKILLS: usize = 5;
pub const FORMAT_ISSUE_THRESHOLD: u8 = 80;

pub const ATS_BASE: u8 = 75;
pub const ATS_CONTACT_BONUS: u8 = 10;
pub const ATS_EDUCATION_BONUS: u8 = 5;
pub const ATS_EXPERIENCE_BONUS: u8 = 5;
pub const ATS_KEYWORD_BONUS: u8 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Findings
// ────────────────────────────────────────────────────────────────────────────

pub const MSG_CONTACT_COMPLETE: &str = "Complete contact information provided";
pub const MSG_CONTACT_PARTIAL: &str = "Add missing contact information (email or phone)";
pub const MSG_CONTACT_MISSING: &str = "Add email and phone number";

pub const MSG_EDUCATION_PRESENT: &str = "Educational background clearly presented";
pub const MSG_EDUCATION_MISSING: &str = "Include educational background";

pub const MSG_EXPERIENCE_QUANTIFIED: &str = "Strong experience with quantified achievements";
pub const MSG_EXPERIENCE_UNQUANTIFIED: &str =
    "Add more quantified achievements (numbers, percentages)";
pub const MSG_EXPERIENCE_MISSING: &str = "Include work experience section";

pub const MSG_SKILLS_STRONG: &str = "Comprehensive technical skills listed";
pub const MSG_SKILLS_SOME: &str = "Add more technical skills";
pub const MSG_SKILLS_MISSING: &str = "Include technical skills section";

pub const MSG_KEYWORDS_GOOD: &str = "Good use of industry keywords";
pub const MSG_KEYWORDS_WEAK: &str = "Include more industry-specific keywords";

pub const MSG_FORMAT_STRONG: &str = "Well-formatted resume with clear structure";
pub const MSG_FORMAT_PARTIAL: &str = "Improve resume formatting and structure";
pub const MSG_FORMAT_MISSING: &str = "Add bullet points and clear section headers";

pub const MSG_SUMMARY_PRESENT: &str = "Professional summary included";
pub const MSG_SUMMARY_MISSING: &str = "Add a professional summary or objective";

// ────────────────────────────────────────────────────────────────────────────
// Report catalogs
// ────────────────────────────────────────────────────────────────────────────

pub const RECOMMENDATIONS: &[&str] = &[
    "Use action verbs to start each bullet point (Led, Developed, Implemented)",
    "Include specific metrics and quantifiable results",
    "Tailor keywords to match job descriptions",
    "Keep resume to 1-2 pages maximum",
    "Use consistent formatting throughout",
    "Include a professional summary at the top",
];

pub const SKILL_GAPS: &[&str] = &["Advanced technical certifications", "Leadership experience"];

pub const SKILL_SUGGESTIONS: &[&str] = &[
    "Consider learning cloud platforms (AWS, Azure, GCP)",
    "Add project management tools (Agile, Scrum, Jira)",
    "Include version control experience (Git, GitHub)",
    "Learn data analysis tools (Excel, SQL, Tableau)",
];

pub const CURRENT_FORMAT: &str = "Mixed";
pub const SUGGESTED_FORMAT: &str = "Chronological with clear sections";
pub const FORMAT_ISSUES: &[&str] = &["Inconsistent formatting", "Missing bullet points"];
pub const FORMAT_IMPROVEMENTS: &[&str] = &[
    "Use consistent fonts",
    "Add bullet points",
    "Include clear section headers",
];

pub const MARKET_TRENDS: &[&str] = &[
    "Remote work opportunities are increasing",
    "Digital skills are in high demand",
    "AI and automation are transforming industries",
    "Soft skills are becoming more important",
];

pub const GROWTH_OPPORTUNITIES: &[&str] = &[
    "Upskill in emerging technologies",
    "Develop leadership capabilities",
    "Build a strong professional network",
    "Consider certification programs",
];

/// One entry per week.
pub const ACTION_PLAN: [&str; 4] = [
    "Week 1: Add missing contact information and professional summary",
    "Week 2: Include quantified achievements with specific numbers",
    "Week 3: Optimize formatting and add bullet points",
    "Week 4: Tailor keywords and get professional feedback",
];

pub const PRIORITY_ACTIONS: &[&str] = &[
    "Add quantified achievements to experience section",
    "Include a professional summary at the top",
    "List technical skills clearly",
    "Ensure contact information is complete",
];

pub const SUMMARY_STRONG: &str = "Strong technical background and clear experience";
pub const SUMMARY_FOUNDATION: &str = "Good foundation with room for improvement";
pub const FOCUS_REFINE: &str = "refining presentation";
pub const FOCUS_STRENGTHEN: &str = "strengthening core sections";

/// Converts a static catalog into owned strings for the result payload.
pub fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
