use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier for a student, unique across branches and years.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for one employer's recruitment criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evidence categories that feed the placement readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Github,
    Resume,
    Academic,
    Skills,
    Aptitude,
    SoftSkills,
}

impl SignalCategory {
    /// Canonical iteration order for hashing and fixed-shape breakdowns.
    pub const ALL: [SignalCategory; 6] = [
        SignalCategory::Github,
        SignalCategory::Resume,
        SignalCategory::Academic,
        SignalCategory::Skills,
        SignalCategory::Aptitude,
        SignalCategory::SoftSkills,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SignalCategory::Github => "github",
            SignalCategory::Resume => "resume",
            SignalCategory::Academic => "academic",
            SignalCategory::Skills => "skills",
            SignalCategory::Aptitude => "aptitude",
            SignalCategory::SoftSkills => "soft_skills",
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Repository-level activity extracted from a profile crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub name: String,
    pub primary_language: Option<String>,
    #[serde(default)]
    pub stars: u32,
}

/// Recent-contribution summary attached to a GitHub signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub commits_last_90_days: u32,
    pub active_repos_last_90_days: u32,
}

/// Output of the GitHub analysis pipeline. `github_score` is already on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSignal {
    pub public_repos: u32,
    pub github_score: f64,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub top_languages: Vec<String>,
    #[serde(default)]
    pub activity_summary: ActivitySummary,
    #[serde(default)]
    pub repo_analysis: Vec<RepoSnapshot>,
}

/// Output of the resume analysis pipeline. Scoring consumes the ATS sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSignal {
    pub resume_score: f64,
    pub ats_score: f64,
    #[serde(default)]
    pub missing_sections: Vec<String>,
    #[serde(default)]
    pub profile_mismatches: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Academic standing on the institution's 10-point CGPA scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicSignal {
    pub cgpa: f64,
}

/// Declared technical skills, matched case-insensitively against the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsSignal {
    pub skills: Vec<String>,
}

/// A proctored assessment result, already on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSignal {
    pub score: f64,
}

/// Tagged signal payload; each category carries its own validated schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum SignalPayload {
    Github(GithubSignal),
    Resume(ResumeSignal),
    Academic(AcademicSignal),
    Skills(SkillsSignal),
    Aptitude(AssessmentSignal),
    SoftSkills(AssessmentSignal),
}

impl SignalPayload {
    pub const fn category(&self) -> SignalCategory {
        match self {
            SignalPayload::Github(_) => SignalCategory::Github,
            SignalPayload::Resume(_) => SignalCategory::Resume,
            SignalPayload::Academic(_) => SignalCategory::Academic,
            SignalPayload::Skills(_) => SignalCategory::Skills,
            SignalPayload::Aptitude(_) => SignalCategory::Aptitude,
            SignalPayload::SoftSkills(_) => SignalCategory::SoftSkills,
        }
    }
}

/// Latest accepted signal for one category, versioned by a content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub category: SignalCategory,
    pub payload: SignalPayload,
    pub input_hash: String,
    pub updated_at: DateTime<Utc>,
}

/// At most one signal per category; replaced wholesale on each new write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<SignalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<SignalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic: Option<SignalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<SignalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aptitude: Option<SignalRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<SignalRecord>,
}

impl SignalSet {
    pub fn get(&self, category: SignalCategory) -> Option<&SignalRecord> {
        match category {
            SignalCategory::Github => self.github.as_ref(),
            SignalCategory::Resume => self.resume.as_ref(),
            SignalCategory::Academic => self.academic.as_ref(),
            SignalCategory::Skills => self.skills.as_ref(),
            SignalCategory::Aptitude => self.aptitude.as_ref(),
            SignalCategory::SoftSkills => self.soft_skills.as_ref(),
        }
    }

    /// Stores `record` in its category slot, returning the signal it displaced.
    pub fn replace(&mut self, record: SignalRecord) -> Option<SignalRecord> {
        let slot = match record.category {
            SignalCategory::Github => &mut self.github,
            SignalCategory::Resume => &mut self.resume,
            SignalCategory::Academic => &mut self.academic,
            SignalCategory::Skills => &mut self.skills,
            SignalCategory::Aptitude => &mut self.aptitude,
            SignalCategory::SoftSkills => &mut self.soft_skills,
        };
        slot.replace(record)
    }

    /// Present signals in canonical category order.
    pub fn present(&self) -> impl Iterator<Item = &SignalRecord> {
        SignalCategory::ALL
            .iter()
            .filter_map(|category| self.get(*category))
    }

    pub fn categories(&self) -> Vec<SignalCategory> {
        self.present().map(|record| record.category).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Registration data for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: StudentId,
    pub name: String,
    pub branch: String,
    /// Year of study, 1 through 4.
    pub year: u8,
    pub cgpa: f64,
    /// Mirrors the latest skills signal; order carries no meaning.
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Risk classification of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Red,
    Yellow,
    Green,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Red => "Red",
            Tier::Yellow => "Yellow",
            Tier::Green => "Green",
        }
    }
}

/// One category's share of the composite score. `contribution` is left
/// unrounded so the weighted arithmetic stays auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryContribution {
    pub contribution: f64,
    pub incomplete: bool,
}

impl Default for CategoryContribution {
    fn default() -> Self {
        Self {
            contribution: 0.0,
            incomplete: true,
        }
    }
}

/// Fixed-shape score breakdown: one entry per configured category, never an
/// open map, so adding a category is a schema change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub github: CategoryContribution,
    pub resume: CategoryContribution,
    pub academic: CategoryContribution,
    pub skills: CategoryContribution,
    pub aptitude: CategoryContribution,
    pub soft_skills: CategoryContribution,
}

impl ScoreBreakdown {
    pub fn get(&self, category: SignalCategory) -> &CategoryContribution {
        match category {
            SignalCategory::Github => &self.github,
            SignalCategory::Resume => &self.resume,
            SignalCategory::Academic => &self.academic,
            SignalCategory::Skills => &self.skills,
            SignalCategory::Aptitude => &self.aptitude,
            SignalCategory::SoftSkills => &self.soft_skills,
        }
    }

    pub(crate) fn set(&mut self, category: SignalCategory, entry: CategoryContribution) {
        let slot = match category {
            SignalCategory::Github => &mut self.github,
            SignalCategory::Resume => &mut self.resume,
            SignalCategory::Academic => &mut self.academic,
            SignalCategory::Skills => &mut self.skills,
            SignalCategory::Aptitude => &mut self.aptitude,
            SignalCategory::SoftSkills => &mut self.soft_skills,
        };
        *slot = entry;
    }
}

/// Composite placement readiness score for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrsResult {
    pub student_id: StudentId,
    /// Integer composite, clamped to 0-100.
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub tier: Tier,
    /// Hash of the full signal set this score was derived from.
    pub input_hash: String,
    pub computed_at: DateTime<Utc>,
}

/// One employer's published criteria for a placement drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyCriteria {
    pub company_id: CompanyId,
    pub company_name: String,
    pub role: String,
    pub tier: String,
    pub allowed_branches: Vec<String>,
    pub min_cgpa: f64,
    pub min_prs: u8,
    pub required_skills: Vec<String>,
}

/// Outcome of matching one student against one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub company_id: CompanyId,
    pub company_name: String,
    pub role: String,
    pub student_id: StudentId,
    /// Share of required skills the student holds, one decimal place.
    pub match_percent: f64,
    pub eligible: bool,
    pub missing_skills: Vec<String>,
}
