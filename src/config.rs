use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigurationError, SettingsError};
use crate::models::EducationLevel;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub vocabulary: VocabularySettings,
    #[serde(default)]
    pub programs: Vec<ProgramConfig>,
    /// Optional TOML document with additional `[[programs]]` entries
    #[serde(default)]
    pub programs_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Largest accepted JSON body; batches of full resumes exceed actix's 32KB default
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_max_payload_bytes() -> usize { 16 * 1024 * 1024 }

/// Constants used by the dimension scorers
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScoringSettings {
    /// Experience sub-score when years of experience could not be determined
    #[serde(default = "default_neutral_experience_score")]
    pub neutral_experience_score: f64,
    /// Education sub-score when no degree could be found
    #[serde(default = "default_neutral_education_score")]
    pub neutral_education_score: f64,
    /// Years beyond a program's minimum needed to reach a full experience score
    #[serde(default)]
    pub experience_margin_years: f64,
    /// Education points lost per ordinal level below the requirement
    #[serde(default = "default_education_penalty_per_level")]
    pub education_penalty_per_level: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            neutral_experience_score: default_neutral_experience_score(),
            neutral_education_score: default_neutral_education_score(),
            experience_margin_years: 0.0,
            education_penalty_per_level: default_education_penalty_per_level(),
        }
    }
}

fn default_neutral_experience_score() -> f64 { 50.0 }
fn default_neutral_education_score() -> f64 { 50.0 }
fn default_education_penalty_per_level() -> f64 { 25.0 }

impl ScoringSettings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let checks = [
            ("neutral_experience_score", self.neutral_experience_score, 0.0, 100.0),
            ("neutral_education_score", self.neutral_education_score, 0.0, 100.0),
            ("experience_margin_years", self.experience_margin_years, 0.0, 50.0),
            ("education_penalty_per_level", self.education_penalty_per_level, 0.0, 100.0),
        ];

        for (name, value, min, max) in checks {
            if !value.is_finite() || value < min || value > max {
                return Err(ConfigurationError::SettingOutOfRange { name, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// Maximum number of tokens kept as field of study after a degree keyword
    #[serde(default = "default_field_of_study_window")]
    pub field_of_study_window: usize,
    /// Reference date for open-ended ranges ("present"). Defaults to today.
    #[serde(default)]
    pub as_of: Option<chrono::NaiveDate>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            field_of_study_window: default_field_of_study_window(),
            as_of: None,
        }
    }
}

fn default_field_of_study_window() -> usize { 6 }

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_batch_workers")]
    pub workers: usize,
    /// Wall-clock budget for one batch; candidates not started by then are skipped
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            workers: default_batch_workers(),
            deadline_ms: None,
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_batch_workers() -> usize { 4 }
fn default_max_candidates() -> usize { 500 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Skill, section-header and degree vocabularies
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularySettings {
    #[serde(default = "default_skill_entries")]
    pub skills: Vec<SkillEntry>,
    #[serde(default = "default_section_entries")]
    pub sections: Vec<SectionEntry>,
    #[serde(default)]
    pub education: EducationVocabulary,
}

impl Default for VocabularySettings {
    fn default() -> Self {
        Self {
            skills: default_skill_entries(),
            sections: default_section_entries(),
            education: EducationVocabulary::default(),
        }
    }
}

/// Canonical skill and the surface forms that count as a mention of it
#[derive(Debug, Clone, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Grouping used by analytics, e.g. `programming` or `cloud`
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionEntry {
    pub label: String,
    pub headers: Vec<String>,
}

/// Degree keywords per ordinal level. `none` has no keywords by definition.
#[derive(Debug, Clone, Deserialize)]
pub struct EducationVocabulary {
    #[serde(default = "default_secondary_terms")]
    pub secondary: Vec<String>,
    #[serde(default = "default_bachelor_terms")]
    pub bachelor: Vec<String>,
    #[serde(default = "default_master_terms")]
    pub master: Vec<String>,
    #[serde(default = "default_doctorate_terms")]
    pub doctorate: Vec<String>,
    /// Phrases in which a degree keyword does not denote a degree
    #[serde(default = "default_degree_exclusions")]
    pub exclusions: Vec<String>,
}

impl Default for EducationVocabulary {
    fn default() -> Self {
        Self {
            secondary: default_secondary_terms(),
            bachelor: default_bachelor_terms(),
            master: default_master_terms(),
            doctorate: default_doctorate_terms(),
            exclusions: default_degree_exclusions(),
        }
    }
}

impl EducationVocabulary {
    pub fn levels(&self) -> [(EducationLevel, &[String]); 4] {
        [
            (EducationLevel::Secondary, self.secondary.as_slice()),
            (EducationLevel::Bachelor, self.bachelor.as_slice()),
            (EducationLevel::Master, self.master.as_slice()),
            (EducationLevel::Doctorate, self.doctorate.as_slice()),
        ]
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn skill(name: &str, aliases: &[&str]) -> SkillEntry {
    SkillEntry {
        name: name.to_string(),
        aliases: strings(aliases),
        category: None,
    }
}

fn in_category(category: &str, entries: Vec<SkillEntry>) -> Vec<SkillEntry> {
    entries
        .into_iter()
        .map(|entry| SkillEntry {
            category: Some(category.to_string()),
            ..entry
        })
        .collect()
}

fn default_skill_entries() -> Vec<SkillEntry> {
    [
        in_category("programming", programming_skills()),
        in_category("web", web_skills()),
        in_category("database", database_skills()),
        in_category("cloud", cloud_skills()),
        in_category("data_science", data_science_skills()),
    ]
    .concat()
}

fn programming_skills() -> Vec<SkillEntry> {
    vec![
        skill("python", &["python3", "py"]),
        skill("javascript", &["js", "java script", "ecmascript"]),
        skill("java", &[]),
        skill("html", &["html5"]),
        skill("css", &["css3"]),
        skill("sql", &[]),
        skill("php", &[]),
        skill("c++", &["cpp", "c plus plus", "cplusplus"]),
        skill("c#", &["c sharp", "csharp"]),
        skill("typescript", &["ts"]),
        skill("git", &["github", "gitlab"]),
    ]
}

fn web_skills() -> Vec<SkillEntry> {
    vec![
        skill("react", &["reactjs", "react.js"]),
        skill("angular", &["angularjs"]),
        skill("vue", &["vuejs", "vue.js"]),
        skill("node.js", &["nodejs", "node js"]),
        skill("django", &[]),
        skill("flask", &[]),
        skill("bootstrap", &[]),
        skill("jquery", &[]),
    ]
}

fn database_skills() -> Vec<SkillEntry> {
    vec![
        skill("mysql", &[]),
        skill("postgresql", &["postgres"]),
        skill("mongodb", &["mongo"]),
        skill("sqlite", &[]),
        skill("redis", &[]),
        skill("elasticsearch", &["elastic search"]),
    ]
}

fn cloud_skills() -> Vec<SkillEntry> {
    vec![
        skill("aws", &["amazon web services"]),
        skill("azure", &["microsoft azure"]),
        skill("gcp", &["google cloud", "google cloud platform"]),
        skill("docker", &[]),
        skill("kubernetes", &["k8s"]),
        skill("terraform", &[]),
    ]
}

fn data_science_skills() -> Vec<SkillEntry> {
    vec![
        skill("pandas", &[]),
        skill("numpy", &[]),
        skill("scikit-learn", &["sklearn", "scikit learn"]),
        skill("tensorflow", &[]),
        skill("pytorch", &[]),
        skill("jupyter", &["jupyter notebook"]),
        skill("matplotlib", &[]),
        skill("tableau", &[]),
    ]
}

fn section(label: &str, headers: &[&str]) -> SectionEntry {
    SectionEntry {
        label: label.to_string(),
        headers: strings(headers),
    }
}

fn default_section_entries() -> Vec<SectionEntry> {
    vec![
        section(
            "experience",
            &[
                "experience",
                "work experience",
                "professional experience",
                "relevant experience",
                "employment",
                "employment history",
                "work history",
                "career history",
            ],
        ),
        section(
            "education",
            &[
                "education",
                "educational background",
                "academic background",
                "education and training",
                "qualifications",
                "academic qualifications",
            ],
        ),
        section(
            "skills",
            &[
                "skills",
                "technical skills",
                "key skills",
                "core competencies",
                "competencies",
                "skills and tools",
            ],
        ),
        section(
            "summary",
            &["summary", "professional summary", "profile", "objective", "career objective", "about me"],
        ),
        section("projects", &["projects", "personal projects", "key projects"]),
        section(
            "certifications",
            &["certifications", "certificates", "licenses and certifications"],
        ),
        section("awards", &["awards", "honors", "achievements"]),
        section("interests", &["interests", "hobbies", "hobbies and interests"]),
        section("references", &["references", "referees"]),
    ]
}

fn default_secondary_terms() -> Vec<String> {
    strings(&[
        "high school",
        "secondary school",
        "ssce",
        "waec",
        "neco",
        "ged",
        "a-levels",
        "a levels",
        "diploma",
        "ond",
        "national diploma",
    ])
}

fn default_bachelor_terms() -> Vec<String> {
    strings(&[
        "bachelor",
        "bachelors",
        "b.sc",
        "bsc",
        "b.s",
        "b.a",
        "b.tech",
        "btech",
        "b.eng",
        "beng",
        "b.ed",
        "undergraduate degree",
        "hnd",
        "higher national diploma",
    ])
}

fn default_master_terms() -> Vec<String> {
    strings(&[
        "master",
        "masters",
        "m.sc",
        "msc",
        "m.s",
        "m.a",
        "mba",
        "m.tech",
        "mtech",
        "m.eng",
        "meng",
    ])
}

fn default_doctorate_terms() -> Vec<String> {
    strings(&["phd", "ph.d", "doctorate", "doctoral", "dphil", "d.phil"])
}

fn default_degree_exclusions() -> Vec<String> {
    strings(&[
        "scrum master",
        "master data",
        "master branch",
        "master class",
        "master plan",
        "master of ceremonies",
        "master chef",
        "master trainer",
        "master craftsman",
    ])
}

/// Declarative description of one program, validated into a `CriteriaProfile`
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillRequirementConfig>,
    /// Shorthand: each listed skill is required with `required_weight`
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Shorthand: each listed skill is preferred with `preferred_weight`
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default = "default_required_weight")]
    pub required_weight: f64,
    #[serde(default = "default_preferred_weight")]
    pub preferred_weight: f64,
    #[serde(default)]
    pub min_experience_years: f64,
    #[serde(default)]
    pub min_education: EducationLevel,
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillRequirementConfig {
    pub name: String,
    #[serde(default = "default_required_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

fn default_required_weight() -> f64 { 1.0 }
fn default_preferred_weight() -> f64 { 0.5 }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skills_weight")]
    pub skills: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_education_weight")]
    pub education: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skills: default_skills_weight(),
            experience: default_experience_weight(),
            education: default_education_weight(),
        }
    }
}

fn default_skills_weight() -> f64 { 0.5 }
fn default_experience_weight() -> f64 { 0.3 }
fn default_education_weight() -> f64 { 0.2 }

#[derive(Debug, Deserialize)]
struct ProgramsDocument {
    #[serde(default)]
    programs: Vec<ProgramConfig>,
}

/// Parse a standalone programs document (`[[programs]]` tables)
pub fn parse_programs_toml(source: &str) -> Result<Vec<ProgramConfig>, ConfigurationError> {
    toml::from_str::<ProgramsDocument>(source)
        .map(|doc| doc.programs)
        .map_err(|e| ConfigurationError::ProgramsDocument(e.to_string()))
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCREENER__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCREENER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCREENER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCREENER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Inline programs followed by those from `programs_file`, if set
    pub fn all_programs(&self) -> Result<Vec<ProgramConfig>, SettingsError> {
        let mut programs = self.programs.clone();

        if let Some(path) = &self.programs_file {
            let source = std::fs::read_to_string(path)?;
            programs.extend(parse_programs_toml(&source)?);
        }

        Ok(programs)
    }
}
