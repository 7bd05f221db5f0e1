use thiserror::Error;

/// Errors raised while loading vocabularies or program criteria.
///
/// These are operator-fixable and surface before any candidate is scored.
/// Messy resume text never produces one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("dimension weights for program '{program_id}' must sum to 1.0 (got {sum})")]
    WeightSum { program_id: String, sum: f64 },

    #[error("dimension weight '{dimension}' for program '{program_id}' is invalid: {value}")]
    InvalidDimensionWeight {
        program_id: String,
        dimension: &'static str,
        value: f64,
    },

    #[error("skill '{skill}' in program '{program_id}' has invalid weight {weight}")]
    InvalidSkillWeight {
        program_id: String,
        skill: String,
        weight: f64,
    },

    #[error("skill '{skill}' is listed more than once in program '{program_id}'")]
    DuplicateSkill { program_id: String, skill: String },

    #[error("program '{program_id}' references skill '{skill}' which is not in the skill vocabulary")]
    UnknownSkill { program_id: String, skill: String },

    #[error("minimum experience for program '{program_id}' is invalid: {value}")]
    InvalidMinimumExperience { program_id: String, value: f64 },

    #[error("program id must not be empty")]
    EmptyProgramId,

    #[error("program '{0}' is defined more than once")]
    DuplicateProgram(String),

    #[error("{0} vocabulary is missing or empty")]
    EmptyVocabulary(&'static str),

    #[error("section vocabulary has no headers for required section '{0}'")]
    MissingSection(&'static str),

    #[error("vocabulary entry '{0}' is defined more than once")]
    DuplicateVocabularyEntry(String),

    #[error("term matcher could not be built: {0}")]
    Matcher(String),

    #[error("setting '{name}' is out of range: {value}")]
    SettingOutOfRange { name: &'static str, value: f64 },

    #[error("programs document could not be parsed: {0}")]
    ProgramsDocument(String),
}

/// Start-up failures: either the layered settings could not be read, or
/// the values read do not form a valid vocabulary/program set.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
