use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::{ProgramConfig, WeightsConfig};
use crate::core::vocabulary::{normalize_term, Vocabulary};
use crate::error::ConfigurationError;
use crate::models::domain::{Dimension, EducationLevel};

/// Allowed drift of the dimension weight sum from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative importance of the three scoring dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl DimensionWeights {
    pub fn new(skills: f64, experience: f64, education: f64) -> Self {
        Self {
            skills,
            experience,
            education,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Skills => self.skills,
            Dimension::Experience => self.experience,
            Dimension::Education => self.education,
        }
    }

    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education
    }

    fn validate(&self, program_id: &str) -> Result<(), ConfigurationError> {
        for (dimension, value) in [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidDimensionWeight {
                    program_id: program_id.to_string(),
                    dimension,
                    value,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::WeightSum {
                program_id: program_id.to_string(),
                sum,
            });
        }

        Ok(())
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self::from(WeightsConfig::default())
    }
}

impl From<WeightsConfig> for DimensionWeights {
    fn from(config: WeightsConfig) -> Self {
        Self::new(config.skills, config.experience, config.education)
    }
}

/// One skill a program looks for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRequirement {
    pub name: String,
    pub weight: f64,
    pub required: bool,
}

impl SkillRequirement {
    pub fn required(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            required: true,
        }
    }

    pub fn preferred(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            required: false,
        }
    }
}

/// Validated, read-only requirements of one program.
///
/// The only way to obtain one is through a constructor that checks the
/// weights, so scoring against it can never fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaProfile {
    program_id: String,
    name: String,
    description: Option<String>,
    skills: Vec<SkillRequirement>,
    min_experience_years: f64,
    min_education: EducationLevel,
    weights: DimensionWeights,
}

impl CriteriaProfile {
    pub fn new(
        program_id: impl Into<String>,
        skills: Vec<SkillRequirement>,
        min_experience_years: f64,
        min_education: EducationLevel,
        weights: DimensionWeights,
    ) -> Result<Self, ConfigurationError> {
        let program_id = program_id.into().trim().to_string();
        if program_id.is_empty() {
            return Err(ConfigurationError::EmptyProgramId);
        }

        weights.validate(&program_id)?;

        if !min_experience_years.is_finite() || min_experience_years < 0.0 {
            return Err(ConfigurationError::InvalidMinimumExperience {
                program_id,
                value: min_experience_years,
            });
        }

        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(skills.len());
        for requirement in skills {
            let name = normalize_term(&requirement.name);

            if !requirement.weight.is_finite() || requirement.weight <= 0.0 {
                return Err(ConfigurationError::InvalidSkillWeight {
                    program_id,
                    skill: name,
                    weight: requirement.weight,
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigurationError::DuplicateSkill { program_id, skill: name });
            }

            normalized.push(SkillRequirement { name, ..requirement });
        }
        normalized.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            name: program_id.clone(),
            program_id,
            description: None,
            skills: normalized,
            min_experience_years,
            min_education,
            weights,
        })
    }

    pub fn from_config(config: &ProgramConfig) -> Result<Self, ConfigurationError> {
        let mut skills: Vec<SkillRequirement> = config
            .skills
            .iter()
            .map(|s| SkillRequirement {
                name: s.name.clone(),
                weight: s.weight,
                required: s.required,
            })
            .collect();

        skills.extend(
            config
                .required_skills
                .iter()
                .map(|name| SkillRequirement::required(name.clone(), config.required_weight)),
        );
        skills.extend(
            config
                .preferred_skills
                .iter()
                .map(|name| SkillRequirement::preferred(name.clone(), config.preferred_weight)),
        );

        let profile = Self::new(
            config.id.clone(),
            skills,
            config.min_experience_years,
            config.min_education,
            DimensionWeights::from(config.weights),
        )?;

        Ok(profile.with_details(config.name.clone(), config.description.clone()))
    }

    pub fn with_details(mut self, name: Option<String>, description: Option<String>) -> Self {
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            self.name = name;
        }
        self.description = description;
        self
    }

    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Skill requirements, sorted by name
    pub fn skills(&self) -> &[SkillRequirement] {
        &self.skills
    }

    pub fn required_skills(&self) -> impl Iterator<Item = &SkillRequirement> {
        self.skills.iter().filter(|s| s.required)
    }

    pub fn min_experience_years(&self) -> f64 {
        self.min_experience_years
    }

    pub fn min_education(&self) -> EducationLevel {
        self.min_education
    }

    pub fn weights(&self) -> DimensionWeights {
        self.weights
    }

    /// Check every referenced skill exists in `vocabulary`
    pub fn check_vocabulary(&self, vocabulary: &Vocabulary) -> Result<(), ConfigurationError> {
        match self.skills.iter().find(|s| !vocabulary.knows_skill(&s.name)) {
            Some(unknown) => Err(ConfigurationError::UnknownSkill {
                program_id: self.program_id.clone(),
                skill: unknown.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// All configured programs, keyed by program id
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalog {
    programs: BTreeMap<String, Arc<CriteriaProfile>>,
}

impl ProgramCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(
        configs: &[ProgramConfig],
        vocabulary: &Vocabulary,
    ) -> Result<Self, ConfigurationError> {
        let mut catalog = Self::new();
        for config in configs {
            catalog.register(CriteriaProfile::from_config(config)?, vocabulary)?;
        }
        Ok(catalog)
    }

    pub fn register(
        &mut self,
        profile: CriteriaProfile,
        vocabulary: &Vocabulary,
    ) -> Result<(), ConfigurationError> {
        profile.check_vocabulary(vocabulary)?;

        let id = profile.program_id().to_string();
        if self.programs.contains_key(&id) {
            return Err(ConfigurationError::DuplicateProgram(id));
        }

        tracing::debug!(
            "Registered program '{}' ({} skills, weights {:?})",
            id,
            profile.skills().len(),
            profile.weights()
        );
        self.programs.insert(id, Arc::new(profile));
        Ok(())
    }

    pub fn get(&self, program_id: &str) -> Option<Arc<CriteriaProfile>> {
        self.programs.get(program_id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CriteriaProfile>> {
        self.programs.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.programs.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
