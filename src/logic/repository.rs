use crate::error::{Result, SoilWiseError};
use crate::models::{Category, CropRequirementProfile, ParameterRequirement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A rule document that was not loaded, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDocument {
    pub document: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Crop requirement profiles indexed by crop name. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RuleRepository {
    profiles: BTreeMap<String, CropRequirementProfile>,
    report: LoadReport,
}

impl RuleRepository {
    /// Loads every `*.json` document in `dir`.
    ///
    /// A missing directory is an error. Documents that cannot be read,
    /// parsed or validated are logged and skipped.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::error!(dir = %dir.display(), "Crop requirements directory not found");
            return Err(SoilWiseError::RuleStoreMissing(dir.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        if files.is_empty() {
            tracing::warn!(dir = %dir.display(), "No crop requirement files found");
        }

        let mut repo = Self::default();
        for path in &files {
            let document = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let parsed = std::fs::read_to_string(path)
                .map_err(SoilWiseError::from)
                .and_then(|json| CropRequirementProfile::from_json(&document, &json));

            match parsed {
                Ok(profile) => {
                    tracing::debug!(
                        crop = %profile.crop_name,
                        document = %document,
                        seasonal = profile.seasonal,
                        "Loaded crop requirements"
                    );
                    repo.insert(profile, &document);
                }
                Err(e) => {
                    tracing::warn!(document = %document, "Skipping crop requirement document: {}", e);
                    repo.report.skipped.push(SkippedDocument {
                        document,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Loaded {}/{} crop requirement files from {}",
            repo.report.loaded,
            files.len(),
            dir.display()
        );
        Ok(repo)
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = CropRequirementProfile>) -> Self {
        let mut repo = Self::default();
        for profile in profiles {
            repo.insert(profile, "<memory>");
        }
        repo
    }

    fn insert(&mut self, profile: CropRequirementProfile, document: &str) {
        if self.profiles.contains_key(&profile.crop_name) {
            tracing::warn!(
                crop = %profile.crop_name,
                document = %document,
                "Duplicate crop name, overwriting previous entry"
            );
        } else {
            self.report.loaded += 1;
        }
        self.profiles.insert(profile.crop_name.clone(), profile);
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Crop names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profile(&self, name: &str) -> Option<&CropRequirementProfile> {
        self.profiles.get(name)
    }

    pub fn parameter_requirement(
        &self,
        name: &str,
        category: Category,
        parameter: &str,
        season: Option<&str>,
    ) -> Option<&ParameterRequirement> {
        self.profile(name)?.requirement(category, parameter, season)
    }

    pub fn is_seasonal(&self, name: &str) -> bool {
        self.profile(name).is_some_and(|p| p.seasonal)
    }

    /// Season codes of a seasonal crop, `None` for unknown or non-seasonal crops.
    pub fn seasons(&self, name: &str) -> Option<Vec<String>> {
        self.profile(name)
            .filter(|p| p.seasonal)
            .map(CropRequirementProfile::season_codes)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
