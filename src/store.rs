//! Profile store: the immutable language → profile table the detector scores against
//!
//! A store is produced once by [`ProfileStoreBuilder`] and never changes
//! afterwards, so one store can back any number of concurrent detections.
//!
//! # Precedence
//!
//! Sources are applied in the order they are added. When the same language
//! identifier appears in more than one source, the later profile replaces the
//! earlier one but keeps the earlier position in the table (table order is
//! the detector's tie-break order). Inside a directory, `*.toml` files are
//! applied in file-name order.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::Limits;
use crate::error::{LangSniffError, Result};
use crate::profile::{LanguageProfile, RawProfile};

/// Read-only table of language profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: IndexMap<String, LanguageProfile>,
    backtrack_limit: usize,
}

impl ProfileStore {
    pub fn builder() -> ProfileStoreBuilder {
        ProfileStoreBuilder::new()
    }

    /// Load a directory of `*.toml` profile files or a single profile file
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::builder().add_path(path)?.build()
    }

    /// Parse one TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::builder().add_toml_str("<inline>", content)?.build()
    }

    /// Profiles bundled with the crate (css, go, html, java, javascript, php,
    /// python, ruby, scss, svg, twig, typescript, xml)
    #[cfg(feature = "embedded-profiles")]
    pub fn builtin() -> Result<Self> {
        Self::builder().add_builtin()?.build()
    }

    /// Every profile, in table order
    pub fn all_profiles(&self) -> &IndexMap<String, LanguageProfile> {
        &self.profiles
    }

    pub fn get(&self, language: &str) -> Option<&LanguageProfile> {
        self.profiles.get(language)
    }

    pub fn contains(&self, language: &str) -> bool {
        self.profiles.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Backtrack limit the patterns in this store were compiled with
    pub fn backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }

    /// Always false for a built store; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Accumulates profile sources and produces a [`ProfileStore`]
#[derive(Debug)]
pub struct ProfileStoreBuilder {
    profiles: IndexMap<String, LanguageProfile>,
    origins: Vec<String>,
    backtrack_limit: usize,
}

impl Default for ProfileStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStoreBuilder {
    pub fn new() -> Self {
        Self {
            profiles: IndexMap::new(),
            origins: Vec::new(),
            backtrack_limit: Limits::default().backtrack_limit,
        }
    }

    /// Apply regex limits to patterns compiled by subsequent sources
    pub fn limits(mut self, limits: &Limits) -> Self {
        self.backtrack_limit = limits.backtrack_limit;
        self
    }

    /// Add a directory of `*.toml` files or a single file
    pub fn add_path(self, path: &Path) -> Result<Self> {
        if path.is_dir() {
            self.add_dir(path)
        } else if path.is_file() {
            self.add_file(path)
        } else {
            Err(LangSniffError::SourceNotFound {
                path: path.display().to_string(),
            })
        }
    }

    /// Add one TOML document; `origin` names it in logs and errors
    pub fn add_toml_str(mut self, origin: &str, content: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| LangSniffError::malformed(origin, e.message()))?;
        self.merge_table(origin, table);
        self.origins.push(origin.to_string());
        Ok(self)
    }

    #[cfg(feature = "embedded-profiles")]
    pub fn add_builtin(mut self) -> Result<Self> {
        for (name, content) in crate::builtin::PROFILE_SOURCES {
            self = self.add_toml_str(name, content)?;
        }
        Ok(self)
    }

    /// Finish loading; fails if nothing usable was loaded
    pub fn build(self) -> Result<ProfileStore> {
        if self.profiles.is_empty() {
            return Err(LangSniffError::SourceEmpty {
                path: if self.origins.is_empty() {
                    "<no sources>".to_string()
                } else {
                    self.origins.join(", ")
                },
            });
        }

        info!(
            "Loaded {} language profiles from {} source(s)",
            self.profiles.len(),
            self.origins.len()
        );
        Ok(ProfileStore {
            profiles: self.profiles,
            backtrack_limit: self.backtrack_limit,
        })
    }

    fn add_file(self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        self.add_toml_str(&path.display().to_string(), &content)
    }

    fn add_dir(mut self, dir: &Path) -> Result<Self> {
        let files = profile_files(dir)?;
        if files.is_empty() {
            return Err(LangSniffError::SourceEmpty {
                path: dir.display().to_string(),
            });
        }

        let mut first_failure = None;
        let mut loaded = 0usize;
        for file in &files {
            let origin = file.display().to_string();
            let table = fs::read_to_string(file)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    toml::from_str::<toml::Table>(&content).map_err(|e| e.message().to_string())
                });

            match table {
                Ok(table) => {
                    self.merge_table(&origin, table);
                    self.origins.push(origin);
                    loaded += 1;
                }
                Err(message) => {
                    warn!("Failed to load profile file {}: {}", origin, message);
                    first_failure.get_or_insert((origin, message));
                }
            }
        }

        if loaded == 0 {
            if let Some((path, message)) = first_failure {
                return Err(LangSniffError::SourceMalformed { path, message });
            }
        }
        Ok(self)
    }

    fn merge_table(&mut self, origin: &str, table: toml::Table) {
        for (language, value) in table {
            if language.is_empty() {
                warn!("Ignoring profile with empty identifier in {}", origin);
                continue;
            }
            if !value.is_table() {
                warn!(
                    "Ignoring profile '{}' in {}: expected a table, found {}",
                    language,
                    origin,
                    value.type_str()
                );
                continue;
            }

            let raw: RawProfile = match value.try_into() {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Ignoring malformed profile '{}' in {}: {}", language, origin, e);
                    continue;
                }
            };

            let profile = LanguageProfile::from_raw(&language, raw, self.backtrack_limit);
            if self.profiles.insert(language.clone(), profile).is_some() {
                debug!("Profile '{}' overridden by {}", language, origin);
            }
        }
    }
}

/// `*.toml` files directly inside `dir`, sorted by file name
fn profile_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    Ok(files)
}
