//! Section selection and analyzer construction.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::analyzers::{
    Analyzer, ClassVersionsAnalyzer, DuplicateClassesAnalyzer, JarDependenciesAnalyzer,
    JarFilesAnalyzer, MissingClassesAnalyzer, PackagesAnalyzer, ShadowedClassesAnalyzer,
    SplitPackagesAnalyzer,
};
use crate::error::{Error, Result};
use crate::provided::ProvidedClasses;

/// One report section, named by the id of the analyzer producing it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SectionId {
    JarFiles,
    ClassVersions,
    Packages,
    SplitPackages,
    DuplicateClasses,
    ShadowedClasses,
    MissingClasses,
    JarDependencies,
}

/// Sections of a default report, in report order.
pub const DEFAULT_SECTIONS: [SectionId; 8] = [
    SectionId::JarFiles,
    SectionId::ClassVersions,
    SectionId::Packages,
    SectionId::SplitPackages,
    SectionId::DuplicateClasses,
    SectionId::ShadowedClasses,
    SectionId::MissingClasses,
    SectionId::JarDependencies,
];

impl SectionId {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::JarFiles => "jar-files",
            SectionId::ClassVersions => "class-versions",
            SectionId::Packages => "packages",
            SectionId::SplitPackages => "split-packages",
            SectionId::DuplicateClasses => "duplicate-classes",
            SectionId::ShadowedClasses => "shadowed-classes",
            SectionId::MissingClasses => "missing-classes",
            SectionId::JarDependencies => "jar-dependencies",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        DEFAULT_SECTIONS
            .into_iter()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| {
                let known: Vec<&str> = DEFAULT_SECTIONS.iter().map(|s| s.as_str()).collect();
                Error::ArgumentInvalid(format!(
                    "unknown section '{value}', expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// What a report contains and what the runtime provides.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub sections: Vec<SectionId>,
    pub provided: ProvidedClasses,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sections: DEFAULT_SECTIONS.to_vec(),
            provided: ProvidedClasses::java_platform(),
        }
    }
}

impl AnalysisConfig {
    /// One analyzer per configured section, in section order.
    pub fn build_analyzers(&self) -> Vec<Box<dyn Analyzer>> {
        self.sections
            .iter()
            .map(|section| -> Box<dyn Analyzer> {
                match section {
                    SectionId::JarFiles => Box::new(JarFilesAnalyzer),
                    SectionId::ClassVersions => Box::new(ClassVersionsAnalyzer),
                    SectionId::Packages => Box::new(PackagesAnalyzer),
                    SectionId::SplitPackages => Box::new(SplitPackagesAnalyzer),
                    SectionId::DuplicateClasses => Box::new(DuplicateClassesAnalyzer),
                    SectionId::ShadowedClasses => {
                        Box::new(ShadowedClassesAnalyzer::new(self.provided.clone()))
                    }
                    SectionId::MissingClasses => {
                        Box::new(MissingClassesAnalyzer::new(self.provided.clone()))
                    }
                    SectionId::JarDependencies => Box::new(JarDependenciesAnalyzer),
                }
            })
            .collect()
    }
}

/// Parse section selections. Each value is a comma-separated list of ids or
/// `@FILE` naming a file with ids separated by commas or newlines (`#`
/// starts a comment). No values selects [`DEFAULT_SECTIONS`].
pub fn parse_sections(values: &[String]) -> Result<Vec<SectionId>> {
    if values.is_empty() {
        return Ok(DEFAULT_SECTIONS.to_vec());
    }
    let mut sections = Vec::new();
    for value in values {
        match value.strip_prefix('@') {
            Some(path) => {
                let content = read_section_file(Path::new(path))?;
                for line in content.lines() {
                    let line = line.split('#').next().unwrap_or_default();
                    push_sections(line, &mut sections)?;
                }
            }
            None => push_sections(value, &mut sections)?,
        }
    }
    if sections.is_empty() {
        return Err(Error::ArgumentInvalid("no sections selected".to_string()));
    }
    Ok(sections)
}

fn read_section_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|err| {
        Error::ArgumentInvalid(format!("cannot read section file {}: {err}", path.display()))
    })
}

fn push_sections(list: &str, sections: &mut Vec<SectionId>) -> Result<()> {
    for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        let section: SectionId = id.parse()?;
        if sections.contains(&section) {
            return Err(Error::ArgumentInvalid(format!(
                "section '{section}' selected twice"
            )));
        }
        sections.push(section);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_ids_round_trip() {
        for section in DEFAULT_SECTIONS {
            assert_eq!(section.to_string().parse::<SectionId>().expect("parse"), section);
        }
        assert!(matches!(
            "bogus".parse::<SectionId>(),
            Err(Error::ArgumentInvalid(message)) if message.contains("split-packages")
        ));
    }

    #[test]
    fn default_config_builds_every_analyzer_in_order() {
        let analyzers = AnalysisConfig::default().build_analyzers();

        let ids: Vec<&str> = analyzers.iter().map(|a| a.metadata().id).collect();
        let expected: Vec<&str> = DEFAULT_SECTIONS.iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn sections_parse_from_lists() {
        let sections = parse_sections(&[
            "split-packages, duplicate-classes".to_string(),
            "jar-files".to_string(),
        ])
        .expect("parse sections");

        assert_eq!(
            sections,
            vec![
                SectionId::SplitPackages,
                SectionId::DuplicateClasses,
                SectionId::JarFiles
            ]
        );
        assert_eq!(parse_sections(&[]).expect("defaults"), DEFAULT_SECTIONS.to_vec());
        assert!(parse_sections(&["packages,packages".to_string()]).is_err());
        assert!(parse_sections(&[" , ".to_string()]).is_err());
    }

    #[test]
    fn sections_parse_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sections.txt");
        fs::write(&path, "# issues only\nsplit-packages\nmissing-classes, shadowed-classes\n")
            .expect("write sections");

        let sections =
            parse_sections(&[format!("@{}", path.display())]).expect("parse section file");

        assert_eq!(
            sections,
            vec![
                SectionId::SplitPackages,
                SectionId::MissingClasses,
                SectionId::ShadowedClasses
            ]
        );
        assert!(matches!(
            parse_sections(&[format!("@{}", dir.path().join("none.txt").display())]),
            Err(Error::FileNotFound(_))
        ));
    }
}
