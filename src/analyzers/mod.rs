use rayon::prelude::*;
use tracing::{error, info};

use crate::classpath::Classpath;
use crate::error::Result;
use crate::names::compare_ignore_case;
use crate::report::{LINE_SEPARATOR, Report, ReportSection, ReportTable};

pub mod class_versions;
pub mod duplicate_classes;
pub mod jar_dependencies;
pub mod jar_files;
pub mod missing_classes;
pub mod packages;
pub mod shadowed_classes;
pub mod split_packages;

pub use class_versions::ClassVersionsAnalyzer;
pub use duplicate_classes::DuplicateClassesAnalyzer;
pub use jar_dependencies::JarDependenciesAnalyzer;
pub use jar_files::JarFilesAnalyzer;
pub use missing_classes::MissingClassesAnalyzer;
pub use packages::PackagesAnalyzer;
pub use shadowed_classes::ShadowedClassesAnalyzer;
pub use split_packages::SplitPackagesAnalyzer;

/// Metadata describing an analyzer and the section it produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnalyzerMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A read-only pass over a classpath that produces one report section.
///
/// Implementations must not keep state between calls: the same classpath
/// always yields the same section, and analyzers may run concurrently.
pub trait Analyzer: Send + Sync {
    fn metadata(&self) -> AnalyzerMetadata;
    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection>;
}

/// Run every analyzer and assemble their sections in the given order.
///
/// A failing analyzer contributes a section holding the failure message;
/// the other sections are unaffected.
pub fn run_analyzers(analyzers: &[Box<dyn Analyzer>], classpath: &Classpath, title: &str) -> Report {
    let sections: Vec<ReportSection> = analyzers
        .par_iter()
        .map(|analyzer| run_analyzer(analyzer.as_ref(), classpath))
        .collect();

    let mut report = Report::new(title);
    for section in sections {
        report.add_section(section);
    }
    info!(
        sections = report.sections.len(),
        jars = classpath.jar_files().len(),
        "report assembled"
    );
    report
}

fn run_analyzer(analyzer: &dyn Analyzer, classpath: &Classpath) -> ReportSection {
    let metadata = analyzer.metadata();
    match analyzer.analyze(classpath) {
        Ok(section) => section,
        Err(err) => {
            error!(analyzer = metadata.id, error = %err, "analyzer failed");
            let mut section = new_section(&metadata);
            section.add_note(format!("Analysis failed: {err}"));
            section
        }
    }
}

pub(crate) fn new_section(metadata: &AnalyzerMetadata) -> ReportSection {
    ReportSection::new(metadata.title, metadata.description)
}

/// Section holding `table`. An empty table keeps its columns and is
/// followed by `empty_note`.
pub(crate) fn section_with_table(
    metadata: &AnalyzerMetadata,
    table: ReportTable,
    empty_note: &str,
) -> ReportSection {
    let mut section = new_section(metadata);
    let is_empty = table.is_empty();
    section.add_table(table);
    if is_empty {
        section.add_note(empty_note);
    }
    section
}

/// JAR file names for a single table cell, sorted ignoring case.
pub(crate) fn join_jar_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_by(|left, right| compare_ignore_case(left, right));
    names.join(LINE_SEPARATOR)
}
