use crate::analyzers::packages::package_usage;
use crate::analyzers::{Analyzer, AnalyzerMetadata, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::report::{NO_ISSUES_FOUND, ReportSection, ReportTable};

/// Packages whose classes come from two or more JAR files.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitPackagesAnalyzer;

impl Analyzer for SplitPackagesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "split-packages",
            title: "Split Packages",
            description: "Packages found in multiple JAR files.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut table = ReportTable::new(["Package", "JAR files"]);
        for (package, usage) in package_usage(classpath) {
            if usage.jar_files.len() >= 2 {
                table.add_row([package, usage.jar_names(classpath)])?;
            }
        }
        Ok(section_with_table(&self.metadata(), table, NO_ISSUES_FOUND))
    }
}
