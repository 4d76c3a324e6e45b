use crate::analyzers::{Analyzer, AnalyzerMetadata, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::names::{compare_ignore_case, to_dot_form};
use crate::provided::ProvidedClasses;
use crate::report::{NO_ISSUES_FOUND, ReportSection, ReportTable};

/// References to classes that neither the classpath nor the runtime
/// provides.
#[derive(Clone, Debug, Default)]
pub struct MissingClassesAnalyzer {
    provided: ProvidedClasses,
}

impl MissingClassesAnalyzer {
    pub fn new(provided: ProvidedClasses) -> Self {
        Self { provided }
    }
}

impl Analyzer for MissingClassesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "missing-classes",
            title: "Missing Classes",
            description: "Classes referenced but not found in classpath.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut rows: Vec<(String, String, &str)> = Vec::new();
        for entry in classpath.all_class_entries() {
            for reference in &entry.class_def.referenced_classes {
                if classpath.contains_class(reference) || self.provided.contains(reference) {
                    continue;
                }
                rows.push((
                    entry.class_def.display_name(),
                    to_dot_form(reference),
                    entry.jar_file.file_name(),
                ));
            }
        }
        rows.sort_by(|left, right| {
            left.0
                .cmp(&right.0)
                .then_with(|| left.1.cmp(&right.1))
                .then_with(|| compare_ignore_case(left.2, right.2))
        });

        let mut table = ReportTable::new(["Class", "Missing class", "JAR file"]);
        for (class_name, missing, jar_name) in rows {
            table.add_row([class_name, missing, jar_name.to_string()])?;
        }
        Ok(section_with_table(&self.metadata(), table, NO_ISSUES_FOUND))
    }
}
