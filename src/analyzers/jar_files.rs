use crate::analyzers::{Analyzer, AnalyzerMetadata, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::report::{ReportSection, ReportTable, format_file_size};

/// Lists the JAR files with their size and class count, plus a total.
#[derive(Clone, Copy, Debug, Default)]
pub struct JarFilesAnalyzer;

impl Analyzer for JarFilesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "jar-files",
            title: "JAR Files",
            description: "List of JAR files found in classpath.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut table = ReportTable::new(["JAR file", "Size", "Java class files"]);
        let mut total_size = 0u64;
        let mut total_classes = 0usize;

        for jar_file in classpath.jar_files() {
            let classes = jar_file.class_defs().len();
            table.add_row([
                jar_file.file_name().to_string(),
                format_file_size(jar_file.file_size()),
                classes.to_string(),
            ])?;
            total_size += jar_file.file_size();
            total_classes += classes;
        }

        if !table.is_empty() {
            table.add_row([
                "Classpath".to_string(),
                format_file_size(total_size),
                total_classes.to_string(),
            ])?;
        }
        Ok(section_with_table(&self.metadata(), table, "No JAR files found."))
    }
}
