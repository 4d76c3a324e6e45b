use std::collections::BTreeSet;

use crate::analyzers::{Analyzer, AnalyzerMetadata, join_jar_names, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::report::{ReportSection, ReportTable};

const NONE: &str = "[none]";

/// Which JAR files each JAR file depends on, and which depend on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct JarDependenciesAnalyzer;

impl Analyzer for JarDependenciesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "jar-dependencies",
            title: "JAR Dependencies",
            description: "Dependencies between JAR files.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let jar_files = classpath.jar_files();
        let mut uses: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); jar_files.len()];
        let mut used_by: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); jar_files.len()];

        for (index, jar_file) in jar_files.iter().enumerate() {
            for class_def in jar_file.class_defs() {
                for reference in &class_def.referenced_classes {
                    let Some(targets) = classpath.class_entries(reference) else {
                        continue;
                    };
                    for target in targets.iter().map(|entry| entry.jar_index) {
                        if target != index {
                            uses[index].insert(target);
                            used_by[target].insert(index);
                        }
                    }
                }
            }
        }

        let names = |indices: &BTreeSet<usize>| {
            if indices.is_empty() {
                NONE.to_string()
            } else {
                join_jar_names(indices.iter().map(|index| jar_files[*index].file_name()))
            }
        };
        let mut table = ReportTable::new(["JAR file", "Uses", "Used by"]);
        for (index, jar_file) in jar_files.iter().enumerate() {
            table.add_row([
                jar_file.file_name().to_string(),
                names(&uses[index]),
                names(&used_by[index]),
            ])?;
        }
        Ok(section_with_table(&self.metadata(), table, "No JAR files found."))
    }
}
