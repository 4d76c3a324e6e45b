use std::collections::BTreeMap;

use crate::analyzers::{Analyzer, AnalyzerMetadata, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::model::ClassVersion;
use crate::report::{LINE_SEPARATOR, ReportSection, ReportTable};

const SAMPLE_SIZE: usize = 3;

/// Groups class files by class-file version, oldest first.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassVersionsAnalyzer;

impl Analyzer for ClassVersionsAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "class-versions",
            title: "Class Versions",
            description: "Java class file format versions found in classpath, counting every class definition.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut by_version: BTreeMap<ClassVersion, Vec<String>> = BTreeMap::new();
        for entry in classpath.all_class_entries() {
            by_version
                .entry(entry.class_def.version())
                .or_default()
                .push(entry.class_def.display_name());
        }

        let mut table = ReportTable::new(["Version", "Classes", "Example classes"]);
        for (version, mut class_names) in by_version {
            // Count definitions; the samples name each class once.
            let count = class_names.len();
            class_names.sort_unstable();
            class_names.dedup();
            class_names.truncate(SAMPLE_SIZE);
            table.add_row([
                version.to_string(),
                count.to_string(),
                class_names.join(LINE_SEPARATOR),
            ])?;
        }
        Ok(section_with_table(&self.metadata(), table, "No classes found."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassDef;
    use crate::test_harness::{ClasspathBuilder, class_def};

    fn versioned(class_name: &str, major: u16) -> ClassDef {
        let mut class_def = class_def(class_name);
        class_def.major_version = major;
        class_def
    }

    #[test]
    fn versions_ascend_with_counts_and_samples() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("new.jar")
            .add_class(versioned("n/D", 61))
            .add_class(versioned("n/C", 52))
            .add_jar_file("old.jar")
            .add_class(versioned("o/E", 52))
            .add_class(versioned("o/B", 52))
            .add_class(versioned("o/A", 52))
            .add_class(versioned("o/Legacy", 49))
            .build();

        let section = ClassVersionsAnalyzer.analyze(&classpath).expect("analyze");

        let table = section.tables().next().expect("table");
        assert_eq!(
            table.rows(),
            [
                vec!["Java 5 (49.0)", "1", "o.Legacy"],
                vec!["Java 8 (52.0)", "4", "n.C\no.A\no.B"],
                vec!["Java 17 (61.0)", "1", "n.D"],
            ]
        );
    }

    #[test]
    fn duplicated_classes_count_once_per_definition() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("a.jar")
            .add_class_def("com/x/Z")
            .add_jar_file("b.jar")
            .add_class_def("com/x/Z")
            .build();

        let section = ClassVersionsAnalyzer.analyze(&classpath).expect("analyze");

        let table = section.tables().next().expect("table");
        assert_eq!(table.rows(), [vec!["Java 8 (52.0)", "2", "com.x.Z"]]);
    }
}
