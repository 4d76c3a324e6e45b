use crate::analyzers::{Analyzer, AnalyzerMetadata, join_jar_names, section_with_table};
use crate::classpath::{ClassEntry, Classpath};
use crate::error::Result;
use crate::names::to_dot_form;
use crate::report::{NO_ISSUES_FOUND, ReportSection, ReportTable};

/// Classes defined by two or more JAR files, with how far the copies agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct DuplicateClassesAnalyzer;

impl Analyzer for DuplicateClassesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "duplicate-classes",
            title: "Duplicate Classes",
            description: "Classes found in multiple JAR files.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut rows = Vec::new();
        for class_name in classpath.class_names() {
            let Some(entries) = classpath.class_entries(class_name) else {
                continue;
            };
            if entries.len() < 2 {
                continue;
            }
            rows.push([
                to_dot_form(class_name),
                join_jar_names(entries.iter().map(|entry| entry.jar_file.file_name())),
                similarity(&entries).to_string(),
            ]);
        }
        rows.sort();

        let mut table = ReportTable::new(["Class name", "JAR files", "Similarity"]);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(section_with_table(&self.metadata(), table, NO_ISSUES_FOUND))
    }
}

fn similarity(entries: &[ClassEntry<'_>]) -> &'static str {
    let Some((first, rest)) = entries.split_first() else {
        return "Exact copy";
    };
    if rest.iter().all(|entry| entry.class_def == first.class_def) {
        "Exact copy"
    } else if rest
        .iter()
        .all(|entry| entry.class_def.has_same_api(first.class_def))
    {
        "Same API"
    } else {
        "Different API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessFlags;
    use crate::model::MethodDef;
    use crate::report::ReportContent;
    use crate::test_harness::{ClasspathBuilder, class_def};

    #[test]
    fn class_in_two_jars_is_a_duplicate() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("a.jar")
            .add_class_def("com/x/Z")
            .add_jar_file("b.jar")
            .add_class_def("com/x/Z")
            .add_class_def("com/x/Unique")
            .build();

        let section = DuplicateClassesAnalyzer.analyze(&classpath).expect("analyze");

        let table = section.tables().next().expect("table");
        assert_eq!(table.rows(), [vec!["com.x.Z", "a.jar\nb.jar", "Exact copy"]]);
    }

    #[test]
    fn similarity_distinguishes_api_changes() {
        let mut recompiled = class_def("com/x/Recompiled");
        recompiled.major_version = 61;
        let mut changed = class_def("com/x/Changed");
        changed
            .methods
            .push(MethodDef::new(AccessFlags::default(), "added", "()V"));

        let classpath = ClasspathBuilder::create()
            .add_jar_file("old.jar")
            .add_class_def("com/x/Recompiled")
            .add_class_def("com/x/Changed")
            .add_jar_file("new.jar")
            .add_class(recompiled)
            .add_class(changed)
            .build();

        let section = DuplicateClassesAnalyzer.analyze(&classpath).expect("analyze");

        let table = section.tables().next().expect("table");
        assert_eq!(
            table.rows(),
            [
                vec!["com.x.Changed", "new.jar\nold.jar", "Different API"],
                vec!["com.x.Recompiled", "new.jar\nold.jar", "Same API"],
            ]
        );
    }

    #[test]
    fn no_duplicates_reports_no_issues() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("a.jar")
            .add_class_def("com/x/Z")
            .build();

        let section = DuplicateClassesAnalyzer.analyze(&classpath).expect("analyze");

        let table = section.tables().next().expect("table");
        assert!(table.is_empty());
        assert_eq!(
            section.content.last(),
            Some(&ReportContent::Note(NO_ISSUES_FOUND.to_string()))
        );
    }
}
