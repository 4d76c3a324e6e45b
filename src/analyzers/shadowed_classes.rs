use crate::analyzers::{Analyzer, AnalyzerMetadata, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::names::compare_ignore_case;
use crate::provided::ProvidedClasses;
use crate::report::{NO_ISSUES_FOUND, ReportSection, ReportTable};

/// Classes on the classpath that the runtime already provides; the
/// runtime copy usually wins, hiding the bundled one.
#[derive(Clone, Debug, Default)]
pub struct ShadowedClassesAnalyzer {
    provided: ProvidedClasses,
}

impl ShadowedClassesAnalyzer {
    pub fn new(provided: ProvidedClasses) -> Self {
        Self { provided }
    }
}

impl Analyzer for ShadowedClassesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "shadowed-classes",
            title: "Shadowed Classes",
            description: "Classes also provided by the runtime environment.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut rows: Vec<(String, &str)> = classpath
            .all_class_entries()
            .filter(|entry| self.provided.contains(&entry.class_def.class_name))
            .map(|entry| (entry.class_def.display_name(), entry.jar_file.file_name()))
            .collect();
        rows.sort_by(|left, right| {
            left.0
                .cmp(&right.0)
                .then_with(|| compare_ignore_case(left.1, right.1))
        });

        let mut table = ReportTable::new(["Class name", "JAR file"]);
        for (class_name, jar_name) in rows {
            table.add_row([class_name, jar_name.to_string()])?;
        }
        Ok(section_with_table(&self.metadata(), table, NO_ISSUES_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportContent;
    use crate::test_harness::ClasspathBuilder;

    #[test]
    fn bundled_platform_classes_are_shadowed() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("rt-copy.jar")
            .add_class_def("java/lang/String")
            .add_class_def("javax/servlet/Servlet")
            .add_jar_file("app.jar")
            .add_class_def("com/example/App")
            .add_class_def("java/lang/Object")
            .build();
        let provided =
            ProvidedClasses::java_platform().with_class_names(["javax.servlet.Servlet"]);

        let section = ShadowedClassesAnalyzer::new(provided)
            .analyze(&classpath)
            .expect("analyze");

        let table = section.tables().next().expect("table");
        assert_eq!(table.columns(), ["Class name", "JAR file"]);
        assert_eq!(
            table.rows(),
            [
                vec!["java.lang.Object", "app.jar"],
                vec!["java.lang.String", "rt-copy.jar"],
                vec!["javax.servlet.Servlet", "rt-copy.jar"],
            ]
        );
    }

    #[test]
    fn nothing_provided_means_nothing_shadowed() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("rt-copy.jar")
            .add_class_def("java/lang/String")
            .build();

        let section = ShadowedClassesAnalyzer::new(ProvidedClasses::none())
            .analyze(&classpath)
            .expect("analyze");

        let table = section.tables().next().expect("table");
        assert!(table.is_empty());
        assert_eq!(
            section.content.last(),
            Some(&ReportContent::Note(NO_ISSUES_FOUND.to_string()))
        );
    }
}
