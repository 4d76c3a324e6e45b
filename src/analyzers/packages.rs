use std::collections::{BTreeMap, BTreeSet};

use crate::analyzers::{Analyzer, AnalyzerMetadata, join_jar_names, section_with_table};
use crate::classpath::Classpath;
use crate::error::Result;
use crate::names::to_dot_form;
use crate::report::{ReportSection, ReportTable};

/// Classes and contributing JAR files of one package.
#[derive(Debug, Default)]
pub(crate) struct PackageUsage {
    pub(crate) class_count: usize,
    /// Indices into [`Classpath::jar_files`].
    pub(crate) jar_files: BTreeSet<usize>,
}

impl PackageUsage {
    pub(crate) fn jar_names(&self, classpath: &Classpath) -> String {
        join_jar_names(
            self.jar_files
                .iter()
                .map(|index| classpath.jar_files()[*index].file_name()),
        )
    }
}

/// Every package on the classpath keyed by dot-form name.
pub(crate) fn package_usage(classpath: &Classpath) -> BTreeMap<String, PackageUsage> {
    let mut packages: BTreeMap<String, PackageUsage> = BTreeMap::new();
    for (index, jar_file) in classpath.jar_files().iter().enumerate() {
        for class_def in jar_file.class_defs() {
            let usage = packages
                .entry(to_dot_form(class_def.package_name()))
                .or_default();
            usage.class_count += 1;
            usage.jar_files.insert(index);
        }
    }
    packages
}

/// Lists every package with its class count and JAR files.
#[derive(Clone, Copy, Debug, Default)]
pub struct PackagesAnalyzer;

impl Analyzer for PackagesAnalyzer {
    fn metadata(&self) -> AnalyzerMetadata {
        AnalyzerMetadata {
            id: "packages",
            title: "Packages",
            description: "List of packages found in classpath.",
        }
    }

    fn analyze(&self, classpath: &Classpath) -> Result<ReportSection> {
        let mut table = ReportTable::new(["Package", "Classes", "JAR files"]);
        for (package, usage) in package_usage(classpath) {
            table.add_row([
                package,
                usage.class_count.to_string(),
                usage.jar_names(classpath),
            ])?;
        }
        Ok(section_with_table(&self.metadata(), table, "No packages found."))
    }
}
