use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::JarFile;
use crate::names::to_slash_form;

/// Classes supplied by the runtime rather than by the classpath, such as
/// the JDK's own classes.
#[derive(Clone, Debug, Default)]
pub struct ProvidedClasses {
    prefixes: Vec<String>,
    class_names: HashSet<String>,
}

impl ProvidedClasses {
    /// Nothing is provided.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every class in a `java/` package is provided.
    pub fn java_platform() -> Self {
        Self::none().with_prefix("java/")
    }

    /// Treat every class whose slash-form name starts with `prefix` as provided.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Add class names in slash or dot form.
    pub fn with_class_names<I, S>(mut self, class_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.class_names
            .extend(class_names.into_iter().map(|name| to_slash_form(name.as_ref())));
        self
    }

    /// Add every class defined by the given archives.
    pub fn with_jar_files(self, jar_files: &[JarFile]) -> Self {
        self.with_class_names(
            jar_files
                .iter()
                .flat_map(|jar_file| jar_file.class_defs())
                .map(|class_def| class_def.class_name.as_str()),
        )
    }

    /// Add the class names listed in a text file: one per line, blank lines
    /// and `#` comments ignored.
    pub fn with_list_file(self, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|err| {
            Error::ArgumentInvalid(format!("cannot read class list {}: {err}", path.display()))
        })?;
        Ok(self.with_class_list(&content))
    }

    pub fn with_class_list(self, content: &str) -> Self {
        self.with_class_names(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.class_names.contains(class_name)
            || self
                .prefixes
                .iter()
                .any(|prefix| class_name.starts_with(prefix.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.class_names.is_empty()
    }
}
