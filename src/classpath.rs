use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::model::{ClassDef, JarFile};

#[derive(Clone, Copy, Debug)]
struct ClassLocation {
    jar: usize,
    class: usize,
}

/// A class definition together with the archive that provides it.
#[derive(Clone, Copy, Debug)]
pub struct ClassEntry<'a> {
    /// Position of `jar_file` in [`Classpath::jar_files`].
    pub jar_index: usize,
    pub jar_file: &'a JarFile,
    pub class_def: &'a ClassDef,
}

/// The JAR files of an application, treated as one search space.
///
/// Both lookup indices are built once in [`Classpath::new`]:
/// file name to JAR file, and class name to every definition of that class
/// (a class may be defined by several archives).
#[derive(Clone, Debug)]
pub struct Classpath {
    jar_files: Vec<JarFile>,
    jar_files_by_name: HashMap<String, usize>,
    class_defs_by_name: HashMap<String, Vec<ClassLocation>>,
}

impl Classpath {
    /// Build a classpath, keeping the given JAR order. If two JAR files
    /// share a file name, the file-name index resolves to the later one;
    /// both still contribute classes.
    pub fn new(jar_files: Vec<JarFile>) -> Self {
        let mut jar_files_by_name = HashMap::with_capacity(jar_files.len());
        let mut class_defs_by_name: HashMap<String, Vec<ClassLocation>> = HashMap::new();

        for (jar, jar_file) in jar_files.iter().enumerate() {
            if jar_files_by_name
                .insert(jar_file.file_name().to_string(), jar)
                .is_some()
            {
                warn!(
                    file_name = jar_file.file_name(),
                    "duplicate JAR file name on classpath, later entry wins the name lookup"
                );
            }

            for (class, class_def) in jar_file.class_defs().iter().enumerate() {
                class_defs_by_name
                    .entry(class_def.class_name.clone())
                    .or_default()
                    .push(ClassLocation { jar, class });
            }
        }

        Self {
            jar_files,
            jar_files_by_name,
            class_defs_by_name,
        }
    }

    pub fn jar_files(&self) -> &[JarFile] {
        &self.jar_files
    }

    pub fn is_empty(&self) -> bool {
        self.jar_files.is_empty()
    }

    /// JAR file with the given file name, if any.
    pub fn jar_file(&self, file_name: &str) -> Option<&JarFile> {
        self.jar_files_by_name
            .get(file_name)
            .map(|index| &self.jar_files[*index])
    }

    /// Every definition of `class_name` (slash form), in classpath order.
    /// `None` if no archive defines the class.
    pub fn class_defs(&self, class_name: &str) -> Option<Vec<&ClassDef>> {
        self.class_entries(class_name)
            .map(|entries| entries.into_iter().map(|entry| entry.class_def).collect())
    }

    /// Like [`Classpath::class_defs`], paired with the providing archives.
    pub fn class_entries(&self, class_name: &str) -> Option<Vec<ClassEntry<'_>>> {
        let locations = self.class_defs_by_name.get(class_name)?;
        Some(
            locations
                .iter()
                .map(|location| self.entry_at(*location))
                .collect(),
        )
    }

    pub fn contains_class(&self, class_name: &str) -> bool {
        self.class_defs_by_name.contains_key(class_name)
    }

    /// Distinct class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.class_defs_by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All class definitions, JAR by JAR, in declaration order.
    pub fn all_class_entries(&self) -> impl Iterator<Item = ClassEntry<'_>> {
        self.jar_files
            .iter()
            .enumerate()
            .flat_map(|(jar_index, jar_file)| {
                jar_file.class_defs().iter().map(move |class_def| ClassEntry {
                    jar_index,
                    jar_file,
                    class_def,
                })
            })
    }

    fn entry_at(&self, location: ClassLocation) -> ClassEntry<'_> {
        let jar_file = &self.jar_files[location.jar];
        ClassEntry {
            jar_index: location.jar,
            jar_file,
            class_def: &jar_file.class_defs()[location.class],
        }
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Classpath[{}]", self.jar_files.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::test_harness::ClasspathBuilder;

    fn sample() -> Classpath {
        ClasspathBuilder::create()
            .add_jar_file("a.jar")
            .add_class_def("a/b/X")
            .add_class_def("com/x/Z")
            .add_jar_file("b.jar")
            .add_class_def("a/b/Y")
            .add_class_def("com/x/Z")
            .build()
    }

    #[test]
    fn every_class_is_indexed() {
        let classpath = sample();

        for jar_file in classpath.jar_files() {
            for class_def in jar_file.class_defs() {
                let defs = classpath
                    .class_defs(&class_def.class_name)
                    .expect("indexed class");
                assert!(defs.iter().any(|def| std::ptr::eq(*def, class_def)));
            }
        }
        for name in classpath.class_names() {
            let defs = classpath.class_defs(name).expect("indexed class");
            assert!(!defs.is_empty());
            assert!(defs.iter().all(|def| def.class_name == name));
        }
    }

    #[test]
    fn multi_valued_lookup_keeps_classpath_order() {
        let classpath = sample();

        let entries = classpath.class_entries("com/x/Z").expect("duplicate class");
        let jars: Vec<&str> = entries.iter().map(|entry| entry.jar_file.file_name()).collect();
        assert_eq!(jars, vec!["a.jar", "b.jar"]);
        let indices: Vec<usize> = entries.iter().map(|entry| entry.jar_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(classpath.class_defs("com/x/Missing").is_none());
        assert!(classpath.contains_class("a/b/Y"));
        assert!(!classpath.contains_class("a.b.Y"));
        assert_eq!(classpath.class_names(), vec!["a/b/X", "a/b/Y", "com/x/Z"]);
    }

    #[test]
    fn file_name_index_is_last_wins() {
        let classpath = ClasspathBuilder::create()
            .add_jar_file("a.jar")
            .add_class_def("first/A")
            .add_jar_file("b.jar")
            .add_jar_file("a.jar")
            .add_class_def("second/A")
            .build();

        assert_eq!(classpath.jar_files().len(), 3);
        let jar_file = classpath.jar_file("a.jar").expect("a.jar");
        assert!(jar_file.class_def("second/A").is_some());
        assert!(classpath.jar_file("c.jar").is_none());
        // Both copies still contribute classes.
        assert!(classpath.contains_class("first/A"));

        let names: HashSet<&str> = classpath
            .jar_files()
            .iter()
            .map(JarFile::file_name)
            .collect();
        assert_eq!(names, HashSet::from(["a.jar", "b.jar"]));
        assert!(names.iter().all(|name| classpath.jar_file(name).is_some()));
    }

    #[test]
    fn entries_point_back_at_their_jar_file() {
        let classpath = sample();

        for entry in classpath.all_class_entries() {
            assert!(std::ptr::eq(
                &classpath.jar_files()[entry.jar_index],
                entry.jar_file
            ));
        }
    }

    #[test]
    fn empty_classpath() {
        let classpath = Classpath::new(Vec::new());
        assert!(classpath.is_empty());
        assert!(classpath.class_names().is_empty());
        assert_eq!(classpath.all_class_entries().count(), 0);
        assert_eq!(classpath.to_string(), "Classpath[0]");
    }
}
