use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::archive::ArchiveReader;
use crate::classfile::{ClassfileError, decode_class};
use crate::error::{Error, Result};
use crate::model::{ClassDef, JarFile};
use crate::names::compare_ignore_case;

const CLASS_SUFFIX: &str = ".class";
const MODULE_INFO: &str = "module-info.class";
const VERSIONS_PREFIX: &str = "META-INF/versions/";
const WAR_LIB_PREFIX: &str = "WEB-INF/lib/";
const WAR_CLASSES_PREFIX: &str = "WEB-INF/classes/";

/// What the loader does with a class entry that fails to decode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadPolicy {
    /// Abort loading the archive.
    #[default]
    FailFast,
    /// Log the entry and leave it out of the JAR file.
    Tolerant,
}

/// Loads one JAR archive into a [`JarFile`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JarFileLoader {
    policy: LoadPolicy,
}

impl JarFileLoader {
    pub fn new(policy: LoadPolicy) -> Self {
        Self { policy }
    }

    pub fn load(&self, path: &Path) -> Result<JarFile> {
        let reader = ArchiveReader::open(path)?;
        self.load_archive(file_name_of(path), reader)
    }

    /// Load a JAR already held in memory, e.g. one nested in a WAR.
    pub fn load_bytes(&self, file_name: &str, data: Vec<u8>) -> Result<JarFile> {
        let reader = ArchiveReader::from_bytes(file_name, data)?;
        self.load_archive(file_name.to_string(), reader)
    }

    fn load_archive<R: Read + Seek>(
        &self,
        file_name: String,
        mut reader: ArchiveReader<R>,
    ) -> Result<JarFile> {
        let file_size = reader.size();
        let mut pending = Vec::new();
        let mut release_versions = BTreeSet::new();

        let mut entries = reader.entries();
        while let Some(entry) = entries.next_entry() {
            let entry = entry?;
            if entry.is_dir() || !entry.name().ends_with(CLASS_SUFFIX) {
                continue;
            }
            if let Some(versioned) = entry.name().strip_prefix(VERSIONS_PREFIX) {
                if let Some(version) = release_version(versioned) {
                    release_versions.insert(version);
                }
                debug!(jar = %file_name, entry = entry.name(), "skipping versioned class entry");
                continue;
            }
            if is_module_info(entry.name()) {
                debug!(jar = %file_name, entry = entry.name(), "skipping module descriptor");
                continue;
            }
            let name = entry.name().to_string();
            pending.push((name, entry.read_bytes()?));
        }

        // Decoding is independent per entry; the ordered collect keeps
        // encounter order for the JarFile.
        let decoded: Vec<(String, std::result::Result<ClassDef, ClassfileError>)> = pending
            .into_par_iter()
            .map(|(name, data)| {
                let result = decode_class(&data);
                (name, result)
            })
            .collect();

        let mut class_defs = Vec::with_capacity(decoded.len());
        let mut seen = HashSet::with_capacity(decoded.len());
        let mut skipped = 0usize;
        for (entry, result) in decoded {
            let class_def = match result {
                Ok(class_def) => class_def,
                Err(source) => {
                    let entry = format!("{file_name}!/{entry}");
                    match self.policy {
                        LoadPolicy::FailFast => {
                            return Err(Error::ClassfileMalformed { entry, source });
                        }
                        LoadPolicy::Tolerant => {
                            warn!(%entry, error = %source, "skipping malformed class file");
                            skipped += 1;
                            continue;
                        }
                    }
                }
            };
            if !seen.insert(class_def.class_name.clone()) {
                warn!(
                    jar = %file_name,
                    %entry,
                    class = %class_def.display_name(),
                    "class defined twice in one archive, keeping the first"
                );
                continue;
            }
            class_defs.push(class_def);
        }

        info!(
            jar = %file_name,
            size = file_size,
            classes = class_defs.len(),
            skipped,
            multi_release = !release_versions.is_empty(),
            "loaded JAR file"
        );
        Ok(JarFile::new(file_name, file_size, class_defs)?.with_release_versions(release_versions))
    }
}

/// Loads the JAR files bundled in a WAR under `WEB-INF/lib/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WarFileLoader {
    jar_loader: JarFileLoader,
}

impl WarFileLoader {
    pub fn new(jar_loader: JarFileLoader) -> Self {
        Self { jar_loader }
    }

    /// JAR files in the WAR, sorted by file name ignoring case. A WAR
    /// without libraries yields an empty list.
    pub fn load(&self, path: &Path) -> Result<Vec<JarFile>> {
        let reader = ArchiveReader::open(path)?;
        self.load_archive(reader)
    }

    pub fn load_bytes(&self, label: &str, data: Vec<u8>) -> Result<Vec<JarFile>> {
        let reader = ArchiveReader::from_bytes(label, data)?;
        self.load_archive(reader)
    }

    fn load_archive<R: Read + Seek>(&self, mut reader: ArchiveReader<R>) -> Result<Vec<JarFile>> {
        let label = reader.label().to_string();
        let mut jar_files = Vec::new();
        let mut ignored_classes = 0usize;

        let mut entries = reader.entries();
        while let Some(entry) = entries.next_entry() {
            let entry = entry?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name();
            if name.starts_with(WAR_CLASSES_PREFIX) && name.ends_with(CLASS_SUFFIX) {
                ignored_classes += 1;
                continue;
            }
            if !(name.starts_with(WAR_LIB_PREFIX) && name.ends_with(".jar")) {
                continue;
            }
            let file_name = name.rsplit('/').next().unwrap_or(name).to_string();
            debug!(war = %label, entry = name, "loading nested JAR file");
            let data = entry.read_bytes()?;
            jar_files.push(self.jar_loader.load_bytes(&file_name, data)?);
        }

        if ignored_classes > 0 {
            debug!(
                war = %label,
                classes = ignored_classes,
                "classes under WEB-INF/classes are not analyzed"
            );
        }
        jar_files.sort_by(|left, right| compare_ignore_case(left.file_name(), right.file_name()));
        info!(war = %label, jars = jar_files.len(), "loaded WAR file");
        Ok(jar_files)
    }
}

/// Load every input in order. Files must be `.jar` or `.war`; directories
/// are searched recursively for both, in path order.
pub fn load_inputs(inputs: &[PathBuf], policy: LoadPolicy) -> Result<Vec<JarFile>> {
    if inputs.is_empty() {
        return Err(Error::ArgumentInvalid("no input archives given".to_string()));
    }
    let jar_loader = JarFileLoader::new(policy);
    let war_loader = WarFileLoader::new(jar_loader);

    let mut jar_files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for path in find_archives(input)? {
                load_path(&path, &jar_loader, &war_loader, &mut jar_files)?;
            }
        } else if input.is_file() {
            if archive_kind(input).is_none() {
                return Err(Error::ArgumentInvalid(format!(
                    "unsupported input file: {}",
                    input.display()
                )));
            }
            load_path(input, &jar_loader, &war_loader, &mut jar_files)?;
        } else {
            return Err(Error::FileNotFound(input.clone()));
        }
    }
    Ok(jar_files)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ArchiveKind {
    Jar,
    War,
}

fn archive_kind(path: &Path) -> Option<ArchiveKind> {
    let extension = path.extension()?.to_str()?;
    if extension.eq_ignore_ascii_case("jar") {
        Some(ArchiveKind::Jar)
    } else if extension.eq_ignore_ascii_case("war") {
        Some(ArchiveKind::War)
    } else {
        None
    }
}

fn load_path(
    path: &Path,
    jar_loader: &JarFileLoader,
    war_loader: &WarFileLoader,
    jar_files: &mut Vec<JarFile>,
) -> Result<()> {
    match archive_kind(path) {
        Some(ArchiveKind::Jar) => jar_files.push(jar_loader.load(path)?),
        Some(ArchiveKind::War) => jar_files.extend(war_loader.load(path)?),
        None => {}
    }
    Ok(())
}

fn find_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    collect_archives(dir, &mut archives)?;
    archives.sort();
    Ok(archives)
}

fn collect_archives(dir: &Path, archives: &mut Vec<PathBuf>) -> Result<()> {
    let read_error = |err: std::io::Error| {
        Error::ArgumentInvalid(format!("cannot read directory {}: {err}", dir.display()))
    };
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_dir() {
            collect_archives(&path, archives)?;
        } else if archive_kind(&path).is_some() {
            archives.push(path);
        }
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `N` of a `META-INF/versions/N/...` entry, given the part after the prefix.
fn release_version(versioned: &str) -> Option<u32> {
    versioned.split('/').next()?.parse().ok()
}

fn is_module_info(name: &str) -> bool {
    name == MODULE_INFO || name.ends_with(&format!("/{MODULE_INFO}"))
}
