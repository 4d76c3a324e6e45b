//! # jarhealth
//!
//! Static consistency checks for the JAR files of a Java application,
//! treated together as one classpath.
//!
//! ## Architecture
//!
//! - **archive**: ZIP entry iteration over a file or an in-memory buffer
//! - **constant_pool** / **classfile**: class-file decoding into [`ClassDef`]
//! - **loader**: JAR and WAR loading, input discovery
//! - **model** / **access** / **names** / **descriptor**: the classpath model
//! - **classpath**: [`Classpath`] with its file-name and class-name indices
//! - **provided**: classes supplied by the runtime
//! - **analyzers**: the [`Analyzer`] passes producing report sections
//! - **report**: the passive [`Report`] model
//! - **config**: section selection

pub mod access;
pub mod analyzers;
pub mod archive;
pub mod classfile;
pub mod classpath;
pub mod config;
mod constant_pool;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod model;
pub mod names;
pub mod provided;
pub mod report;

#[cfg(test)]
mod test_harness;

pub use analyzers::{Analyzer, AnalyzerMetadata, run_analyzers};
pub use classpath::{ClassEntry, Classpath};
pub use config::{AnalysisConfig, SectionId};
pub use error::{Error, Result};
pub use loader::{JarFileLoader, LoadPolicy, WarFileLoader, load_inputs};
pub use model::{ClassDef, ClassVersion, FieldDef, JarFile, MethodDef};
pub use provided::ProvidedClasses;
pub use report::{Report, ReportContent, ReportSection, ReportTable};
