//! Writing a module's results back out as a replayable script.
//!
//! The output keeps the original globals and functions verbatim and appends
//! one `[frozen]` function per cached result that has a literal form, in call
//! order. Loading the output seeds those results into the cache again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, info};
use wirescript_parser::is_identifier;
use wirescript_registry::FROZEN_ATTRIBUTE;

use crate::{Error, Module, NonSerializable, Result, SerializableShapes, Value};

/// A cached result rendered as a literal.
struct Frozen<'a> {
    name: &'a str,
    literal: String,
}

impl Module {
    /// Write the frozen configuration to `target_dir/<file name of original>`.
    ///
    /// `target_dir` is created when missing. Cached values without a literal
    /// form (opaque objects, non-finite floats, shapes outside
    /// [`EngineConfig::serializable`](crate::EngineConfig::serializable)) are
    /// skipped and their original definitions kept.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn serialize(&self, target_dir: impl AsRef<Path>, original: impl AsRef<Path>) -> Result<PathBuf> {
        let target_dir = target_dir.as_ref();
        let original = original.as_ref();

        let file_name = original.file_name().ok_or_else(|| {
            Error::io(
                original,
                io::Error::new(io::ErrorKind::InvalidInput, "script path has no file name"),
            )
        })?;

        fs::create_dir_all(target_dir).map_err(|e| Error::io(target_dir, e))?;
        let output = target_dir.join(file_name);
        if same_file(&output, original) {
            return Err(Error::WouldOverwriteSource(output));
        }

        let frozen = self.frozen_entries();
        let content = self.render(&frozen, &file_name.to_string_lossy());
        fs::write(&output, content).map_err(|e| Error::io(&output, e))?;

        info!(
            path = %output.display(),
            frozen = frozen.len(),
            skipped = self.cache().len() - frozen.len(),
            "serialized module"
        );
        Ok(output)
    }

    fn frozen_entries(&self) -> Vec<Frozen<'_>> {
        self.cache()
            .iter()
            .filter_map(|(name, value)| match frozen_literal(name, value, self.config().serializable) {
                Ok(literal) => Some(Frozen { name, literal }),
                Err(reason) => {
                    debug!(function = %name, %reason, "not serializable, keeping definition");
                    None
                }
            })
            .collect()
    }

    fn render(&self, frozen: &[Frozen<'_>], origin: &str) -> String {
        let replaced: FxHashSet<&str> = frozen.iter().map(|f| f.name).collect();
        let script = self.script();

        let mut out = format!(
            "// Generated by wirescript from {origin}.\n\
             // Frozen functions hold results of a previous run, in call order.\n"
        );

        let mut globals = script.globals().peekable();
        if globals.peek().is_some() {
            out.push('\n');
        }
        for global in globals {
            out.push_str(global.span.slice(script.source()).unwrap_or_default());
            out.push('\n');
        }

        for function in self.registry().iter() {
            if replaced.contains(function.name.as_str()) {
                continue;
            }
            out.push('\n');
            out.push_str(&function.source);
            out.push('\n');
        }

        for entry in frozen {
            let return_type = self
                .registry()
                .get(entry.name)
                .map_or_else(|| "auto".to_string(), |f| f.return_type.to_string());
            out.push_str(&format!(
                "\n[{FROZEN_ATTRIBUTE}]\n{return_type} {}() {{\n    return {};\n}}\n",
                entry.name, entry.literal
            ));
        }

        out
    }
}

/// The literal for one cache entry. Names that would not parse back as a
/// function name are rejected along with values that have no literal form.
fn frozen_literal(
    name: &str,
    value: &Value,
    shapes: SerializableShapes,
) -> std::result::Result<String, NonSerializable> {
    if !is_identifier(name) {
        return Err(NonSerializable::InvalidName { name: name.to_string() });
    }
    value.to_literal(shapes)
}

/// Whether two paths name the same file. Missing files never match.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
