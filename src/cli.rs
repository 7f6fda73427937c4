//! Command-line interface for canisterc.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::compiler::compile_bytes;
use crate::config::{self, FillMode, ProjectConfig};
use crate::language::SourceLanguage;
use crate::report::{self, CompiledFile, FileSignatures};
use crate::signatures::extract_signatures;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default config file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["canisterc.yaml", ".canisterc.yaml"];

/// Directories never descended into when walking a project.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Default config written by `canisterc init`.
const DEFAULT_CONFIG: &str = include_str!("templates/canisterc.yaml");

/// Lightweight canister source analyzer.
///
/// canisterc checks Motoko, Rust, and JavaScript canister sources for
/// malformed declarations and, for clean sources, emits a placeholder WASM
/// payload and a Candid-style interface document.
#[derive(Parser)]
#[command(name = "canisterc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a source file or every source file under a directory
    #[command(visible_alias = "build")]
    Compile(CompileArgs),
    /// List callable signatures with example arguments
    Signatures(SignaturesArgs),
    /// Create a default canisterc.yaml
    Init(InitArgs),
}

/// Arguments for the compile command.
#[derive(Parser)]
pub struct CompileArgs {
    /// Path to compile (file or directory)
    pub path: PathBuf,

    /// Source language: motoko, rust, or javascript (default: from extension)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Directory to write .wasm and .did artifacts to
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Payload fill: random or zero
    #[arg(long)]
    pub fill: Option<String>,
}

/// Arguments for the signatures command.
#[derive(Parser)]
pub struct SignaturesArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Source language: motoko, rust, or javascript (default: from extension)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "canisterc.yaml")]
    pub output: PathBuf,
}

/// Discover a config file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Load the explicit config, or a discovered one, or the defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<ProjectConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match discover_config() {
            Some(p) => p,
            None => {
                debug!("no config file found, using defaults");
                return Ok(ProjectConfig::default());
            }
        },
    };

    let config = ProjectConfig::parse_file(&path)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config::validate(&config).with_context(|| format!("invalid config {}", path.display()))?;
    debug!(config = %path.display(), "loaded config");
    Ok(config)
}

fn validate_format(format: &str) -> anyhow::Result<()> {
    if format != "pretty" && format != "json" {
        anyhow::bail!("invalid format {:?}, must be 'pretty' or 'json'", format);
    }
    Ok(())
}

/// Resolve a language override: CLI flag first, then config.
fn language_override(
    flag: Option<&str>,
    config: &ProjectConfig,
) -> anyhow::Result<Option<SourceLanguage>> {
    match flag {
        Some(tag) => Ok(Some(tag.parse()?)),
        None => Ok(config.language),
    }
}

/// Language for one file: the override if any, otherwise its extension.
fn language_for(path: &Path, forced: Option<SourceLanguage>) -> anyhow::Result<SourceLanguage> {
    if let Some(lang) = forced {
        return Ok(lang);
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(SourceLanguage::from_extension(ext)?)
}

fn has_extension_of(path: &Path, languages: &[SourceLanguage]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    languages.iter().any(|lang| lang.extensions().contains(&ext.as_str()))
}

/// Collect the source files under `root`.
///
/// With a forced language only that language's extensions are collected.
pub fn collect_files(
    root: &Path,
    config: &ProjectConfig,
    forced: Option<SourceLanguage>,
) -> anyhow::Result<Vec<PathBuf>> {
    let languages: Vec<SourceLanguage> = match forced {
        Some(lang) => vec![lang],
        None => SourceLanguage::ALL.to_vec(),
    };

    let excluded = config.exclusion_set()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_extension_of(path, &languages) {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(relative) {
            debug!(file = %relative.display(), "excluded by config");
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Resolve the files named by `path`: itself, or everything under it.
fn resolve_targets(
    path: &Path,
    config: &ProjectConfig,
    forced: Option<SourceLanguage>,
) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot access path {}", path.display()))?;
    if metadata.is_dir() {
        collect_files(path, config, forced)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Compile a single file from disk.
fn compile_file(
    path: &Path,
    forced: Option<SourceLanguage>,
    options: &config::CompileOptions,
) -> anyhow::Result<CompiledFile> {
    let language = language_for(path, forced)?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let result = compile_bytes(&bytes, language, options)
        .with_context(|| format!("failed to compile {}", path.display()))?;
    Ok(CompiledFile {
        file: path.to_string_lossy().to_string(),
        language,
        result,
    })
}

/// Artifact base path for `file`: its path relative to the compile root,
/// extension removed. A single-file root maps to the bare file stem.
fn artifact_base(root: &Path, file: &Path) -> PathBuf {
    let relative = match file.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => Path::new(file.file_name().unwrap_or(file.as_os_str())),
    };
    relative.with_extension("")
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `<base>.wasm` and `<base>.did` under `out_dir` for a successful
/// compilation.
fn write_artifacts(out_dir: &Path, base: &Path, compiled: &CompiledFile) -> anyhow::Result<()> {
    let (Some(wasm), Some(candid)) = (compiled.result.wasm(), compiled.result.candid()) else {
        return Ok(());
    };

    let wasm_path = with_suffix(&out_dir.join(base), ".wasm");
    let did_path = with_suffix(&out_dir.join(base), ".did");
    if let Some(parent) = wasm_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&wasm_path, wasm)
        .with_context(|| format!("failed to write {}", wasm_path.display()))?;
    std::fs::write(&did_path, candid)
        .with_context(|| format!("failed to write {}", did_path.display()))?;
    debug!(wasm = %wasm_path.display(), did = %did_path.display(), "wrote artifacts");
    Ok(())
}

/// Run the compile command.
pub fn run_compile(args: &CompileArgs) -> anyhow::Result<i32> {
    validate_format(&args.format)?;

    let project = load_config(args.config.as_deref())?;
    let forced = language_override(args.language.as_deref(), &project)?;

    let mut options = project.compiler.clone();
    if let Some(fill) = &args.fill {
        options.fill = fill.parse::<FillMode>().map_err(anyhow::Error::msg)?;
    }

    let files = resolve_targets(&args.path, &project, forced)?;
    if files.is_empty() {
        eprintln!("Warning: no files to compile");
        return Ok(EXIT_SUCCESS);
    }

    let outcomes: Vec<anyhow::Result<CompiledFile>> = files
        .par_iter()
        .map(|path| compile_file(path, forced, &options))
        .collect();

    let mut compiled = Vec::with_capacity(outcomes.len());
    let mut had_error = false;
    for outcome in outcomes {
        match outcome {
            Ok(c) => compiled.push(c),
            Err(e) => {
                warn!("{:#}", e);
                eprintln!("Error: {:#}", e);
                had_error = true;
            }
        }
    }

    if let Some(out_dir) = args.out_dir.as_ref().or(project.out_dir.as_ref()) {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        let mut bases = HashSet::new();
        for c in compiled.iter().filter(|c| c.result.success) {
            let base = artifact_base(&args.path, Path::new(&c.file));
            if !bases.insert(base.clone()) {
                anyhow::bail!(
                    "{} would overwrite the artifacts of another source ({}.wasm)",
                    c.file,
                    base.display()
                );
            }
            write_artifacts(out_dir, &base, c)?;
        }
    }

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_compile_json(&path_str, &compiled)?,
        _ => report::write_compile_pretty(&path_str, &compiled),
    }

    if had_error {
        Ok(EXIT_ERROR)
    } else if compiled.iter().any(|c| !c.result.success) {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the signatures command.
pub fn run_signatures(args: &SignaturesArgs) -> anyhow::Result<i32> {
    validate_format(&args.format)?;

    let project = load_config(None)?;
    let forced = language_override(args.language.as_deref(), &project)?;
    let files = resolve_targets(&args.path, &project, forced)?;

    let mut listings = Vec::with_capacity(files.len());
    let mut had_error = false;
    for path in &files {
        match signatures_for_file(path, forced) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                warn!("{:#}", e);
                eprintln!("Error: {:#}", e);
                had_error = true;
            }
        }
    }

    match args.format.as_str() {
        "json" => report::write_signatures_json(&listings)?,
        _ => report::write_signatures_pretty(&listings),
    }

    if had_error {
        Ok(EXIT_ERROR)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

fn signatures_for_file(path: &Path, forced: Option<SourceLanguage>) -> anyhow::Result<FileSignatures> {
    let language = language_for(path, forced)?;
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(FileSignatures {
        file: path.to_string_lossy().to_string(),
        language,
        signatures: extract_signatures(&source, language),
    })
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(&args.output, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: canisterc compile . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collect_files_skips_hidden_and_build_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/main.mo");
        touch(root, "src/api.js");
        touch(root, "src/lib.rs");
        touch(root, "README.md");
        touch(root, ".dfx/cache.mo");
        touch(root, "node_modules/dep/index.js");
        touch(root, "target/debug/build.rs");

        let files = collect_files(root, &ProjectConfig::default(), None).unwrap();
        assert_eq!(names(root, &files), vec!["src/api.js", "src/lib.rs", "src/main.mo"]);
    }

    #[test]
    fn test_collect_files_honors_forced_language_and_exclusions() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.mo");
        touch(root, "b.js");
        touch(root, "generated/c.mo");

        let config = ProjectConfig {
            excluded_paths: vec!["generated/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(root, &config, Some(SourceLanguage::Motoko)).unwrap();
        assert_eq!(names(root, &files), vec!["a.mo"]);
    }

    #[test]
    fn test_language_resolution_order() {
        let config = ProjectConfig {
            language: Some(SourceLanguage::Rust),
            ..Default::default()
        };
        assert_eq!(
            language_override(Some("js"), &config).unwrap(),
            Some(SourceLanguage::JavaScript)
        );
        assert_eq!(language_override(None, &config).unwrap(), Some(SourceLanguage::Rust));
        assert!(language_override(Some("cobol"), &config).is_err());

        assert_eq!(
            language_for(Path::new("x.mo"), None).unwrap(),
            SourceLanguage::Motoko
        );
        assert!(language_for(Path::new("x.txt"), None).is_err());
    }

    const ACTOR: &str = "actor A {\n  public func f() : async () {};\n}\n";

    fn compile_args(path: &Path, out_dir: &Path) -> CompileArgs {
        CompileArgs {
            path: path.to_path_buf(),
            language: None,
            config: None,
            format: "json".to_string(),
            out_dir: Some(out_dir.to_path_buf()),
            fill: Some("zero".to_string()),
        }
    }

    #[test]
    fn test_artifacts_keep_relative_paths() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        fs::create_dir_all(src.join("a")).unwrap();
        fs::create_dir_all(src.join("b")).unwrap();
        fs::write(src.join("a/main.mo"), ACTOR).unwrap();
        fs::write(src.join("b/main.mo"), ACTOR.replace("f()", "g()")).unwrap();

        assert_eq!(run_compile(&compile_args(&src, &out)).unwrap(), EXIT_SUCCESS);

        let a = fs::read_to_string(out.join("a/main.did")).unwrap();
        let b = fs::read_to_string(out.join("b/main.did")).unwrap();
        assert!(a.contains("f: () -> (())"));
        assert!(b.contains("g: () -> (())"));
        assert!(out.join("a/main.wasm").exists());
        assert!(out.join("b/main.wasm").exists());
    }

    #[test]
    fn test_artifact_collision_is_an_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("main.mo"), ACTOR).unwrap();
        fs::write(src.join("main.js"), "export function f() {}\n").unwrap();

        let err = run_compile(&compile_args(&src, &dir.path().join("out"))).unwrap_err();
        assert!(err.to_string().contains("would overwrite"));
    }

    #[test]
    fn test_artifact_base() {
        let root = Path::new("proj");
        assert_eq!(
            artifact_base(root, Path::new("proj/src/my.canister.mo")),
            PathBuf::from("src/my.canister")
        );
        assert_eq!(
            artifact_base(Path::new("x/counter.mo"), Path::new("x/counter.mo")),
            PathBuf::from("counter")
        );
        assert_eq!(
            with_suffix(Path::new("src/my.canister"), ".wasm"),
            PathBuf::from("src/my.canister.wasm")
        );
    }

    #[test]
    fn test_signatures_continue_past_unreadable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.mo"), ACTOR).unwrap();
        fs::write(dir.path().join("bad.mo"), b"\xff\xfe\x00").unwrap();

        let args = SignaturesArgs {
            path: dir.path().to_path_buf(),
            language: None,
            format: "json".to_string(),
        };
        assert_eq!(run_signatures(&args).unwrap(), EXIT_ERROR);

        let listing = signatures_for_file(&dir.path().join("good.mo"), None).unwrap();
        assert_eq!(listing.signatures.len(), 1);
        assert!(signatures_for_file(&dir.path().join("bad.mo"), None).is_err());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("canisterc.yaml");

        let args = InitArgs { output: output.clone() };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        let written = ProjectConfig::parse_file(&output).unwrap();
        assert!(config::validate(&written).is_ok());

        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
    }
}
