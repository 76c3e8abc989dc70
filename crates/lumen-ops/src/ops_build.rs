//! Operation: build the project (analyze, then compile what changed).
//!
//! Orchestrates the pipeline: project file -> staleness analysis ->
//! dependency-ordered parallel compilation, with cargo-style status lines
//! and an optional timing breakdown.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::ProgressBar;

use lumen_build::artifact::ArtifactRoot;
use lumen_build::backend::{CompiledModule, LumencCompiler, ModuleCompiler};
use lumen_build::scheduler;
use lumen_build::staleness;
use lumen_build::timeline::{self, Timeline};
use lumen_core::config::GlobalConfig;
use lumen_core::interface::Interface;
use lumen_core::module::{Location, ModuleId, PackageId};
use lumen_core::project::{ProjectFile, PROJECT_FILE};
use lumen_util::errors::{BuildError, BuildResult};
use lumen_util::progress::{status, status_info, status_warn};

/// Options for a build invocation.
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Worker thread count; defaults to the configured job count.
    pub jobs: Option<usize>,
    /// Print a phase timing breakdown after the build.
    pub timings: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Compiler binary override (highest precedence).
    pub compiler_binary: Option<PathBuf>,
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildReport {
    pub package: PackageId,
    /// Every module in the project graph.
    pub modules_total: usize,
    /// Modules compiled during this run.
    pub modules_compiled: usize,
    /// Modules reused from cached interfaces.
    pub modules_reused: usize,
    pub duration: Duration,
    /// Interfaces published by the build, for downstream consumers.
    pub interfaces: BTreeMap<ModuleId, Interface>,
}

/// Run a build with the compiler binary resolved from options, project
/// file, and global config, in that order.
pub fn build(project_dir: &Path, opts: &BuildOptions) -> BuildResult<BuildReport> {
    let project = ProjectFile::from_path(&project_dir.join(PROJECT_FILE))?;
    let config = GlobalConfig::load().unwrap_or_default();

    let binary = opts
        .compiler_binary
        .clone()
        .or_else(|| project.compiler.binary.clone())
        .or_else(|| config.compiler.binary.clone())
        .unwrap_or_else(|| PathBuf::from("lumenc"));
    let compiler = LumencCompiler::new(binary);

    let jobs = opts.jobs.unwrap_or(config.build.jobs);
    build_with_compiler(project_dir, &project, jobs, opts, &compiler)
}

/// Run a build against an explicit compiler backend.
///
/// Split out from [`build`] so tests and embedders can substitute their
/// own [`ModuleCompiler`].
pub fn build_with_compiler(
    project_dir: &Path,
    project: &ProjectFile,
    jobs: usize,
    opts: &BuildOptions,
    compiler: &dyn ModuleCompiler,
) -> BuildResult<BuildReport> {
    let start = Instant::now();
    let package = project.root_package();

    if !opts.quiet {
        status(
            "Compiling",
            &format!("{package} (compiler {})", project.compiler.version),
        );
    }

    let artifacts = ArtifactRoot::new(project_dir, &project.compiler.version);
    let modules_total = project.modules.len();
    if modules_total == 0 && !opts.quiet {
        status_warn("Warning", "the project file lists no modules");
    }

    let mut tl = Timeline::start("build");

    let pending = tl.phase("analyze", |_| {
        let summary = project.to_summary(project_dir)?;
        staleness::analyze(summary, &artifacts)
    })?;
    let modules_compiled = pending.len();
    let modules_reused = modules_total - modules_compiled;

    let interfaces = tl.phase("compile", |_| {
        if opts.quiet || modules_compiled == 0 {
            scheduler::run(pending, jobs, compiler, &artifacts)
        } else {
            let bar = lumen_util::progress::module_bar(modules_compiled as u64);
            let observed = ProgressCompiler {
                inner: compiler,
                bar: &bar,
            };
            let result = scheduler::run(pending, jobs, &observed, &artifacts);
            bar.finish_and_clear();
            result
        }
    })?;

    let root_phase = tl.finish();
    let duration = start.elapsed();

    if !opts.quiet {
        status(
            "Finished",
            &format!(
                "{modules_compiled} compiled, {modules_reused} reused in {:.2}s",
                duration.as_secs_f64()
            ),
        );
        if opts.timings {
            status_info("Timings", "phase breakdown");
            eprint!("{}", timeline::render(&root_phase));
        }
    }

    Ok(BuildReport {
        package,
        modules_total,
        modules_compiled,
        modules_reused,
        duration,
        interfaces,
    })
}

/// Backend decorator that advances a progress bar per finished module.
struct ProgressCompiler<'a> {
    inner: &'a dyn ModuleCompiler,
    bar: &'a ProgressBar,
}

impl ModuleCompiler for ProgressCompiler<'_> {
    fn compile(
        &self,
        module: &ModuleId,
        location: &Location,
        deps: &BTreeMap<ModuleId, Interface>,
    ) -> Result<CompiledModule, BuildError> {
        let result = self.inner.compile(module, location, deps);
        if result.is_ok() {
            self.bar.inc(1);
        }
        result
    }
}
