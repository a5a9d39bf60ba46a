use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub demo: String,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }
}

/// Workspace root, one level above this crate.
pub fn workspace_root() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let nproc = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let extra = env::var("PVSHIFT_FEATURES").unwrap_or_default();
    compute_config(nproc, &extra)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features: Vec<String> = Vec::new();
    if nproc > 1 {
        features.push("parallel".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }

    let demo = if features.iter().any(|f| f == "verbose-logging") {
        "verbose_logging".to_string()
    } else {
        "basic_shift".to_string()
    };

    BuildConfig { features, demo }
}

fn cargo() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root());
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo();
    cmd.args(["build", "--workspace"]);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo();
    cmd.args(["test", "--workspace"]);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

/// The core crate must keep building without `std`.
pub fn no_std_check_command() -> Command {
    let mut cmd = cargo();
    cmd.args(["check", "-p", "pvshift", "--no-default-features"]);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = cargo();
    cmd.args(["clippy", "--workspace", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = cargo();
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo();
    cmd.args(["bench", "-p", "pvshift-bench"]);
    if cfg.features.iter().any(|f| f == "parallel") {
        cmd.args(["--features", "parallel"]);
    }
    cmd
}

pub fn demo_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo();
    cmd.args(["run", "--release", "--example", &cfg.demo]);
    if let Some(f) = cfg.features_arg() {
        cmd.arg("--features").arg(f);
    }
    cmd
}

pub fn shift_command(input: &str, output: &str, semitones: f32) -> Command {
    let mut cmd = cargo();
    cmd.args(["run", "-r", "-p", "pvshift-cli", "--", input, output])
        .arg(format!("--semitones={}", semitones));
    cmd
}

/// Run `cmd`, failing unless it exits successfully.
pub fn run(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd.get_args().collect::<Vec<_>>(), status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn parallel_only_on_multicore() {
        assert_eq!(compute_config(1, "").features, Vec::<String>::new());
        assert_eq!(compute_config(8, "").features, vec!["parallel".to_string()]);
        assert_eq!(compute_config(1, "").demo, "basic_shift");
    }

    #[test]
    fn extra_features_are_appended_once() {
        let cfg = compute_config(4, "verbose-logging  parallel");
        assert_eq!(
            cfg.features,
            vec!["parallel".to_string(), "verbose-logging".to_string()]
        );
        assert_eq!(cfg.demo, "verbose_logging");
        assert_eq!(cfg.features_arg().as_deref(), Some("parallel verbose-logging"));
    }

    #[test]
    fn commands_include_features() {
        let cfg = compute_config(2, "");
        let build = args(&build_command(&cfg));
        assert!(build.contains(&"build".to_string()));
        assert!(build.contains(&"--features".to_string()));
        assert!(build.contains(&"parallel".to_string()));

        let single = compute_config(1, "");
        assert!(!args(&test_command(&single)).contains(&"--features".to_string()));
    }

    #[test]
    fn other_commands() {
        let cfg = compute_config(2, "");
        assert!(args(&clippy_command()).contains(&"clippy".to_string()));
        assert!(args(&fmt_command()).contains(&"fmt".to_string()));
        assert!(args(&no_std_check_command()).contains(&"--no-default-features".to_string()));
        let bench = args(&bench_command(&cfg));
        assert!(bench.contains(&"pvshift-bench".to_string()));
        assert!(bench.contains(&"parallel".to_string()));
        assert!(args(&demo_command(&cfg)).contains(&"basic_shift".to_string()));

        let shift = args(&shift_command("in.flac", "out.wav", -3.0));
        assert!(shift.contains(&"pvshift-cli".to_string()));
        assert!(shift.contains(&"in.flac".to_string()));
        assert!(shift.contains(&"out.wav".to_string()));
        assert!(shift.contains(&"--semitones=-3".to_string()));
    }

    #[test]
    fn commands_run_from_workspace_root() {
        let cmd = fmt_command();
        assert_eq!(cmd.get_current_dir(), Some(workspace_root().as_path()));
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
