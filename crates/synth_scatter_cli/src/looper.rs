//! Process-looping driver: one host engine process per generation cycle.
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use synth_scatter::prelude::{GeneratorConfig, LayerKind, QuantityPolicy};
use tracing::{info, warn};

/// Number of recent cycle durations the ETA is averaged over.
pub const ETA_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Number of generation cycles to run.
    pub gen_num: u64,
    pub host_executable: PathBuf,
    /// Script the host runs for one cycle.
    pub script_path: PathBuf,
    /// Flags placed before `--python`, e.g. to run without a window.
    pub window_flags: Vec<String>,
    pub run_log_path: PathBuf,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            gen_num: 5000,
            host_executable: PathBuf::from("blender"),
            script_path: PathBuf::from("generate_cycle.py"),
            window_flags: vec!["--background".into()],
            run_log_path: PathBuf::from("synth_scatter_log.txt"),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gen_num == 0 {
            bail!("driver.gen_num must be >= 1");
        }
        if self.host_executable.as_os_str().is_empty() {
            bail!("driver.host_executable must not be empty");
        }
        if self.script_path.as_os_str().is_empty() {
            bail!("driver.script_path must not be empty");
        }
        Ok(())
    }

    /// Arguments of one host invocation: window flags, then `--python <script>`.
    pub fn host_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.window_flags.iter().map(OsString::from).collect();
        args.push("--python".into());
        args.push(self.script_path.clone().into_os_string());
        args
    }
}

/// Runs one generation cycle and reports the exit code, if any.
pub trait HostLauncher {
    fn launch(&mut self) -> anyhow::Result<Option<i32>>;
}

/// Launches the configured host executable as a child process.
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessLauncher {
    pub fn new(driver: &DriverConfig) -> Self {
        Self {
            program: driver.host_executable.clone(),
            args: driver.host_args(),
        }
    }
}

impl HostLauncher for ProcessLauncher {
    fn launch(&mut self) -> anyhow::Result<Option<i32>> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .with_context(|| format!("failed to launch {}", self.program.display()))?;
        Ok(status.code())
    }
}

impl<F> HostLauncher for F
where
    F: FnMut() -> anyhow::Result<Option<i32>>,
{
    fn launch(&mut self) -> anyhow::Result<Option<i32>> {
        self()
    }
}

/// Moving average of the most recent cycle durations.
#[derive(Debug, Clone)]
pub struct EtaTracker {
    recent: VecDeque<Duration>,
    capacity: usize,
}

impl Default for EtaTracker {
    fn default() -> Self {
        Self::new(ETA_WINDOW)
    }
}

impl EtaTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        if self.recent.len() == self.capacity {
            self.recent.pop_back();
        }
        self.recent.push_front(elapsed);
    }

    /// Average over the window; zero before the first record.
    pub fn average(&self) -> Duration {
        if self.recent.is_empty() {
            return Duration::ZERO;
        }
        self.recent.iter().sum::<Duration>() / self.recent.len() as u32
    }

    pub fn report(&self, done: u64, total: u64) -> EtaReport {
        let per_image = self.average();
        let remaining = total.saturating_sub(done);
        EtaReport {
            per_image,
            thousand_images: per_image.mul_f64(1000.0),
            remaining_images: remaining,
            remaining: per_image.mul_f64(remaining as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaReport {
    pub per_image: Duration,
    pub thousand_images: Duration,
    pub remaining_images: u64,
    pub remaining: Duration,
}

/// `d:h:m:s -> D:HH:MM:SS` with whole seconds.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let days = secs / 86_400;
    secs %= 86_400;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    secs %= 60;
    format!("d:h:m:s -> {days}:{hours:02}:{minutes:02}:{secs:02}")
}

/// `key:value` lines recording the parameters of a run.
pub fn run_log_lines(generator: &GeneratorConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for layer in LayerKind::ALL {
        lines.push(format!(
            "{}_asset_folder:{}",
            layer,
            generator.layer(layer).asset_folder.display()
        ));
    }
    lines.push(format!(
        "hdri_lighting_folder:{}",
        generator.lighting.folder.display()
    ));
    lines.push(format!(
        "material_library_folder:{}",
        generator.texture.folder.display()
    ));
    lines.push(format!(
        "output_img_path:{}",
        generator.output.image_dir.display()
    ));
    lines.push(format!(
        "output_label_path:{}",
        generator.output.label_dir.display()
    ));
    for layer in [LayerKind::Foreground, LayerKind::Occluder] {
        lines.push(format!(
            "{}_quantity:{}",
            layer,
            describe_quantity(&generator.layer(layer).quantity)
        ));
    }
    lines.push(format!("max_samples:{}", generator.camera.max_samples));
    for (name, spec) in generator.camera.effects() {
        lines.push(format!("{name}_probability:{}", spec.probability));
    }
    lines
}

fn describe_quantity(policy: &QuantityPolicy) -> String {
    match policy {
        QuantityPolicy::AllSamples => "all".into(),
        QuantityPolicy::Ranged { min, max } => format!("{min}..={max}"),
    }
}

pub fn write_run_log(path: &Path, generator: &GeneratorConfig) -> anyhow::Result<()> {
    let mut text = run_log_lines(generator).join("\n");
    text.push('\n');
    fs::write(path, text).with_context(|| format!("failed to write run log {}", path.display()))
}

/// Drives `gen_num` generation cycles through a [`HostLauncher`].
pub struct Looper<L: HostLauncher> {
    gen_num: u64,
    launcher: L,
    eta: EtaTracker,
    done: u64,
}

impl<L: HostLauncher> Looper<L> {
    pub fn new(gen_num: u64, launcher: L) -> Self {
        Self {
            gen_num,
            launcher,
            eta: EtaTracker::default(),
            done: 0,
        }
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    /// Run every remaining cycle. A non-zero host exit is logged and the loop moves on; only a
    /// failure to launch the host stops it.
    pub fn run(&mut self) -> anyhow::Result<u64> {
        while self.done < self.gen_num {
            let start = Instant::now();
            match self.launcher.launch()? {
                Some(0) => {}
                Some(code) => warn!("Host exited with status {code}; continuing."),
                None => warn!("Host terminated by signal; continuing."),
            }
            self.done += 1;
            self.eta.record(start.elapsed());

            let report = self.eta.report(self.done, self.gen_num);
            info!(
                "Generate 1 image ETA: {} seconds",
                report.per_image.as_secs()
            );
            info!(
                "Generate 1k images ETA: {}",
                format_duration(report.thousand_images)
            );
            info!("Already generated {}/{} images", self.done, self.gen_num);
            info!(
                "Remain {} images, ETA: {}",
                report.remaining_images,
                format_duration(report.remaining)
            );
        }
        info!("Generated {} images.", self.gen_num);
        Ok(self.done)
    }
}

/// Write the run log, then launch the host once per cycle.
pub fn run_loop(generator: &GeneratorConfig, driver: &DriverConfig) -> anyhow::Result<u64> {
    write_run_log(&driver.run_log_path, generator)?;
    info!(
        "Running {} cycles of {} {:?}.",
        driver.gen_num,
        driver.host_executable.display(),
        driver.host_args()
    );
    Looper::new(driver.gen_num, ProcessLauncher::new(driver)).run()
}
