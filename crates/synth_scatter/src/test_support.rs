//! Scratch-directory helpers shared by unit tests.
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Empty directory under the system temp dir, removed with everything in it on drop.
pub(crate) struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub(crate) fn new(label: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "synth_scatter-{}-{}-{}",
            label,
            std::process::id(),
            n
        ));
        if path.exists() {
            fs::remove_dir_all(&path).expect("clear stale scratch dir");
        }
        fs::create_dir_all(&path).expect("create scratch dir");
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Subfolder `name` holding `count` empty files `asset_00.<ext>`, `asset_01.<ext>`, ...
    pub(crate) fn asset_folder(&self, name: &str, count: usize, extension: &str) -> PathBuf {
        let dir = self.path.join(name);
        fs::create_dir_all(&dir).expect("create asset folder");
        write_assets(&dir, count, extension);
        dir
    }

    /// Subfolder `name` laid out as a material library: `mat_00/mat_00_2K_Color.jpg`, ...
    pub(crate) fn material_folder(&self, name: &str, count: usize) -> PathBuf {
        let dir = self.path.join(name);
        for i in 0..count {
            let material = format!("mat_{i:02}");
            let sub = dir.join(&material);
            fs::create_dir_all(&sub).expect("create material dir");
            fs::write(sub.join(format!("{material}_2K_Color.jpg")), b"").expect("write color map");
        }
        fs::create_dir_all(&dir).expect("create material folder");
        dir
    }
}

impl Deref for ScratchDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for ScratchDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Fresh, empty scratch directory.
pub(crate) fn scratch_dir(label: &str) -> ScratchDir {
    ScratchDir::new(label)
}

/// Scratch directory holding `count` empty files `asset_00.<ext>`, `asset_01.<ext>`, ...
pub(crate) fn asset_folder(label: &str, count: usize, extension: &str) -> ScratchDir {
    let dir = ScratchDir::new(label);
    write_assets(dir.path(), count, extension);
    dir
}

fn write_assets(dir: &Path, count: usize, extension: &str) {
    for i in 0..count {
        fs::write(dir.join(format!("asset_{i:02}.{extension}")), b"").expect("write asset");
    }
}

#[test]
fn scratch_dir_is_removed_on_drop() {
    let dir = asset_folder("drop-guard", 2, "blend");
    let path = dir.to_path_buf();
    assert!(path.join("asset_01.blend").is_file());
    drop(dir);
    assert!(!path.exists());
}
