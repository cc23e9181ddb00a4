use std::{
    fs::{File, OpenOptions},
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    color::Palette,
    core::Canvas,
    error::{GridArtError, GridArtResult},
};

/// Immutable inputs of one batch run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BatchConfig {
    /// Word placed at both ends of every caption.
    pub trigger: String,
    pub palette: Palette,
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,
    #[serde(default = "default_count")]
    pub count: u64,
    pub output_dir: PathBuf,
    /// Artifact stem: item `i` is written as `<base_name>_<i>.png` / `.txt`.
    #[serde(default = "default_base_name")]
    pub base_name: String,
}

fn default_canvas_size() -> u32 {
    Canvas::DEFAULT_SIZE
}

fn default_count() -> u64 {
    BatchConfig::DEFAULT_COUNT
}

fn default_base_name() -> String {
    BatchConfig::DEFAULT_BASE_NAME.to_owned()
}

impl BatchConfig {
    pub const DEFAULT_COUNT: u64 = 300;
    pub const DEFAULT_BASE_NAME: &'static str = "vector_art";

    pub fn new(
        trigger: impl Into<String>,
        palette: Palette,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            palette,
            canvas_size: Canvas::DEFAULT_SIZE,
            count: Self::DEFAULT_COUNT,
            output_dir: output_dir.into(),
            base_name: default_base_name(),
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn from_json_file(path: &Path) -> GridArtResult<Self> {
        let f = File::open(path)
            .map_err(|e| GridArtError::io(format!("open config '{}'", path.display()), e))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            GridArtError::invalid_input(format!("parse config '{}': {e}", path.display()))
        })
    }

    /// Trigger with surrounding whitespace removed.
    pub fn trigger(&self) -> &str {
        self.trigger.trim()
    }

    /// Check every precondition of a batch run without generating anything.
    pub fn validate(&self) -> GridArtResult<()> {
        if self.trigger().is_empty() {
            return Err(GridArtError::invalid_input("trigger word must be non-empty"));
        }
        if self.palette.is_empty() {
            return Err(GridArtError::invalid_input(
                "palette must contain at least one color",
            ));
        }
        Canvas::new(self.canvas_size)?;

        let base = self.base_name.trim();
        if base.is_empty() || base.contains(['/', '\\']) || base == "." || base == ".." {
            return Err(GridArtError::invalid_input(format!(
                "invalid artifact base name \"{}\"",
                self.base_name
            )));
        }

        ensure_writable_dir(&self.output_dir)
    }

    pub fn image_path(&self, index: u64) -> PathBuf {
        self.artifact_path(index, "png")
    }

    pub fn caption_path(&self, index: u64) -> PathBuf {
        self.artifact_path(index, "txt")
    }

    /// Transient vector file used while rasterizing item `index`.
    pub fn svg_path(&self, index: u64) -> PathBuf {
        self.artifact_path(index, "svg")
    }

    fn artifact_path(&self, index: u64, ext: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{index}.{ext}", self.base_name.trim()))
    }
}

fn ensure_writable_dir(dir: &Path) -> GridArtResult<()> {
    let meta = std::fs::metadata(dir).map_err(|_| {
        GridArtError::invalid_input(format!("output location '{}' does not exist", dir.display()))
    })?;
    if !meta.is_dir() {
        return Err(GridArtError::invalid_input(format!(
            "output location '{}' is not a directory",
            dir.display()
        )));
    }

    // Permission bits are not reliable across platforms; probe with a real write.
    // `create_new` never touches a file that is already there.
    for attempt in 0..WRITE_PROBE_ATTEMPTS {
        let probe = write_probe_path(dir, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&probe) {
            Ok(file) => {
                drop(file);
                if let Err(e) = std::fs::remove_file(&probe) {
                    tracing::warn!(
                        path = %probe.display(),
                        error = %e,
                        "failed to remove write probe"
                    );
                }
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(GridArtError::invalid_input(format!(
                    "output location '{}' is not writable: {e}",
                    dir.display()
                )));
            }
        }
    }
    Err(GridArtError::invalid_input(format!(
        "output location '{}' could not be probed for writability: \
         {WRITE_PROBE_ATTEMPTS} probe names already taken",
        dir.display()
    )))
}

const WRITE_PROBE_ATTEMPTS: u32 = 16;

fn write_probe_path(dir: &Path, attempt: u32) -> PathBuf {
    dir.join(format!(".gridart-write-probe-{}-{attempt}", std::process::id()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("config_tests").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn palette() -> Palette {
        Palette::parse(&["#FF0000"]).unwrap()
    }

    #[test]
    fn json_defaults_match_batch_defaults() {
        let cfg: BatchConfig = serde_json::from_value(json!({
            "trigger": "Bauhaus",
            "palette": ["#ff0000", "#0000ff"],
            "output_dir": "out",
        }))
        .unwrap();
        assert_eq!(cfg.canvas_size, 1024);
        assert_eq!(cfg.count, 300);
        assert_eq!(cfg.base_name, "vector_art");
        assert_eq!(cfg.palette.joined_hex(), "#FF0000, #0000FF");
    }

    #[test]
    fn json_rejects_malformed_colors() {
        let res = serde_json::from_value::<BatchConfig>(json!({
            "trigger": "x",
            "palette": ["#ff00"],
            "output_dir": "out",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn artifacts_share_the_index() {
        let cfg = BatchConfig::new("t", palette(), "out").with_base_name("art");
        assert_eq!(cfg.image_path(4), Path::new("out").join("art_4.png"));
        assert_eq!(cfg.caption_path(4), Path::new("out").join("art_4.txt"));
        assert_eq!(cfg.svg_path(4), Path::new("out").join("art_4.svg"));
    }

    #[test]
    fn validate_reports_each_precondition() {
        let dir = scratch("validate");

        let ok = BatchConfig::new("Bauhaus", palette(), &dir);
        ok.validate().unwrap();
        // The probe file must not linger.
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        let err = BatchConfig::new("  ", palette(), &dir).validate().unwrap_err();
        assert!(err.to_string().contains("trigger"));

        let err = BatchConfig::new("x", palette(), dir.join("missing"))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = BatchConfig::new("x", palette(), &dir)
            .with_canvas_size(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("canvas size"));

        let err = BatchConfig::new("x", palette(), &dir)
            .with_base_name("a/b")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("base name"));
    }

    #[test]
    fn validate_leaves_existing_files_alone() {
        let dir = scratch("existing_probe_name");
        let taken = write_probe_path(&dir, 0);
        std::fs::write(&taken, "user data").unwrap();

        BatchConfig::new("x", palette(), &dir).validate().unwrap();

        assert_eq!(std::fs::read_to_string(&taken).unwrap(), "user data");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
    }

    #[test]
    fn file_as_output_location_is_rejected() {
        let dir = scratch("not_a_dir");
        let file = dir.join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        let err = BatchConfig::new("x", palette(), &file).validate().unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn loads_from_json_file() {
        let dir = scratch("load");
        let path = dir.join("batch.json");
        std::fs::write(
            &path,
            r##"{"trigger":"Bauhaus","palette":["#FF0000"],"output_dir":"o","count":2}"##,
        )
        .unwrap();
        let cfg = BatchConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.count, 2);
        assert_eq!(cfg.trigger(), "Bauhaus");

        let err = BatchConfig::from_json_file(&dir.join("absent.json")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
