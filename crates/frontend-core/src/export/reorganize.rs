//! Moving mirrored files into the `assets/{img,js,css,fonts}` layout

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Root of the reorganized asset tree inside the export
pub const ASSETS_DIR: &str = "assets";

/// Directory the asset pipeline serves Stimulus controllers from
pub const SCRIPT_MODULES_DIR: &str = "controllers";

/// Asset groups, matched by extension regardless of original location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Script,
    Stylesheet,
    Font,
}

impl AssetKind {
    /// Order in which groups are moved
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Image,
        AssetKind::Script,
        AssetKind::Stylesheet,
        AssetKind::Font,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Image => "img",
            AssetKind::Script => "js",
            AssetKind::Stylesheet => "css",
            AssetKind::Font => "fonts",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetKind::Image => &["jpg", "jpeg", "png", "gif", "svg", "webp", "ico"],
            AssetKind::Script => &["js"],
            AssetKind::Stylesheet => &["css"],
            AssetKind::Font => &["woff", "woff2", "ttf", "eot", "otf"],
        }
    }

    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    /// `<output>/assets/<dir>`
    pub fn destination(self, output_dir: &Path) -> PathBuf {
        output_dir.join(ASSETS_DIR).join(self.dir_name())
    }
}

/// Files moved and duplicates left in place
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReorganizeReport {
    pub moved: usize,
    pub skipped: usize,
}

/// Create `assets/img`, `assets/js`, `assets/css` and `assets/fonts`
pub fn prepare_asset_dirs(output_dir: &Path) -> Result<()> {
    for kind in AssetKind::ALL {
        let dir = kind.destination(output_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

fn files_of_kind(output_dir: &Path, kind: AssetKind) -> Result<Vec<PathBuf>> {
    let dest = kind.destination(output_dir);
    let mut files = Vec::new();
    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", output_dir.display()))?;
        if !entry.file_type().is_file() || entry.path().parent() == Some(dest.as_path()) {
            continue;
        }
        if AssetKind::for_path(entry.path()) == Some(kind) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Move `file` into `dest_dir` unless a same-named file is already there
fn move_into(file: &Path, dest_dir: &Path, report: &mut ReorganizeReport) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Ok(());
    };
    let dest = dest_dir.join(name);
    if dest.exists() {
        report.skipped += 1;
        return Ok(());
    }
    std::fs::rename(file, &dest)
        .with_context(|| format!("Failed to move {} to {}", file.display(), dest.display()))?;
    report.moved += 1;
    Ok(())
}

/// Move every image, script, stylesheet and font into its asset directory
/// (first writer wins on name clashes), then fold a leftover
/// `assets/controllers` directory into `assets/js`
pub fn reorganize(output_dir: &Path) -> Result<ReorganizeReport> {
    let mut report = ReorganizeReport::default();

    for kind in AssetKind::ALL {
        let dest = kind.destination(output_dir);
        for file in files_of_kind(output_dir, kind)? {
            move_into(&file, &dest, &mut report)?;
        }
    }

    let modules = output_dir.join(ASSETS_DIR).join(SCRIPT_MODULES_DIR);
    if modules.is_dir() {
        let scripts = AssetKind::Script.destination(output_dir);
        for entry in std::fs::read_dir(&modules)
            .with_context(|| format!("Failed to read directory: {}", modules.display()))?
        {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                move_into(&entry.path(), &scripts, &mut report)?;
            }
        }
        std::fs::remove_dir_all(&modules)
            .with_context(|| format!("Failed to remove {}", modules.display()))?;
    }

    Ok(report)
}
