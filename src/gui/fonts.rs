use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

use eframe::egui;
use tracing::{
    info,
    warn,
};

const CJK_FONT: &str = "cjk";

// Common locations of fonts with Han coverage.
const SYSTEM_CJK_FONTS: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
];

/// egui's bundled fonts have no Han glyphs, so a system (or configured) font
/// is appended as a fallback to both families.
pub fn setup_fonts(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_CJK_FONTS.iter().map(PathBuf::from));

    let Some((path, bytes)) = candidates.filter_map(|path| read_font(&path).map(|b| (path, b))).next()
    else {
        warn!("No CJK font found; terms may not render. Set font_path in settings.json.");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(CJK_FONT.to_owned(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(CJK_FONT.to_owned());
    }
    ctx.set_fonts(fonts);

    info!("Using {} for CJK text", path.display());
}

fn read_font(path: &Path) -> Option<Vec<u8>> {
    if !path.is_file() {
        return None;
    }
    match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Could not read font {}: {}", path.display(), e);
            None
        }
    }
}
