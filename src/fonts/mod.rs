//! Font resolution.
//!
//! A run renders every document in one font, resolved once before the first document is
//! built. Candidates are tried in a fixed priority order and the first one that exists and
//! parses wins:
//!
//! 1. an explicit font file (`--font` / `TREE2PDF_FONT`);
//! 2. Unicode-capable system fonts, embedded into the output under [`UNICODE_FONT_NAME`];
//! 3. the standard `Helvetica` font, referenced but not embedded. The layout engine still
//!    needs glyph metrics for it, which are borrowed from a metric-compatible system font or,
//!    when none is installed, from the font compiled into the library.
//!
//! The last step cannot fail on a well-formed build, so a run always gets a font.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use log::{info, warn};
use printpdf::BuiltinFont;

use crate::error::Error;

/// Logical name under which an embedded candidate is registered.
pub const UNICODE_FONT_NAME: &str = "UniFont";

/// Logical name of the built-in fallback.
pub const BUILTIN_FONT_NAME: &str = "Helvetica";

/// Metrics used for the built-in fallback when no metric-compatible font is installed.
static BUNDLED_METRICS: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

/// A font file to try, with an optional bold sibling used for bold styles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCandidate {
    regular: PathBuf,
    bold: Option<PathBuf>,
}

impl FontCandidate {
    pub fn new(regular: impl Into<PathBuf>) -> Self {
        Self {
            regular: regular.into(),
            bold: None,
        }
    }

    /// Sets the bold sibling and returns the updated candidate.
    pub fn with_bold(mut self, bold: impl Into<PathBuf>) -> Self {
        self.bold = Some(bold.into());
        self
    }

    pub fn regular(&self) -> &Path {
        &self.regular
    }
}

/// Where the selected font comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Embedded from the given file (and its bold sibling, when found).
    Embedded {
        regular: PathBuf,
        bold: Option<PathBuf>,
    },
    /// The built-in standard font, with metrics taken from `metrics`, or from the bundled
    /// font when `metrics` is `None`.
    Builtin { metrics: Option<PathBuf> },
}

/// The single font used for every document of a run.
#[derive(Clone)]
pub struct FontChoice {
    name: &'static str,
    source: FontSource,
    family: FontFamily<FontData>,
}

impl FontChoice {
    /// Logical font name: [`UNICODE_FONT_NAME`] or [`BUILTIN_FONT_NAME`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin { .. })
    }

    /// Font family handed to each new document.
    pub fn family(&self) -> FontFamily<FontData> {
        self.family.clone()
    }
}

impl fmt::Debug for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontChoice")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish()
    }
}

/// Ordered candidate lists tried by [`FontResolver::resolve`].
#[derive(Clone, Debug, Default)]
pub struct FontResolver {
    explicit: Option<PathBuf>,
    unicode: Vec<FontCandidate>,
    builtin_metrics: Vec<PathBuf>,
}

impl FontResolver {
    /// Resolver probing the usual font locations of Windows, Linux and macOS hosts.
    pub fn system() -> Self {
        Self {
            explicit: None,
            unicode: system_unicode_candidates(),
            builtin_metrics: system_metric_candidates(),
        }
    }

    /// Resolver probing exactly the given lists.
    pub fn from_candidates(unicode: Vec<FontCandidate>, builtin_metrics: Vec<PathBuf>) -> Self {
        Self {
            explicit: None,
            unicode,
            builtin_metrics,
        }
    }

    /// Tries `path` before every other candidate.
    pub fn with_override(mut self, path: impl Into<Option<PathBuf>>) -> Self {
        self.explicit = path.into();
        self
    }

    /// Selects the first usable candidate, falling back to the built-in font.
    pub fn resolve(&self) -> Result<FontChoice, Error> {
        let mut attempts = Vec::new();

        let explicit = self.explicit.iter().map(FontCandidate::new);
        for candidate in explicit.chain(self.unicode.iter().cloned()) {
            match load_embedded(&candidate) {
                Ok(choice) => {
                    info!(
                        "Using font {} from {}",
                        choice.name,
                        candidate.regular.display()
                    );
                    return Ok(choice);
                }
                Err(reason) => attempts.push(format!("{} ({})", candidate.regular.display(), reason)),
            }
        }

        for metrics in &self.builtin_metrics {
            match load_builtin(metrics) {
                Ok(choice) => {
                    warn!(
                        "No Unicode font found; falling back to built-in {} (metrics from {}). Non-Latin text is replaced by '?'.",
                        BUILTIN_FONT_NAME,
                        metrics.display()
                    );
                    return Ok(choice);
                }
                Err(reason) => attempts.push(format!("{} ({})", metrics.display(), reason)),
            }
        }

        if !attempts.is_empty() {
            info!("Font candidates checked: {}", attempts.join(", "));
        }
        match builtin_choice(BUNDLED_METRICS.to_vec(), None) {
            Ok(choice) => {
                warn!(
                    "No usable font found on this host; falling back to built-in {} with bundled metrics. Non-Latin text is replaced by '?'.",
                    BUILTIN_FONT_NAME
                );
                Ok(choice)
            }
            Err(err) => {
                attempts.push(format!("bundled metrics (unusable: {err})"));
                Err(Error::FontUnavailable {
                    checked: attempts.join(", "),
                })
            }
        }
    }
}

fn load_font(path: &Path) -> Result<FontData, String> {
    if !path.is_file() {
        return Err("missing".to_owned());
    }
    FontData::load(path, None).map_err(|err| {
        warn!("Skipping unusable font {}: {}", path.display(), err);
        format!("unusable: {err}")
    })
}

fn load_embedded(candidate: &FontCandidate) -> Result<FontChoice, String> {
    let regular = load_font(&candidate.regular)?;
    let bold_path = candidate.bold.as_ref().filter(|path| path.is_file());
    let bold = match bold_path {
        Some(path) => load_font(path).unwrap_or_else(|_| regular.clone()),
        None => regular.clone(),
    };

    Ok(FontChoice {
        name: UNICODE_FONT_NAME,
        source: FontSource::Embedded {
            regular: candidate.regular.clone(),
            bold: bold_path.cloned(),
        },
        family: FontFamily {
            italic: regular.clone(),
            bold_italic: bold.clone(),
            regular,
            bold,
        },
    })
}

fn load_builtin(metrics: &Path) -> Result<FontChoice, String> {
    if !metrics.is_file() {
        return Err("missing".to_owned());
    }
    let data = fs::read(metrics).map_err(|err| format!("unreadable: {err}"))?;
    builtin_choice(data, Some(metrics.to_path_buf())).map_err(|err| {
        warn!("Skipping unusable font {}: {}", metrics.display(), err);
        format!("unusable: {err}")
    })
}

/// Helvetica in all four styles, laid out with the glyph metrics in `data`.
fn builtin_choice(
    data: Vec<u8>,
    metrics: Option<PathBuf>,
) -> Result<FontChoice, genpdf::error::Error> {
    let variant = |builtin| FontData::new(data.clone(), Some(builtin));
    let family = FontFamily {
        regular: variant(BuiltinFont::Helvetica)?,
        bold: variant(BuiltinFont::HelveticaBold)?,
        italic: variant(BuiltinFont::HelveticaOblique)?,
        bold_italic: variant(BuiltinFont::HelveticaBoldOblique)?,
    };

    Ok(FontChoice {
        name: BUILTIN_FONT_NAME,
        source: FontSource::Builtin { metrics },
        family,
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn windows_font_directory() -> PathBuf {
    ["WINDIR", "SystemRoot"]
        .into_iter()
        .find_map(env_path)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"))
        .join("Fonts")
}

fn system_unicode_candidates() -> Vec<FontCandidate> {
    let windows = windows_font_directory();
    vec![
        FontCandidate::new(windows.join("DejaVuSans.ttf"))
            .with_bold(windows.join("DejaVuSans-Bold.ttf")),
        FontCandidate::new(windows.join("arial.ttf")).with_bold(windows.join("arialbd.ttf")),
        FontCandidate::new(windows.join("calibri.ttf")).with_bold(windows.join("calibrib.ttf")),
        FontCandidate::new("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
            .with_bold("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
        FontCandidate::new("/usr/share/fonts/TTF/DejaVuSans.ttf")
            .with_bold("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"),
        FontCandidate::new("/usr/share/fonts/dejavu/DejaVuSans.ttf")
            .with_bold("/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf"),
        FontCandidate::new("/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf")
            .with_bold("/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf"),
        FontCandidate::new("/Library/Fonts/Arial Unicode.ttf"),
        FontCandidate::new("/System/Library/Fonts/Supplemental/Arial.ttf")
            .with_bold("/System/Library/Fonts/Supplemental/Arial Bold.ttf"),
    ]
}

fn system_metric_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/croscore/Arimo-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bundled_builtin(choice: &FontChoice) {
        assert!(choice.is_builtin());
        assert_eq!(choice.name(), BUILTIN_FONT_NAME);
        assert_eq!(choice.source(), &FontSource::Builtin { metrics: None });
    }

    #[test]
    fn missing_candidates_fall_back_to_bundled_metrics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolver = FontResolver::from_candidates(
            vec![FontCandidate::new(dir.path().join("Nope.ttf"))],
            vec![dir.path().join("AlsoNope.ttf")],
        );

        let choice = resolver.resolve().expect("bundled fallback");
        assert_bundled_builtin(&choice);
    }

    #[test]
    fn corrupt_font_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let corrupt = dir.path().join("Corrupt.ttf");
        fs::write(&corrupt, b"definitely not a font").expect("write");

        let resolver = FontResolver::from_candidates(Vec::new(), vec![corrupt.clone()])
            .with_override(Some(corrupt));

        let choice = resolver.resolve().expect("bundled fallback");
        assert_bundled_builtin(&choice);
    }

    #[test]
    fn empty_resolver_still_resolves() {
        let choice = FontResolver::default().resolve().expect("bundled fallback");
        assert_bundled_builtin(&choice);
    }

    #[test]
    fn metric_candidates_come_before_bundled_metrics() {
        let dir = tempfile::tempdir().expect("tempdir");
        let metrics = dir.path().join("Metrics.ttf");
        fs::write(&metrics, BUNDLED_METRICS).expect("write");

        let choice = FontResolver::from_candidates(Vec::new(), vec![metrics.clone()])
            .resolve()
            .expect("metric candidate");
        assert!(choice.is_builtin());
        assert_eq!(
            choice.source(),
            &FontSource::Builtin {
                metrics: Some(metrics)
            }
        );
    }

    #[test]
    fn explicit_font_is_embedded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let explicit = dir.path().join("Explicit.ttf");
        fs::write(&explicit, BUNDLED_METRICS).expect("write");

        let choice = FontResolver::default()
            .with_override(Some(explicit.clone()))
            .resolve()
            .expect("explicit font");
        assert!(!choice.is_builtin());
        assert_eq!(choice.name(), UNICODE_FONT_NAME);
        assert_eq!(
            choice.source(),
            &FontSource::Embedded {
                regular: explicit,
                bold: None
            }
        );
    }

    #[test]
    fn system_candidates_start_with_windows_dejavu() {
        let candidates = system_unicode_candidates();
        let first = candidates.first().expect("candidates");
        assert!(first.regular().ends_with("DejaVuSans.ttf"));
        assert!(first.regular().parent().is_some_and(|dir| dir.ends_with("Fonts")));
    }

    #[test]
    fn system_resolution_is_stable() {
        let first = FontResolver::system().resolve().expect("first resolution");
        let second = FontResolver::system().resolve().expect("second resolution");
        assert_eq!(first.source(), second.source());
        assert_eq!(first.name(), second.name());
    }
}
