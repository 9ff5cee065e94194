//! Page rendering through poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use lopdf::Document;
use tracing::{debug, info};

use super::{PageRasterizer, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Open a PDF with lopdf and return its page count.
///
/// Documents encrypted with an empty user password are accepted.
pub fn inspect(path: &Path) -> Result<u32> {
    let mut doc = Document::load(path).map_err(|e| PdfError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted {} with empty password", path.display());
    }

    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }
    Ok(page_count)
}

/// Renders pages one at a time into a scratch directory.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    command: PathBuf,
    dpi: u32,
    max_pages: usize,
}

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            command: config.pdftoppm_cmd.clone(),
            dpi: config.render_dpi,
            max_pages: config.max_pages,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Number of pages that will be rendered for a document of `page_count` pages.
    pub fn pages_to_render(&self, page_count: u32) -> u32 {
        if self.max_pages == 0 {
            page_count
        } else {
            page_count.min(u32::try_from(self.max_pages).unwrap_or(u32::MAX))
        }
    }

    fn render_page(&self, path: &Path, page: u32, out_dir: &Path) -> Result<DynamicImage> {
        let page_str = page.to_string();
        let dpi_str = self.dpi.to_string();

        let status = Command::new(&self.command)
            .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(path)
            .arg(out_dir.join("page"))
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(s) => {
                return Err(PdfError::Rasterize {
                    page,
                    reason: format!("{} exited with {}", self.command.display(), s),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PdfError::ToolNotAvailable(format!(
                    "{} not found (install poppler-utils)",
                    self.command.display()
                )));
            }
            Err(e) => {
                return Err(PdfError::Rasterize {
                    page,
                    reason: e.to_string(),
                });
            }
        }

        let image_path = find_page_image(out_dir, page).ok_or_else(|| PdfError::Rasterize {
            page,
            reason: "no image produced".to_string(),
        })?;

        image::open(&image_path).map_err(|e| PdfError::Rasterize {
            page,
            reason: e.to_string(),
        })
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, path: &Path) -> Result<Vec<DynamicImage>> {
        let page_count = inspect(path)?;
        let pages = self.pages_to_render(page_count);
        info!(
            "Rendering {} of {} pages from {} at {} DPI",
            pages,
            page_count,
            path.display(),
            self.dpi
        );

        let scratch = tempfile::tempdir().map_err(|e| PdfError::Rasterize {
            page: 1,
            reason: format!("failed to create scratch dir: {}", e),
        })?;

        let mut images = Vec::with_capacity(pages as usize);
        for page in 1..=pages {
            images.push(self.render_page(path, page, scratch.path())?);
            debug!("Rendered page {}/{}", page, pages);
        }
        Ok(images)
    }
}

/// pdftoppm zero-pads the page number to the width of the page count.
fn find_page_image(dir: &Path, page: u32) -> Option<PathBuf> {
    [1, 2, 3, 4, 5]
        .iter()
        .map(|digits| dir.join(format!("page-{:0width$}.png", page, width = digits)))
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Object};
    use tempfile::TempDir;

    fn write_pdf(dir: &TempDir, pages: usize) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.path().join("doc.pdf");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_inspect_counts_pages() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, 3);
        assert_eq!(inspect(&path).unwrap(), 3);
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();
        assert!(matches!(inspect(&path), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_pages_to_render() {
        let all = PdftoppmRasterizer::new();
        assert_eq!(all.pages_to_render(7), 7);

        let capped = PdftoppmRasterizer::from_config(&PdfConfig {
            max_pages: 2,
            ..Default::default()
        });
        assert_eq!(capped.pages_to_render(7), 2);
        assert_eq!(capped.pages_to_render(1), 1);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_page_cap_above_u32_range() {
        // 2^32 would wrap to 0 with a plain cast.
        let huge = PdftoppmRasterizer::from_config(&PdfConfig {
            max_pages: u32::MAX as usize + 1,
            ..Default::default()
        });
        assert_eq!(huge.pages_to_render(7), 7);

        let max = PdftoppmRasterizer::from_config(&PdfConfig {
            max_pages: usize::MAX,
            ..Default::default()
        });
        assert_eq!(max.pages_to_render(7), 7);
    }

    #[test]
    fn test_missing_tool() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, 1);
        let rasterizer = PdftoppmRasterizer::from_config(&PdfConfig {
            pdftoppm_cmd: PathBuf::from("/nonexistent/docsift-pdftoppm"),
            ..Default::default()
        });
        assert!(matches!(
            rasterizer.rasterize(&path),
            Err(PdfError::ToolNotAvailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_reports_page() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, 2);
        let rasterizer = PdftoppmRasterizer::from_config(&PdfConfig {
            pdftoppm_cmd: PathBuf::from("false"),
            ..Default::default()
        });
        assert!(matches!(
            rasterizer.rasterize(&path),
            Err(PdfError::Rasterize { page: 1, .. })
        ));
    }

    #[test]
    fn test_find_page_image_padding() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_page_image(dir.path(), 3), None);

        std::fs::write(dir.path().join("page-003.png"), b"").unwrap();
        assert_eq!(
            find_page_image(dir.path(), 3),
            Some(dir.path().join("page-003.png"))
        );
    }
}
