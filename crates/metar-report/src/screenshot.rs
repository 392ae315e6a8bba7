//! HTML to image capture.

use metar_core::{RenderConfig, RenderError};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use url::Url;

/// Turns an HTML document into an image file.
pub trait Screenshotter {
    fn capture(
        &self,
        html: &str,
        output: &Path,
    ) -> impl Future<Output = Result<(), RenderError>> + Send;
}

/// Screenshots through a Chromium-compatible browser in headless mode.
///
/// The HTML is written next to the output image and loaded via `file://`.
#[derive(Debug, Clone)]
pub struct HeadlessBrowser {
    browser: String,
    extra_args: Vec<String>,
    width: u32,
    height: u32,
}

impl HeadlessBrowser {
    pub fn new(browser: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            browser: browser.into(),
            extra_args: Vec::new(),
            width,
            height,
        }
    }

    pub fn from_config(render: &RenderConfig) -> Self {
        Self::new(&render.browser_path, render.viewport_width, render.viewport_height)
            .with_args(render.browser_args.clone())
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Arguments for one capture, after any configured extras.
    pub fn arguments(&self, page_url: &Url, output: &Path) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend([
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--hide-scrollbars".to_string(),
            format!("--window-size={},{}", self.width, self.height),
            format!("--screenshot={}", output.display()),
            page_url.to_string(),
        ]);
        args
    }

    fn capture_failed(message: impl std::fmt::Display) -> RenderError {
        RenderError::CaptureFailed(message.to_string())
    }
}

impl Screenshotter for HeadlessBrowser {
    async fn capture(&self, html: &str, output: &Path) -> Result<(), RenderError> {
        let output = std::path::absolute(output).map_err(Self::capture_failed)?;
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(Self::capture_failed)?;
        }

        let page: PathBuf = output.with_extension("html");
        tokio::fs::write(&page, html)
            .await
            .map_err(Self::capture_failed)?;
        let page_url = Url::from_file_path(&page)
            .map_err(|_| Self::capture_failed(format!("not a file path: {}", page.display())))?;

        tracing::info!("Capturing report with {} to {}", self.browser, output.display());
        let result = Command::new(&self.browser)
            .args(self.arguments(&page_url, &output))
            .kill_on_drop(true)
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&page).await {
            tracing::debug!("Could not remove {}: {}", page.display(), e);
        }

        let result = result.map_err(|e| RenderError::BrowserUnavailable {
            browser: self.browser.clone(),
            message: e.to_string(),
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Self::capture_failed(format!(
                "{} exited with {}: {}",
                self.browser,
                result.status,
                stderr.trim()
            )));
        }

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            return Err(Self::capture_failed(format!(
                "{} produced no image at {}",
                self.browser,
                output.display()
            )));
        }

        tracing::info!("Report image written to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    const FAKE_BROWSER: &str = r#"
for arg in "$@"; do
  case "$arg" in
    --screenshot=*) printf 'PNG' > "${arg#--screenshot=}" ;;
  esac
done
"#;

    fn sh_browser(dir: &Path, script: &str) -> HeadlessBrowser {
        let script_path = dir.join("browser.sh");
        std::fs::write(&script_path, script).unwrap();
        HeadlessBrowser::new("sh", 800, 600).with_args(vec![script_path.display().to_string()])
    }

    #[test]
    fn test_arguments() {
        let browser = HeadlessBrowser::new("chromium", 1600, 700).with_args(vec!["--no-sandbox".into()]);
        let url = Url::parse("file:///tmp/metar/report.html").unwrap();
        let args = browser.arguments(&url, Path::new("/tmp/metar/report.png"));

        assert_eq!(args.first().map(String::as_str), Some("--no-sandbox"));
        assert!(args.contains(&"--headless".to_string()));
        assert!(args.contains(&"--window-size=1600,700".to_string()));
        assert!(args.contains(&"--screenshot=/tmp/metar/report.png".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("file:///tmp/metar/report.html"));
    }

    #[test]
    fn test_from_config() {
        let browser = HeadlessBrowser::from_config(&RenderConfig::default());
        let url = Url::parse("file:///tmp/a.html").unwrap();
        let args = browser.arguments(&url, Path::new("/tmp/a.png"));
        assert!(args.contains(&"--window-size=1600,700".to_string()));
    }

    #[tokio::test]
    async fn test_missing_browser() {
        let dir = tempfile::tempdir().unwrap();
        let browser = HeadlessBrowser::new("/nonexistent/chromium-for-tests", 800, 600);

        let err = browser
            .capture("<html></html>", &dir.path().join("out.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::BrowserUnavailable { .. }));
        assert!(!dir.path().join("out.html").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_with_fake_browser() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("images").join("ZSPD.png");

        sh_browser(dir.path(), FAKE_BROWSER)
            .capture("<html><body>ZSPD</body></html>", &output)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "PNG");
        assert!(!output.with_extension("html").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_browser_failure_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let browser = sh_browser(dir.path(), "echo boom >&2; exit 3\n");

        let err = browser
            .capture("<html></html>", &dir.path().join("out.png"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, RenderError::CaptureFailed(ref msg) if msg.contains("boom")),
            "unexpected error: {:?}",
            err
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_browser_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let browser = sh_browser(dir.path(), "exit 0\n");

        let err = browser
            .capture("<html></html>", &dir.path().join("out.png"))
            .await
            .unwrap_err();

        assert!(matches!(err, RenderError::CaptureFailed(ref msg) if msg.contains("no image")));
    }
}
