//! HTML to PDF rendering via the `wkhtmltopdf` binary.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use util::config;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{bin} exited with {status}: {stderr}")]
    Render {
        bin: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Renders an HTML document to a Letter-size PDF. The HTML is piped over
/// stdin and the PDF read back from stdout, so nothing touches disk.
pub async fn html_to_pdf(html: &str) -> Result<Vec<u8>, PdfError> {
    let bin = config::wkhtmltopdf_bin();

    let spawn_err = |source| PdfError::Spawn {
        bin: bin.clone(),
        source,
    };

    let mut child = Command::new(&bin)
        .arg("--quiet")
        .arg("--page-size")
        .arg("Letter")
        .arg("--encoding")
        .arg("utf-8")
        .arg("-")
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(html.as_bytes()).await.map_err(spawn_err)?;
    }

    let output = child.wait_with_output().await.map_err(spawn_err)?;
    if !output.status.success() {
        return Err(PdfError::Render {
            bin,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}
