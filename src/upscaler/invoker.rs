use crate::{Error, Result, config::UpscalerConfig};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{error, info};

#[async_trait]
pub trait Upscaler: Send + Sync {
    async fn upscale(&self, input: &Path, output: &Path) -> Result<()>;
}

pub struct RealEsrgan {
    executable: PathBuf,
    base_dir: PathBuf,
    model: String,
    tile_size: u32,
    jobs: String,
}

impl RealEsrgan {
    pub fn new(config: UpscalerConfig, base_dir: PathBuf) -> Self {
        let executable = config.executable_path(&base_dir);

        Self {
            executable,
            base_dir,
            model: config.model,
            tile_size: config.tile_size,
            jobs: config.jobs,
        }
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-i".to_string(),
            input.display().to_string(),
            "-o".to_string(),
            output.display().to_string(),
            "-n".to_string(),
            self.model.clone(),
            "-t".to_string(),
            self.tile_size.to_string(),
            "-j".to_string(),
            self.jobs.clone(),
        ]
    }
}

#[async_trait]
impl Upscaler for RealEsrgan {
    async fn upscale(&self, input: &Path, output: &Path) -> Result<()> {
        if !self.executable.exists() {
            return Err(Error::upscaler(format!(
                "executable not found: {}",
                self.executable.display()
            )));
        }

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::upscaler(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let args = self.build_args(input, output);
        info!(
            "Running command: {} {}",
            self.executable.display(),
            args.join(" ")
        );

        let process_output = Command::new(&self.executable)
            .args(&args)
            .current_dir(&self.base_dir)
            .output()
            .await
            .map_err(|e| {
                Error::upscaler(format!(
                    "Failed to run {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !process_output.status.success() {
            let detail = failure_detail(&process_output);
            error!("Upscaler failed: {}", detail);
            return Err(Error::Upscaler(detail));
        }

        Ok(())
    }
}

fn failure_detail(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        return stderr.into_owned();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
        return stdout.into_owned();
    }

    "unknown error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_upscaler() -> RealEsrgan {
        RealEsrgan::new(UpscalerConfig::default(), PathBuf::from("/srv/app"))
    }

    #[cfg(unix)]
    fn fake_output(code: i32, stdout: &str, stderr: &str) -> std::process::Output {
        use std::os::unix::process::ExitStatusExt;

        std::process::Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_executable_resolved_under_base_dir() {
        let upscaler = create_test_upscaler();

        assert_eq!(
            upscaler.executable,
            PathBuf::from("/srv/app/realesrgan-ncnn-vulkan")
        );
        assert_eq!(upscaler.base_dir, PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_build_args_order() {
        let upscaler = create_test_upscaler();
        let args = upscaler.build_args(Path::new("temp/in.jpg"), Path::new("results/out.jpg"));

        assert_eq!(
            args,
            vec![
                "-i",
                "temp/in.jpg",
                "-o",
                "results/out.jpg",
                "-n",
                "realesrgan-x4plus",
                "-t",
                "256",
                "-j",
                "1:1:1",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_detail_prefers_stderr() {
        let output = fake_output(1, "some stdout", "vulkan device not found");
        assert_eq!(failure_detail(&output), "vulkan device not found");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_detail_falls_back_to_stdout() {
        let output = fake_output(1, "decode failed", "");
        assert_eq!(failure_detail(&output), "decode failed");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_detail_when_silent() {
        let output = fake_output(1, "", "");
        assert_eq!(failure_detail(&output), "unknown error");
    }
}
