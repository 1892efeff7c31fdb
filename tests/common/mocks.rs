use async_trait::async_trait;
use realesrgan_web::{Error, Result, upscaler::Upscaler};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A single recorded invocation of the mock upscaler
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_existed: bool,
    pub input_bytes: Vec<u8>,
}

/// Mock upscaler for testing
///
/// Records every invocation and, on success, writes a fake output file
/// the way the real external tool would.
#[derive(Debug, Clone)]
pub struct MockUpscaler {
    pub calls: Arc<Mutex<Vec<RecordedCall>>>,
    pub error: Option<String>,
    pub output_bytes: Option<Vec<u8>>,
}

impl MockUpscaler {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            error: None,
            output_bytes: Some(b"upscaled image bytes".to_vec()),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Report success without writing the output file
    pub fn without_output(mut self) -> Self {
        self.output_bytes = None;
        self
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upscaler for MockUpscaler {
    async fn upscale(&self, input: &Path, output: &Path) -> Result<()> {
        let input_bytes = tokio::fs::read(input).await.unwrap_or_default();

        self.calls.lock().unwrap().push(RecordedCall {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_existed: input.exists(),
            input_bytes,
        });

        if let Some(ref error) = self.error {
            return Err(Error::upscaler(error.clone()));
        }

        if let Some(ref bytes) = self.output_bytes {
            tokio::fs::write(output, bytes).await?;
        }

        Ok(())
    }
}

impl Default for MockUpscaler {
    fn default() -> Self {
        Self::new()
    }
}
