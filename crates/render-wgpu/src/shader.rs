use crate::shaders;
use std::path::{Path, PathBuf};

/// Errors from reading, compiling or linking a shader.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader compilation failed ({label}):\n{log}")]
    Compile { label: String, log: String },
    #[error("shader program linking failed ({label}):\n{log}")]
    Link { label: String, log: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One compiler message, detached from wgpu so it can be formatted and tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based line and column, when the compiler reports a location.
    pub location: Option<(u32, u32)>,
    pub message: String,
}

impl From<&wgpu::CompilationMessage> for Diagnostic {
    fn from(msg: &wgpu::CompilationMessage) -> Self {
        Self {
            severity: match msg.message_type {
                wgpu::CompilationMessageType::Error => Severity::Error,
                wgpu::CompilationMessageType::Warning => Severity::Warning,
                wgpu::CompilationMessageType::Info => Severity::Info,
            },
            location: msg.location.as_ref().map(|l| (l.line_number, l.line_position)),
            message: msg.message.clone(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        match self.location {
            Some((line, col)) => write!(f, "{kind} at {line}:{col}: {}", self.message),
            None => write!(f, "{kind}: {}", self.message),
        }
    }
}

/// Info log of the error-level diagnostics, one per line.
pub fn error_log(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A compiled WGSL module.
pub struct Shader {
    pub module: wgpu::ShaderModule,
    pub label: String,
}

impl Shader {
    /// The lit-model shader compiled into the binary.
    pub fn builtin(device: &wgpu::Device) -> Result<Self, ShaderError> {
        Self::from_source(device, "lit_shader", shaders::LIT_SHADER)
    }

    pub fn from_file(device: &wgpu::Device, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = read_source(path)?;
        Self::from_source(device, &path.display().to_string(), &source)
    }

    /// Compile WGSL and check the result; the compiler's messages are the
    /// info log of a failed compile.
    pub fn from_source(
        device: &wgpu::Device,
        label: &str,
        source: &str,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let info = pollster::block_on(module.get_compilation_info());
        let scoped = pollster::block_on(device.pop_error_scope());

        let diagnostics: Vec<Diagnostic> = info.messages.iter().map(Diagnostic::from).collect();
        for warning in diagnostics.iter().filter(|d| d.severity == Severity::Warning) {
            tracing::warn!("shader {label}: {warning}");
        }

        let mut log = error_log(&diagnostics);
        if let Some(e) = scoped {
            if log.is_empty() {
                log = e.to_string();
            }
        }
        if !log.is_empty() {
            tracing::error!("ERROR::SHADER::COMPILATION_FAILED ({label})\n{log}");
            return Err(ShaderError::Compile {
                label: label.to_owned(),
                log,
            });
        }

        tracing::debug!("compiled shader {label}");
        Ok(Self {
            module,
            label: label.to_owned(),
        })
    }
}

/// Read WGSL source from disk.
pub fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| {
        tracing::error!("failed to read shader file {}: {source}", path.display());
        ShaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Create a render pipeline, reporting validation failures (bad entry points,
/// layout mismatches) as a link error instead of an uncaptured device error.
pub fn checked_pipeline(
    device: &wgpu::Device,
    descriptor: &wgpu::RenderPipelineDescriptor,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(descriptor);
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(pipeline),
        Some(e) => {
            let label = descriptor.label.unwrap_or("pipeline").to_owned();
            let log = e.to_string();
            tracing::error!("ERROR::SHADER::PROGRAM::LINKING_FAILED ({label})\n{log}");
            Err(ShaderError::Link { label, log })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(severity: Severity, location: Option<(u32, u32)>, message: &str) -> Diagnostic {
        Diagnostic {
            severity,
            location,
            message: message.into(),
        }
    }

    #[test]
    fn diagnostic_display_with_location() {
        let d = diag(Severity::Error, Some((12, 5)), "unknown identifier `foo`");
        assert_eq!(d.to_string(), "error at 12:5: unknown identifier `foo`");
    }

    #[test]
    fn diagnostic_display_without_location() {
        let d = diag(Severity::Warning, None, "unused variable");
        assert_eq!(d.to_string(), "warning: unused variable");
    }

    #[test]
    fn error_log_keeps_only_errors() {
        let log = error_log(&[
            diag(Severity::Warning, None, "w"),
            diag(Severity::Error, Some((1, 1)), "first"),
            diag(Severity::Info, None, "i"),
            diag(Severity::Error, None, "second"),
        ]);
        assert_eq!(log, "error at 1:1: first\nerror: second");
    }

    #[test]
    fn error_log_empty_when_clean() {
        assert!(error_log(&[diag(Severity::Info, None, "ok")]).is_empty());
    }

    #[test]
    fn missing_shader_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.wgsl");
        let err = read_source(&path).unwrap_err();
        match &err {
            ShaderError::Io { path: reported, source } => {
                assert_eq!(reported, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(err.to_string().contains("missing.wgsl"));
    }

    #[test]
    fn reads_shader_source_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("lit.wgsl");
        std::fs::write(&path, shaders::LIT_SHADER).unwrap();
        assert_eq!(read_source(&path).unwrap(), shaders::LIT_SHADER);
    }
}
