use super::{ToolError, run_command};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use thiserror::Error;

/// Compute backend handed to the minimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Cpu,
    Cuda,
    OpenCl,
}

#[derive(Debug, Error)]
#[error("Unknown platform '{0}'; expected CPU, CUDA, or OpenCL")]
pub struct ParsePlatformError(String);

impl FromStr for Platform {
    type Err = ParsePlatformError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Platform::Cpu),
            "cuda" => Ok(Platform::Cuda),
            "opencl" => Ok(Platform::OpenCl),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Platform::Cpu => "CPU",
                Platform::Cuda => "CUDA",
                Platform::OpenCl => "OpenCL",
            }
        )
    }
}

/// Invocation settings for the external energy minimizer.
///
/// The minimizer's force field and integrator settings are its own fixed
/// constants; the pipeline contract is just structure file in, relaxed
/// structure file out, on the requested platform.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerSettings {
    pub exe: PathBuf,
    pub platform: Platform,
}

impl Default for MinimizerSettings {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("openmm-minimize"),
            platform: Platform::Cpu,
        }
    }
}

impl MinimizerSettings {
    pub fn minimize(&self, input: &Path, output: &Path) -> Result<(), ToolError> {
        let mut command = Command::new(&self.exe);
        command
            .arg("--input")
            .arg(input)
            .arg("--output")
            .arg(output)
            .arg("--platform")
            .arg(self.platform.to_string());
        run_command(&mut command, &self.exe.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("cpu".parse::<Platform>().unwrap(), Platform::Cpu);
        assert_eq!("CUDA".parse::<Platform>().unwrap(), Platform::Cuda);
        assert_eq!("OpenCL".parse::<Platform>().unwrap(), Platform::OpenCl);
        assert!("tpu".parse::<Platform>().is_err());
    }

    #[test]
    fn platform_display_round_trips() {
        for platform in [Platform::Cpu, Platform::Cuda, Platform::OpenCl] {
            assert_eq!(
                platform.to_string().parse::<Platform>().unwrap(),
                platform
            );
        }
    }

    #[test]
    fn missing_minimizer_binary_maps_to_launch_error() {
        let settings = MinimizerSettings {
            exe: PathBuf::from("definitely-not-a-real-binary-7c2a"),
            platform: Platform::Cpu,
        };
        let err = settings
            .minimize(Path::new("in.pdb"), Path::new("out.pdb"))
            .unwrap_err();
        assert!(matches!(err, ToolError::Launch { .. }));
    }
}
