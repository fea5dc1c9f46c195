use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::models::params::{format_float, ConversionParameters};
use crate::service::traits::i_service::ConverterTrait;

pub const EXECUTABLE_NAME: &str = if cfg!(windows) { "vtracer.exe" } else { "vtracer" };

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// 外部程式一次執行的結果
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ConvertOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// 組裝單一檔案的命令列參數
///
/// 只在條件成立時加入對應參數：
/// - 彩色模式才有 color_precision、gradient_step、hierarchical
/// - 非像素模式才有 corner_threshold、segment_length
/// - 樣條模式才有 splice_threshold
pub fn build_args(input: &Path, output: &Path, params: &ConversionParameters) -> Vec<OsString> {
    // 路徑原樣傳遞，非 UTF-8 檔名也不能被改寫
    let mut args = vec![
        OsString::from("--input"),
        input.as_os_str().to_os_string(),
        OsString::from("--output"),
        output.as_os_str().to_os_string(),
    ];
    push_flag(&mut args, "--colormode", params.color_mode.as_str());
    push_flag(&mut args, "--mode", params.curve_mode.as_str());
    push_flag(&mut args, "--filter_speckle", params.filter_speckle.to_string());
    push_flag(&mut args, "--path_precision", params.path_precision.to_string());
    if params.is_color() {
        push_flag(&mut args, "--color_precision", params.color_precision.to_string());
        push_flag(&mut args, "--gradient_step", params.gradient_step.to_string());
        push_flag(&mut args, "--hierarchical", params.hierarchical.as_str());
    }
    if params.uses_curves() {
        push_flag(&mut args, "--corner_threshold", params.corner_threshold.to_string());
        push_flag(&mut args, "--segment_length", format_float(params.segment_length));
    }
    if params.uses_splice() {
        push_flag(&mut args, "--splice_threshold", params.splice_threshold.to_string());
    }
    args
}

fn push_flag(args: &mut Vec<OsString>, flag: &str, value: impl Into<OsString>) {
    args.push(OsString::from(flag));
    args.push(value.into());
}

/// 找出外部程式路徑：指定路徑優先，否則為本程式所在目錄下的 vtracer
pub fn locate_converter(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(EXECUTABLE_NAME)
}

/// 以子行程執行 vtracer
pub struct ProcessConverter {
    program: PathBuf,
}

impl ProcessConverter {
    pub fn new(program: PathBuf) -> Self {
        ProcessConverter { program }
    }
}

impl ConverterTrait for ProcessConverter {
    fn is_available(&self) -> bool {
        self.program.is_file()
    }

    fn program(&self) -> &Path {
        &self.program
    }

    fn convert(&self, args: &[OsString]) -> io::Result<ConvertOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let output = cmd.output()?;
        let result = ConvertOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        if !result.stdout.trim().is_empty() {
            debug!("vtracer stdout：{}", result.stdout.trim());
        }
        if !result.stderr.trim().is_empty() {
            debug!("vtracer stderr：{}", result.stderr.trim());
        }
        Ok(result)
    }
}
