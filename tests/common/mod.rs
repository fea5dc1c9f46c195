#![allow(dead_code)]

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use pic_to_svg::models::job::BatchJob;
use pic_to_svg::models::params::ConversionParameters;
use pic_to_svg::service::converter::ConvertOutput;
use pic_to_svg::service::dispatcher::{BatchDispatcher, DispatchEvent};
use pic_to_svg::service::traits::i_service::ConverterTrait;

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"x").unwrap();
}

pub fn arg_os_value(args: &[OsString], flag: &str) -> Option<OsString> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

pub fn arg_value(args: &[OsString], flag: &str) -> Option<String> {
    arg_os_value(args, flag).map(|v| v.to_string_lossy().into_owned())
}

fn ok_output() -> ConvertOutput {
    ConvertOutput {
        code: Some(0),
        stdout: String::new(),
        stderr: String::new(),
    }
}

/// 記錄每次呼叫，並在 --output 寫出空白 SVG
///
/// 輸入檔不存在時以結束碼 2 失敗，與真正的 vtracer 相同
pub struct RecordingConverter {
    calls: Mutex<Vec<Vec<OsString>>>,
    fail_names: Vec<String>,
    error_names: Vec<String>,
    removes_input: bool,
    available: bool,
}

impl RecordingConverter {
    pub fn new() -> Self {
        RecordingConverter {
            calls: Mutex::new(Vec::new()),
            fail_names: Vec::new(),
            error_names: Vec::new(),
            removes_input: false,
            available: true,
        }
    }

    pub fn failing_on(names: &[&str]) -> Self {
        RecordingConverter {
            fail_names: names.iter().map(|n| n.to_string()).collect(),
            ..RecordingConverter::new()
        }
    }

    /// 對指定檔名回傳 IO 錯誤，模擬程式無法啟動
    pub fn erroring_on(names: &[&str]) -> Self {
        RecordingConverter {
            error_names: names.iter().map(|n| n.to_string()).collect(),
            ..RecordingConverter::new()
        }
    }

    /// 轉換成功前自行刪掉輸入檔
    pub fn removing_input() -> Self {
        RecordingConverter {
            removes_input: true,
            ..RecordingConverter::new()
        }
    }

    pub fn unavailable() -> Self {
        RecordingConverter {
            available: false,
            ..RecordingConverter::new()
        }
    }

    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<PathBuf> {
        self.calls()
            .iter()
            .filter_map(|args| arg_os_value(args, "--input"))
            .map(PathBuf::from)
            .collect()
    }
}

impl ConverterTrait for RecordingConverter {
    fn is_available(&self) -> bool {
        self.available
    }

    fn program(&self) -> &Path {
        Path::new("fake-vtracer")
    }

    fn convert(&self, args: &[OsString]) -> io::Result<ConvertOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        let input = PathBuf::from(arg_os_value(args, "--input").unwrap_or_default());
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.error_names.contains(&name) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "simulated spawn failure"));
        }
        if self.fail_names.contains(&name) || !input.is_file() {
            return Ok(ConvertOutput {
                code: Some(if input.is_file() { 1 } else { 2 }),
                stdout: String::new(),
                stderr: "simulated failure".to_string(),
            });
        }
        if let Some(output) = arg_os_value(args, "--output") {
            fs::write(output, "<svg/>")?;
        }
        if self.removes_input {
            fs::remove_file(&input)?;
        }
        Ok(ok_output())
    }
}

/// 每次轉換先通知 `entered`，再等待 `gate` 放行；gate 關閉後直接放行
pub struct GatedConverter {
    entered: Mutex<Sender<()>>,
    gate: Mutex<Receiver<()>>,
}

impl GatedConverter {
    pub fn new(entered: Sender<()>, gate: Receiver<()>) -> Self {
        GatedConverter {
            entered: Mutex::new(entered),
            gate: Mutex::new(gate),
        }
    }
}

impl ConverterTrait for GatedConverter {
    fn is_available(&self) -> bool {
        true
    }

    fn program(&self) -> &Path {
        Path::new("gated-vtracer")
    }

    fn convert(&self, _args: &[OsString]) -> io::Result<ConvertOutput> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self.gate.lock().unwrap().recv();
        Ok(ok_output())
    }
}

pub fn job(input: &Path, output: &Path, recurse: bool, delete_original: bool) -> BatchJob {
    BatchJob {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        recurse,
        delete_original,
        params: ConversionParameters::default(),
    }
}

/// 收集事件直到 Finished
pub fn run_to_finish(dispatcher: &mut BatchDispatcher) -> Vec<DispatchEvent> {
    let mut events = Vec::new();
    for _ in 0..200 {
        if let Some(event) = dispatcher.next_event_timeout(Duration::from_millis(50)) {
            let done = matches!(event, DispatchEvent::Finished(_));
            events.push(event);
            if done {
                return events;
            }
        }
    }
    panic!("batch did not finish, events so far: {:?}", events);
}

pub fn summary_of(events: &[DispatchEvent]) -> pic_to_svg::models::job::JobSummary {
    events
        .iter()
        .find_map(|e| match e {
            DispatchEvent::Finished(summary) => Some(summary.clone()),
            _ => None,
        })
        .expect("finished event")
}
