use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::params::{
    ColorMode, ConversionParameters, CurveMode, Hierarchical, SEGMENT_LENGTH_RANGE,
};
use crate::service::settings::SETTINGS_FILE;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "pic_to_svg",
    about = "批次將圖片轉換為 SVG 向量圖",
    long_about = "呼叫外部 vtracer 程式，將資料夾中的 jpg/jpeg/png/bmp/gif/webp 圖片逐一轉換為 SVG。\n未提供任何參數時進入互動模式。未指定的輸入、輸出與開關沿用上次保存的設定。\n使用 `--help` 查看詳細用法。"
)]
pub struct Cli {
    /// 輸入資料夾
    pub input: Option<String>,
    /// 輸出資料夾（預設為輸入資料夾下的 output）
    #[arg(short, long)]
    pub output: Option<String>,
    /// 處理子資料夾中的圖片
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub subdirs: Option<bool>,
    /// 轉換成功後刪除原檔
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub delete: Option<bool>,
    /// 快速預設：default、bw、poster、photo
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(long)]
    pub colormode: Option<ColorMode>,
    #[arg(long)]
    pub hierarchical: Option<Hierarchical>,
    #[arg(long)]
    pub mode: Option<CurveMode>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=16))]
    pub filter_speckle: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8))]
    pub color_precision: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=64))]
    pub gradient_step: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=180))]
    pub corner_threshold: Option<u32>,
    #[arg(long, value_parser = parse_segment_length)]
    pub segment_length: Option<f64>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=180))]
    pub splice_threshold: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub path_precision: Option<u32>,
    /// vtracer 執行檔路徑（預設為本程式所在目錄）
    #[arg(long)]
    pub converter: Option<PathBuf>,
    /// 設定檔路徑
    #[arg(long, default_value = SETTINGS_FILE)]
    pub config: PathBuf,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    /// 列出內建預設後結束
    #[arg(long, default_value_t = false)]
    pub list_presets: bool,
}

impl Cli {
    /// 以個別指定的參數覆寫預設值
    pub fn apply_overrides(&self, params: &mut ConversionParameters) {
        if let Some(v) = self.colormode {
            params.color_mode = v;
        }
        if let Some(v) = self.hierarchical {
            params.hierarchical = v;
        }
        if let Some(v) = self.mode {
            params.curve_mode = v;
        }
        if let Some(v) = self.filter_speckle {
            params.filter_speckle = v;
        }
        if let Some(v) = self.color_precision {
            params.color_precision = v;
        }
        if let Some(v) = self.gradient_step {
            params.gradient_step = v;
        }
        if let Some(v) = self.corner_threshold {
            params.corner_threshold = v;
        }
        if let Some(v) = self.segment_length {
            params.segment_length = v;
        }
        if let Some(v) = self.splice_threshold {
            params.splice_threshold = v;
        }
        if let Some(v) = self.path_precision {
            params.path_precision = v;
        }
    }
}

pub fn parse_segment_length(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("無效的數值: {}", s))?;
    if SEGMENT_LENGTH_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "segment_length 必須介於 {} 與 {} 之間",
            SEGMENT_LENGTH_RANGE.start(),
            SEGMENT_LENGTH_RANGE.end()
        ))
    }
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.is_dir() {
        log::error!("輸入資料夾不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入資料夾 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_overrides() {
        let cli = Cli::try_parse_from([
            "pic_to_svg",
            "pics",
            "--subdirs",
            "--colormode",
            "bw",
            "--mode",
            "pixel",
            "--filter-speckle",
            "10",
            "--segment-length",
            "7.5",
        ])
        .unwrap();
        assert_eq!(cli.input.as_deref(), Some("pics"));
        assert_eq!(cli.subdirs, Some(true));
        assert_eq!(cli.delete, None);

        let mut params = ConversionParameters::default();
        cli.apply_overrides(&mut params);
        assert_eq!(params.color_mode, ColorMode::Bw);
        assert_eq!(params.curve_mode, CurveMode::Pixel);
        assert_eq!(params.filter_speckle, 10);
        assert_eq!(params.segment_length, 7.5);
        assert_eq!(params.path_precision, 8);
    }

    #[test]
    fn out_of_range_flags_fail_to_parse() {
        assert!(Cli::try_parse_from(["pic_to_svg", "--filter-speckle", "17"]).is_err());
        assert!(Cli::try_parse_from(["pic_to_svg", "--segment-length", "2"]).is_err());
        assert!(Cli::try_parse_from(["pic_to_svg", "--path-precision", "0"]).is_err());
    }

    #[test]
    fn explicit_false_is_kept() {
        let cli = Cli::try_parse_from(["pic_to_svg", "--delete=false"]).unwrap();
        assert_eq!(cli.delete, Some(false));
    }
}
