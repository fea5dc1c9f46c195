use dialoguer::{Confirm, Input, Select};
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::config::ports::{AppConfig, ConfigPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::ConversionOutput;
use crate::models::params::{
    ColorMode, ConversionParameters, CurveMode, Hierarchical, COLOR_PRECISION_RANGE,
    CORNER_THRESHOLD_RANGE, FILTER_SPECKLE_RANGE, GRADIENT_STEP_RANGE, PATH_PRECISION_RANGE,
    SEGMENT_LENGTH_RANGE, SPLICE_THRESHOLD_RANGE,
};
use crate::models::preset::{builtin_presets, Preset};
use crate::service::config_service::{default_output_dir, DefaultConfigAdapter};
use crate::service::converter::locate_converter;
use crate::service::settings::{PersistedSettings, SettingsStore, SETTINGS_FILE};
use crate::utils::utils::setup_logging;

fn prompt_error(what: &str, e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}失敗: {}", what, e))
}

pub fn process_interactive_mode() -> io::Result<ConversionOutput> {
    setup_logging("info")?;
    println!("=== PicToSvg 圖片批量轉矢量工具 ===");

    let settings = SettingsStore::new(SETTINGS_FILE).load();
    let converter = locate_converter(None);
    let use_saved = get_default_config_option(&settings)?;

    let config_port: Box<dyn ConfigPort> = if use_saved {
        println!("沿用上次設定：{} -> {}，預設參數", settings.input, settings.output);
        Box::new(DefaultConfigAdapter::new(settings, converter, PathBuf::from(SETTINGS_FILE)))
    } else {
        Box::new(InteractiveConfigAdapter::new(settings, converter))
    };

    let facade = ConversionFacade::new(config_port);
    facade.execute_conversion()
}

pub fn get_default_config_option(settings: &PersistedSettings) -> io::Result<bool> {
    if settings.input.is_empty() || !Path::new(&settings.input).is_dir() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(format!(
            "是否沿用上次的設定？（輸入：{}，輸出：{}，預設參數）",
            settings.input, settings.output
        ))
        .default(true)
        .interact()
        .map_err(|e| prompt_error("設定選擇", e))
}

pub fn get_input_path(saved: &str) -> io::Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt("輸入資料夾")
        .validate_with(|input: &String| -> Result<(), String> {
            if Path::new(input).is_dir() { Ok(()) } else { Err(format!("資料夾 '{}' 不存在", input)) }
        });
    if !saved.is_empty() {
        input = input.default(saved.to_string());
    }
    input.interact_text().map_err(|e| prompt_error("輸入資料夾", e))
}

pub fn get_output_path(input: &str, saved: &str, saved_input: &str) -> io::Result<String> {
    let default = if !saved.is_empty() && input == saved_input {
        saved.to_string()
    } else {
        default_output_dir(input)
    };
    Input::<String>::new()
        .with_prompt("輸出資料夾")
        .default(default)
        .interact_text()
        .map_err(|e| prompt_error("輸出資料夾", e))
}

pub fn get_switches(settings: &PersistedSettings) -> io::Result<(bool, bool)> {
    let subdirs = Confirm::new()
        .with_prompt("處理子資料夾中的圖片？")
        .default(settings.subdirs)
        .interact()
        .map_err(|e| prompt_error("子資料夾選項", e))?;
    let delete = Confirm::new()
        .with_prompt("轉換成功後刪除原檔？")
        .default(settings.delete)
        .interact()
        .map_err(|e| prompt_error("刪除選項", e))?;
    Ok((subdirs, delete))
}

pub fn get_preset() -> io::Result<Preset> {
    let presets = builtin_presets();
    let labels: Vec<&str> = presets.iter().map(|p| p.label).collect();
    let index = Select::new()
        .with_prompt("快速預設（使用方向鍵選擇，按 Enter 確認）")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| prompt_error("預設選擇", e))?;
    Ok(presets[index].clone())
}

fn prompt_u32(prompt: &str, current: u32, range: RangeInclusive<u32>) -> io::Result<u32> {
    let (lo, hi) = (*range.start(), *range.end());
    Input::<u32>::new()
        .with_prompt(format!("{}（{}-{}）", prompt, lo, hi))
        .default(current)
        .validate_with(move |v: &u32| -> Result<(), String> {
            if range.contains(v) { Ok(()) } else { Err(format!("必須介於 {} 與 {} 之間", lo, hi)) }
        })
        .interact_text()
        .map_err(|e| prompt_error(prompt, e))
}

fn prompt_f64(prompt: &str, current: f64, range: RangeInclusive<f64>) -> io::Result<f64> {
    let (lo, hi) = (*range.start(), *range.end());
    Input::<f64>::new()
        .with_prompt(format!("{}（{}-{}）", prompt, lo, hi))
        .default(current)
        .validate_with(move |v: &f64| -> Result<(), String> {
            if range.contains(v) { Ok(()) } else { Err(format!("必須介於 {} 與 {} 之間", lo, hi)) }
        })
        .interact_text()
        .map_err(|e| prompt_error(prompt, e))
}

/// 逐項調整參數，只詢問在目前顏色與擬合模式下有作用的項目
pub fn customize_params(params: &mut ConversionParameters) -> io::Result<()> {
    let color_index = Select::new()
        .with_prompt("顏色模式")
        .items(&["Color", "BW"])
        .default(if params.is_color() { 0 } else { 1 })
        .interact()
        .map_err(|e| prompt_error("顏色模式", e))?;
    params.color_mode = if color_index == 0 { ColorMode::Color } else { ColorMode::Bw };

    let modes = [CurveMode::Spline, CurveMode::Polygon, CurveMode::Pixel];
    let mode_index = Select::new()
        .with_prompt("擬合模式")
        .items(&["Spline", "Polygon", "Pixel"])
        .default(modes.iter().position(|m| *m == params.curve_mode).unwrap_or(0))
        .interact()
        .map_err(|e| prompt_error("擬合模式", e))?;
    params.curve_mode = modes[mode_index];

    params.filter_speckle = prompt_u32("去噪強度", params.filter_speckle, FILTER_SPECKLE_RANGE)?;

    let states = params.states();
    if states.color_precision {
        params.color_precision = prompt_u32("色彩精度", params.color_precision, COLOR_PRECISION_RANGE)?;
    }
    if states.gradient_step {
        params.gradient_step = prompt_u32("梯度步長", params.gradient_step, GRADIENT_STEP_RANGE)?;
    }
    if states.hierarchical {
        let stacked = Select::new()
            .with_prompt("堆疊方式")
            .items(&["Stacked", "Cutout"])
            .default(if params.hierarchical == Hierarchical::Stacked { 0 } else { 1 })
            .interact()
            .map_err(|e| prompt_error("堆疊方式", e))?
            == 0;
        params.hierarchical = if stacked { Hierarchical::Stacked } else { Hierarchical::Cutout };
    }
    if states.corner_threshold {
        params.corner_threshold = prompt_u32("拐角閾值", params.corner_threshold, CORNER_THRESHOLD_RANGE)?;
    }
    if states.segment_length {
        params.segment_length = prompt_f64("線段長度", params.segment_length, SEGMENT_LENGTH_RANGE)?;
    }
    if states.splice_threshold {
        params.splice_threshold = prompt_u32("拼接閾值", params.splice_threshold, SPLICE_THRESHOLD_RANGE)?;
    }
    params.path_precision = prompt_u32("路徑精度", params.path_precision, PATH_PRECISION_RANGE)?;
    Ok(())
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    settings: PersistedSettings,
    converter: PathBuf,
}

impl InteractiveConfigAdapter {
    pub fn new(settings: PersistedSettings, converter: PathBuf) -> Self {
        InteractiveConfigAdapter { settings, converter }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let input = get_input_path(&self.settings.input)?;
        let output = get_output_path(&input, &self.settings.output, &self.settings.input)?;
        let (subdirs, delete) = get_switches(&self.settings)?;

        let preset = get_preset()?;
        let mut params = ConversionParameters::default();
        params.apply_preset(&preset);
        log::info!("已應用預設: {}", preset.label);

        let customize = Confirm::new()
            .with_prompt("是否逐項調整參數？")
            .default(false)
            .interact()
            .map_err(|e| prompt_error("參數調整選項", e))?;
        if customize {
            customize_params(&mut params)?;
        }

        Ok(AppConfig {
            input,
            output,
            subdirs,
            delete,
            preset: preset.name.to_string(),
            params,
            converter: self.converter.clone(),
            settings_path: PathBuf::from(SETTINGS_FILE),
            no_progress: false,
        })
    }
}
