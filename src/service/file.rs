use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use pathdiff::diff_paths;
use walkdir::WalkDir;

use crate::service::traits::i_service::FileServiceTrait;

pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// File 服務，依副檔名挑出圖片
pub struct FileService;

impl FileService {
    pub fn new() -> Self {
        FileService
    }
}

impl Default for FileService {
    fn default() -> Self {
        FileService::new()
    }
}

impl FileServiceTrait for FileService {
    fn collect_images(&self, input_dir: &Path, recurse: bool) -> io::Result<Vec<PathBuf>> {
        if recurse {
            collect_recursive(input_dir)
        } else {
            collect_flat(input_dir)
        }
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

// 只列出目錄本身的檔案，順序沿用 read_dir
fn collect_flat(input_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!("無法讀取目錄項目（{}）：{}", input_dir.display(), e);
                continue;
            }
        };
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

// 走訪整棵目錄樹，不排序
fn collect_recursive(input_dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入目錄 '{}' 不存在", input_dir.display()),
        ));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("略過無法存取的路徑：{}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_image_file(path) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// 相對於輸入目錄的路徑，僅用於顯示與鏡像子目錄
pub fn relative_path(file: &Path, input_dir: &Path) -> PathBuf {
    diff_paths(file, input_dir).unwrap_or_else(|| {
        file.file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf())
    })
}

/// 計算 SVG 輸出路徑
///
/// 遞迴模式保留相對子目錄，否則全部平放在輸出根目錄下。
pub fn output_path_for(file: &Path, input_dir: &Path, output_dir: &Path, recurse: bool) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default();
    let mut file_name = stem.to_os_string();
    file_name.push(".svg");

    let parent = if recurse {
        relative_path(file, input_dir)
            .parent()
            .map(|p| output_dir.join(p))
            .unwrap_or_else(|| output_dir.to_path_buf())
    } else {
        output_dir.to_path_buf()
    };
    parent.join(file_name)
}

/// 建立輸出目錄，已存在視為成功；失敗時僅記錄警告
pub fn ensure_dir(dir: &Path) -> bool {
    match fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            warn!("無法建立輸出目錄 {}：{}", dir.display(), e);
            false
        }
    }
}
