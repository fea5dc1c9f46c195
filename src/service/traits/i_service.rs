use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::service::converter::ConvertOutput;

// File 服務接口，負責找出可轉換的圖片
pub trait FileServiceTrait: Send + Sync {
    /// 收集輸入目錄中的圖片
    /// # 參數
    /// - input_dir: 輸入目錄
    /// - recurse: 是否包含子目錄
    /// # 回傳
    /// - 依檔案系統列舉順序排列的圖片路徑
    fn collect_images(&self, input_dir: &Path, recurse: bool) -> io::Result<Vec<PathBuf>>;
}

// 外部轉換程式接口
pub trait ConverterTrait: Send + Sync {
    /// 外部程式是否存在於預期位置
    fn is_available(&self) -> bool;

    /// 外部程式的路徑，用於錯誤訊息
    fn program(&self) -> &Path;

    /// 以給定參數同步執行一次轉換
    /// # 參數
    /// - args: 不含程式本身的命令列參數
    /// # 回傳
    /// - 程式結束時返回結束碼與輸出，無法啟動時返回 IO 錯誤
    fn convert(&self, args: &[OsString]) -> io::Result<ConvertOutput>;
}
