use std::io;
use crate::models::conversion::ConversionOutput;

// Facade 接口，負責協調批次轉換流程
pub trait ConversionFacadeTrait {
    /// 取得配置、啟動批次轉換並等待完成
    /// # 回傳
    /// - 成功時返回輸出目錄與執行摘要，前置條件不成立時返回 IO 錯誤
    fn execute_conversion(&self) -> io::Result<ConversionOutput>;
}
