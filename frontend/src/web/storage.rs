//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`，提供简洁的本地存储接口。

use autofleet_hub::{DurableStorage, PrefsError, PrefsResult};

/// 本地存储操作封装
///
/// 静态方法用于零散读取（如令牌），`DurableStorage` 实现交给偏好存储使用。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    fn require() -> PrefsResult<web_sys::Storage> {
        Self::storage().ok_or_else(|| PrefsError::storage("localStorage 不可用"))
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }
}

impl DurableStorage for LocalStorage {
    fn read(&self, key: &str) -> PrefsResult<Option<String>> {
        Self::require()?
            .get_item(key)
            .map_err(|e| {
                PrefsError::storage(format!("读取失败: {:?}", e)).in_op_with("storage.read", key)
            })
    }

    fn write(&self, key: &str, value: &str) -> PrefsResult<()> {
        // 配额超限等情况会在这里抛出
        Self::require()?
            .set_item(key, value)
            .map_err(|e| {
                PrefsError::storage(format!("写入失败: {:?}", e)).in_op_with("storage.write", key)
            })
    }

    fn remove(&self, key: &str) -> PrefsResult<()> {
        Self::require()?
            .remove_item(key)
            .map_err(|e| {
                PrefsError::storage(format!("删除失败: {:?}", e)).in_op_with("storage.remove", key)
            })
    }
}
