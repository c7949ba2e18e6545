//! 本地持久化抽象
//!
//! 字符串键值存储，从调用方视角是同步的。浏览器中由 LocalStorage 实现。

use crate::error::PrefsResult;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait DurableStorage {
    /// 读取键对应的值，不存在时返回 `Ok(None)`
    fn read(&self, key: &str) -> PrefsResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> PrefsResult<()>;
    fn remove(&self, key: &str) -> PrefsResult<()>;
}

/// 内存存储
///
/// 克隆后共享同一份数据，可用于模拟 "刷新页面后重新加载"。
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一条记录
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> PrefsResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PrefsResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PrefsResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
