//! 渲染环境桥接
//!
//! 将当前主题与语言推送到全局展示状态（浏览器中为 `<html>` 的属性）。

use autofleet_shared::{Locale, PreferenceSet, TextDirection, Theme};

/// 需要同步到渲染环境的展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub theme: Theme,
    pub locale: Locale,
    pub direction: TextDirection,
}

impl Presentation {
    pub fn from_preferences(prefs: &PreferenceSet) -> Self {
        let locale = prefs.locale();
        Self {
            theme: prefs.theme(),
            locale,
            direction: locale.direction(),
        }
    }

    /// `lang` 属性值
    pub fn lang(&self) -> &'static str {
        self.locale.code()
    }
}

pub trait Environment {
    fn apply(&self, presentation: &Presentation);
}

/// 不做任何事的环境（无界面场景）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnvironment;

impl Environment for NoopEnvironment {
    fn apply(&self, _presentation: &Presentation) {}
}
