pub mod currency;
pub mod locale;
pub mod preference;
pub mod protocol;

pub use currency::CurrencyConfig;
pub use locale::{Locale, TextDirection};
pub use preference::{
    ChangeCategory, MeasurementUnits, NotificationSound, Preference, PreferenceKey, PreferenceSet,
    ProfileVisibility, Theme,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中保存整个偏好集合的命名空间键
pub const STORAGE_KEY_SETTINGS: &str = "autofleet_settings";
/// LocalStorage 中保存登录令牌的键（由外部认证流程写入）
pub const STORAGE_KEY_TOKEN: &str = "autofleet_token";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
