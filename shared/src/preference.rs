//! 偏好设置领域模型
//!
//! 所有偏好键在编译期固定，通过 `preference_schema!` 一次性生成：
//! - `PreferenceSet`: 每个键一个强类型字段的完整集合
//! - `PreferenceKey`: 键的闭合枚举
//! - `Preference`: 携带值的标签联合类型（键与值类型一一对应）
//!
//! 外部数据（本地缓存、远端响应）按 "schema-on-read" 方式合并：
//! 未知键忽略，类型不符的值忽略，缺失的键保持默认值。

use crate::currency::CurrencyConfig;
use crate::locale::Locale;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

macro_rules! preference_schema {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident => $field:ident: $ty:ty = $default:expr, $name:literal;
        )*
    ) => {
        /// 完整的偏好集合，始终包含所有键
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct PreferenceSet {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                pub $field: $ty,
            )*
        }

        impl Default for PreferenceSet {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        /// 偏好键
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PreferenceKey {
            $( $(#[$doc])* $variant, )*
        }

        impl PreferenceKey {
            /// 所有已知键（按声明顺序）
            pub const ALL: &'static [PreferenceKey] = &[ $( PreferenceKey::$variant, )* ];

            /// 线上名称（JSON 字段名）
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( PreferenceKey::$variant => $name, )*
                }
            }

            /// 从线上名称解析，未知名称返回 `None`
            pub fn parse(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(PreferenceKey::$variant), )*
                    _ => None,
                }
            }
        }

        /// 单个偏好值（带键）
        #[derive(Debug, Clone, PartialEq)]
        pub enum Preference {
            $( $variant($ty), )*
        }

        impl Preference {
            pub fn key(&self) -> PreferenceKey {
                match self {
                    $( Preference::$variant(_) => PreferenceKey::$variant, )*
                }
            }

            pub fn to_json(&self) -> Value {
                match self {
                    $( Preference::$variant(v) => Value::from(v.clone()), )*
                }
            }

            /// 按键的类型解析 JSON 值，类型不符返回 `None`
            pub fn from_json(key: PreferenceKey, value: &Value) -> Option<Self> {
                match key {
                    $(
                        PreferenceKey::$variant => <$ty>::deserialize(value)
                            .ok()
                            .map(Preference::$variant),
                    )*
                }
            }
        }

        impl PreferenceSet {
            pub fn get(&self, key: PreferenceKey) -> Preference {
                match key {
                    $( PreferenceKey::$variant => Preference::$variant(self.$field.clone()), )*
                }
            }

            pub fn set(&mut self, pref: Preference) {
                match pref {
                    $( Preference::$variant(v) => self.$field = v, )*
                }
            }
        }
    };
}

preference_schema! {
    /// 所属用户 ID
    UserId => user_id: String = String::new(), "userId";

    // --- 通知 ---
    EmailNotifications => email_notifications: bool = true, "emailNotifications";
    PushNotifications => push_notifications: bool = true, "pushNotifications";
    SmsNotifications => sms_notifications: bool = false, "smsNotifications";
    BookingReminders => booking_reminders: bool = true, "bookingReminders";
    PaymentAlerts => payment_alerts: bool = true, "paymentAlerts";
    PromotionalEmails => promotional_emails: bool = false, "promotionalEmails";
    WeeklyReports => weekly_reports: bool = false, "weeklyReports";

    // --- 外观 ---
    DarkMode => dark_mode: bool = false, "darkMode";
    /// 语言代码，取值不在支持列表时在使用处回退到默认语言
    Language => language: String = Locale::default().code().to_string(), "language";
    /// 货币代码，取值不在支持列表时在使用处回退到默认货币
    Currency => currency: String = CurrencyConfig::default_config().code.to_string(), "currency";
    Timezone => timezone: String = "UTC".to_string(), "timezone";
    MeasurementUnits => measurement_units: String = MeasurementUnits::default().as_str().to_string(), "measurementUnits";

    // --- 隐私 ---
    ProfileVisibility => profile_visibility: String = ProfileVisibility::default().as_str().to_string(), "profileVisibility";
    DataSharing => data_sharing: bool = false, "dataSharing";
    LocationTracking => location_tracking: bool = true, "locationTracking";
    AnalyticsOptOut => analytics_opt_out: bool = false, "analyticsOptOut";

    // --- 安全 ---
    TwoFactorAuth => two_factor_auth: bool = false, "twoFactorAuth";
    LoginAlerts => login_alerts: bool = true, "loginAlerts";
    /// 会话超时（分钟）
    SessionTimeout => session_timeout: u32 = 30, "sessionTimeout";

    // --- 声音 ---
    SoundEnabled => sound_enabled: bool = true, "soundEnabled";
    NotificationSound => notification_sound: String = NotificationSound::default().as_str().to_string(), "notificationSound";

    // --- 界面开关 ---
    ShowNavBar => show_nav_bar: bool = true, "showNavBar";
    ShowChatWidget => show_chat_widget: bool = true, "showChatWidget";
}

// =========================================================
// 变更分类 (Change Categories)
// =========================================================

/// 需要单独广播的变更分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCategory {
    Theme,
    Locale,
    Currency,
}

impl ChangeCategory {
    /// 对应的 DOM 事件名
    pub fn event_name(&self) -> &'static str {
        match self {
            ChangeCategory::Theme => "themeChange",
            ChangeCategory::Locale => "languageChange",
            ChangeCategory::Currency => "currencyChange",
        }
    }
}

impl PreferenceKey {
    /// 该键所属的广播分类，大多数键没有
    pub fn category(&self) -> Option<ChangeCategory> {
        match self {
            PreferenceKey::DarkMode => Some(ChangeCategory::Theme),
            PreferenceKey::Language => Some(ChangeCategory::Locale),
            PreferenceKey::Currency => Some(ChangeCategory::Currency),
            _ => None,
        }
    }

    /// 用户能否在设置界面修改（身份字段不能）
    pub fn is_user_adjustable(&self) -> bool {
        !matches!(self, PreferenceKey::UserId)
    }

    /// 变更后是否需要重新应用到渲染环境
    pub fn affects_environment(&self) -> bool {
        matches!(
            self.category(),
            Some(ChangeCategory::Theme) | Some(ChangeCategory::Locale)
        )
    }
}

impl std::fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// Schema-on-read 合并
// =========================================================

impl PreferenceSet {
    /// 将 JSON 对象合并到当前集合
    ///
    /// 返回实际被应用的键（值可能与原值相同）。
    /// 非对象的输入不应用任何内容。
    pub fn merge_json(&mut self, value: &Value) -> Vec<PreferenceKey> {
        let Some(map) = value.as_object() else {
            return Vec::new();
        };

        let mut applied = Vec::new();
        for (name, raw) in map {
            let Some(key) = PreferenceKey::parse(name) else {
                continue;
            };
            if let Some(pref) = Preference::from_json(key, raw) {
                self.set(pref);
                applied.push(key);
            }
        }
        applied
    }

    /// 从 JSON 字符串构建：默认值 + 合并，格式错误时返回默认值
    pub fn from_json_str(s: &str) -> Self {
        let mut set = Self::default();
        if let Ok(value) = serde_json::from_str::<Value>(s) {
            set.merge_json(&value);
        }
        set
    }

    /// 与另一集合取值不同的键
    pub fn diff(&self, other: &PreferenceSet) -> Vec<PreferenceKey> {
        PreferenceKey::ALL
            .iter()
            .copied()
            .filter(|key| self.get(*key) != other.get(*key))
            .collect()
    }

    // --- 使用处回退的强类型读取 ---

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn locale(&self) -> Locale {
        Locale::resolve(&self.language)
    }

    pub fn currency_config(&self) -> &'static CurrencyConfig {
        CurrencyConfig::resolve(&self.currency)
    }

    pub fn measurement_units(&self) -> MeasurementUnits {
        MeasurementUnits::parse(&self.measurement_units).unwrap_or_default()
    }

    pub fn profile_visibility(&self) -> ProfileVisibility {
        ProfileVisibility::parse(&self.profile_visibility).unwrap_or_default()
    }

    pub fn notification_sound(&self) -> NotificationSound {
        NotificationSound::parse(&self.notification_sound).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for PreferenceSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let mut set = PreferenceSet::default();
        set.merge_json(&value);
        Ok(set)
    }
}

// =========================================================
// 字符串枚举 (String-backed Enums)
// =========================================================

macro_rules! wire_enum {
    ($(#[$doc:meta])* $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )* }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )* ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )*
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $( $wire => Some($name::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

wire_enum!(
    /// 主题
    Theme {
        #[default]
        Light => "light",
        Dark => "dark",
    }
);

wire_enum!(
    /// 计量单位
    MeasurementUnits {
        #[default]
        Metric => "metric",
        Imperial => "imperial",
    }
);

wire_enum!(
    /// 个人资料可见性
    ProfileVisibility {
        #[default]
        Public => "public",
        Private => "private",
        Contacts => "contacts",
    }
);

wire_enum!(
    /// 通知提示音
    NotificationSound {
        #[default]
        Default => "default",
        Chime => "chime",
        Bell => "bell",
        Silent => "none",
    }
);
