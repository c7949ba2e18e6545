//! 语言与翻译字典
//!
//! 每种语言拥有一张静态字符串表。非默认语言缺失的键逐键回退到默认语言（英语），
//! 默认语言也缺失时 `lookup` 返回 `None`，`translate` 返回键本身。

/// 文字方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// 支持的语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
    Rw,
    Sw,
    Ar,
}

impl Locale {
    pub const ALL: &'static [Locale] =
        &[Locale::En, Locale::Fr, Locale::Rw, Locale::Sw, Locale::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Rw => "rw",
            Locale::Sw => "sw",
            Locale::Ar => "ar",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.code() == code)
    }

    /// 解析语言代码，不支持时回退到默认语言
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// 该语言的本地名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Fr => "Français",
            Locale::Rw => "Ikinyarwanda",
            Locale::Sw => "Kiswahili",
            Locale::Ar => "العربية",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::Ar => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    fn bundle(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::En => EN,
            Locale::Fr => FR,
            Locale::Rw => RW,
            Locale::Sw => SW,
            Locale::Ar => AR,
        }
    }

    fn lookup_own(&self, key: &str) -> Option<&'static str> {
        self.bundle()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// 查找翻译，缺失时回退到默认语言
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.lookup_own(key)
            .or_else(|| Locale::default().lookup_own(key))
    }

    /// 翻译，找不到时返回键本身
    pub fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }
}

// =========================================================
// 字符串表
// =========================================================

const EN: &[(&str, &str)] = &[
    ("appName", "AutoFleet Hub"),
    ("home", "Home"),
    ("vehicles", "Vehicles"),
    ("bookings", "Bookings"),
    ("dashboard", "Dashboard"),
    ("settings", "Settings"),
    ("save", "Save"),
    ("cancel", "Cancel"),
    ("search", "Search"),
    ("bookNow", "Book Now"),
    ("pricePerDay", "Price per day"),
    ("logout", "Log out"),
    ("welcome", "Welcome"),
    ("appearance", "Appearance"),
    ("language", "Language"),
    ("currency", "Currency"),
    ("darkMode", "Dark mode"),
    ("timezone", "Timezone"),
    ("measurementUnits", "Measurement units"),
    ("metric", "Metric"),
    ("imperial", "Imperial"),
    ("notifications", "Notifications"),
    ("emailNotifications", "Email notifications"),
    ("pushNotifications", "Push notifications"),
    ("smsNotifications", "SMS notifications"),
    ("bookingReminders", "Booking reminders"),
    ("paymentAlerts", "Payment alerts"),
    ("promotionalEmails", "Promotional emails"),
    ("weeklyReports", "Weekly reports"),
    ("privacy", "Privacy"),
    ("profileVisibility", "Profile visibility"),
    ("dataSharing", "Data sharing"),
    ("locationTracking", "Location tracking"),
    ("analyticsOptOut", "Opt out of analytics"),
    ("security", "Security"),
    ("twoFactorAuth", "Two-factor authentication"),
    ("loginAlerts", "Login alerts"),
    ("sessionTimeout", "Session timeout (minutes)"),
    ("sound", "Sound"),
    ("soundEnabled", "Enable sounds"),
    ("notificationSound", "Notification sound"),
    ("interface", "Interface"),
    ("showNavBar", "Show navigation bar"),
    ("showChatWidget", "Show chat widget"),
    ("pricePreview", "Price preview"),
    ("restoreDefaults", "Restore defaults"),
    ("support", "Support"),
    ("public", "Public"),
    ("private", "Private"),
    ("contacts", "Contacts only"),
    ("default", "Default"),
    ("chime", "Chime"),
    ("bell", "Bell"),
    ("none", "None"),
];

const FR: &[(&str, &str)] = &[
    ("home", "Accueil"),
    ("vehicles", "Véhicules"),
    ("bookings", "Réservations"),
    ("dashboard", "Tableau de bord"),
    ("settings", "Paramètres"),
    ("save", "Enregistrer"),
    ("cancel", "Annuler"),
    ("search", "Rechercher"),
    ("bookNow", "Réserver"),
    ("pricePerDay", "Prix par jour"),
    ("logout", "Se déconnecter"),
    ("welcome", "Bienvenue"),
    ("appearance", "Apparence"),
    ("language", "Langue"),
    ("currency", "Devise"),
    ("darkMode", "Mode sombre"),
    ("timezone", "Fuseau horaire"),
    ("measurementUnits", "Unités de mesure"),
    ("metric", "Métrique"),
    ("imperial", "Impérial"),
    ("notifications", "Notifications"),
    ("emailNotifications", "Notifications par e-mail"),
    ("pushNotifications", "Notifications push"),
    ("smsNotifications", "Notifications SMS"),
    ("bookingReminders", "Rappels de réservation"),
    ("paymentAlerts", "Alertes de paiement"),
    ("promotionalEmails", "E-mails promotionnels"),
    ("weeklyReports", "Rapports hebdomadaires"),
    ("privacy", "Confidentialité"),
    ("profileVisibility", "Visibilité du profil"),
    ("dataSharing", "Partage des données"),
    ("locationTracking", "Suivi de localisation"),
    ("analyticsOptOut", "Refuser les statistiques"),
    ("security", "Sécurité"),
    ("twoFactorAuth", "Authentification à deux facteurs"),
    ("loginAlerts", "Alertes de connexion"),
    ("sessionTimeout", "Expiration de session (minutes)"),
    ("sound", "Son"),
    ("soundEnabled", "Activer les sons"),
    ("notificationSound", "Son de notification"),
    ("interface", "Interface"),
    ("showNavBar", "Afficher la barre de navigation"),
    ("showChatWidget", "Afficher le chat"),
    ("pricePreview", "Aperçu des prix"),
    ("restoreDefaults", "Rétablir les valeurs par défaut"),
    ("support", "Assistance"),
    ("public", "Public"),
    ("private", "Privé"),
    ("contacts", "Contacts uniquement"),
    ("default", "Par défaut"),
    ("chime", "Carillon"),
    ("bell", "Cloche"),
    ("none", "Aucun"),
];

const RW: &[(&str, &str)] = &[
    ("home", "Ahabanza"),
    ("vehicles", "Ibinyabiziga"),
    ("bookings", "Ibyatumijwe"),
    ("settings", "Igenamiterere"),
    ("save", "Bika"),
    ("cancel", "Hagarika"),
    ("search", "Shakisha"),
    ("bookNow", "Fata ubu"),
    ("pricePerDay", "Igiciro ku munsi"),
    ("logout", "Sohoka"),
    ("welcome", "Murakaza neza"),
    ("language", "Ururimi"),
    ("currency", "Ifaranga"),
    ("darkMode", "Uburyo bwijimye"),
    ("notifications", "Imenyesha"),
    ("privacy", "Ibanga"),
    ("security", "Umutekano"),
    ("sound", "Ijwi"),
    ("support", "Ubufasha"),
];

const SW: &[(&str, &str)] = &[
    ("home", "Nyumbani"),
    ("vehicles", "Magari"),
    ("bookings", "Nafasi"),
    ("dashboard", "Dashibodi"),
    ("settings", "Mipangilio"),
    ("save", "Hifadhi"),
    ("cancel", "Ghairi"),
    ("search", "Tafuta"),
    ("bookNow", "Weka nafasi sasa"),
    ("pricePerDay", "Bei kwa siku"),
    ("logout", "Toka"),
    ("welcome", "Karibu"),
    ("appearance", "Mwonekano"),
    ("language", "Lugha"),
    ("currency", "Sarafu"),
    ("darkMode", "Hali ya giza"),
    ("notifications", "Arifa"),
    ("privacy", "Faragha"),
    ("security", "Usalama"),
    ("sound", "Sauti"),
    ("support", "Msaada"),
];

const AR: &[(&str, &str)] = &[
    ("home", "الرئيسية"),
    ("vehicles", "المركبات"),
    ("bookings", "الحجوزات"),
    ("dashboard", "لوحة التحكم"),
    ("settings", "الإعدادات"),
    ("save", "حفظ"),
    ("cancel", "إلغاء"),
    ("search", "بحث"),
    ("bookNow", "احجز الآن"),
    ("pricePerDay", "السعر في اليوم"),
    ("logout", "تسجيل الخروج"),
    ("welcome", "مرحبا"),
    ("appearance", "المظهر"),
    ("language", "اللغة"),
    ("currency", "العملة"),
    ("darkMode", "الوضع الداكن"),
    ("notifications", "الإشعارات"),
    ("privacy", "الخصوصية"),
    ("security", "الأمان"),
    ("sound", "الصوت"),
    ("support", "الدعم"),
];
