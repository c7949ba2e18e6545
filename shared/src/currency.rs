//! 货币配置与价格格式化

/// 单个货币的显示配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConfig {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    /// 千位分隔符
    pub group_separator: char,
    pub decimal_separator: char,
    /// 最多保留的小数位
    pub max_fraction_digits: usize,
}

const CURRENCIES: &[CurrencyConfig] = &[
    CurrencyConfig {
        code: "USD",
        symbol: "$",
        name: "US Dollar",
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 2,
    },
    CurrencyConfig {
        code: "EUR",
        symbol: "€",
        name: "Euro",
        group_separator: '.',
        decimal_separator: ',',
        max_fraction_digits: 2,
    },
    CurrencyConfig {
        code: "GBP",
        symbol: "£",
        name: "British Pound",
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 2,
    },
    CurrencyConfig {
        code: "RWF",
        symbol: "₣",
        name: "Rwandan Franc",
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 0,
    },
    CurrencyConfig {
        code: "KES",
        symbol: "KSh",
        name: "Kenyan Shilling",
        group_separator: ',',
        decimal_separator: '.',
        max_fraction_digits: 2,
    },
];

impl CurrencyConfig {
    pub fn all() -> &'static [CurrencyConfig] {
        CURRENCIES
    }

    pub fn default_config() -> &'static CurrencyConfig {
        &CURRENCIES[0]
    }

    pub fn from_code(code: &str) -> Option<&'static CurrencyConfig> {
        CURRENCIES.iter().find(|c| c.code == code)
    }

    /// 解析货币代码，不支持时回退到默认货币
    pub fn resolve(code: &str) -> &'static CurrencyConfig {
        Self::from_code(code).unwrap_or_else(Self::default_config)
    }

    /// 格式化金额：符号 + 分组后的整数部分 + 去掉末尾零的小数部分
    ///
    /// 非有限值按 0 处理，负数在符号前加 `-`。
    pub fn format_price(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let rendered = format!("{:.*}", self.max_fraction_digits, amount.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i, f.trim_end_matches('0')),
            None => (rendered.as_str(), ""),
        };

        let mut out = String::new();
        // 四舍五入后为 0 的负数不带符号
        if amount < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        out.push_str(self.symbol);
        out.push_str(&group_digits(int_part, self.group_separator));
        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
