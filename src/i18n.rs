// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 规范化语言代码，不支持的语言回退到默认语言
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();
    if lower.starts_with("en") {
        "en"
    } else if lower.starts_with("zh") {
        "zh-CN"
    } else {
        DEFAULT_LOCALE
    }
}

/// 按指定语言翻译
///
/// # 示例
/// ```no_run
/// use plant_maint::i18n::t_in;
/// let label = t_in("en", "status.unset");
/// ```
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按指定语言翻译（带参数）
pub fn t_with_args_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn fill_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result.trim().to_string()
}

/// 数量显示：最多保留两位小数，去掉多余的 0
pub fn format_quantity(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_explicit_locale() {
        assert_eq!(t_in("en", "status.unset"), "Not configured");
        assert_eq!(t_in("zh-CN", "status.unset"), "未配置");

        let msg = t_with_args_in(
            "en",
            "status.overdue",
            &[("overdue", "200"), ("unit", "km")],
        );
        assert_eq!(msg, "Overdue by 200 km");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("zh"), "zh-CN");
        assert_eq!(normalize_locale("fr"), "zh-CN");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(500.0), "500");
        assert_eq!(format_quantity(12.5), "12.5");
        assert_eq!(format_quantity(0.125), "0.13");
        assert_eq!(format_quantity(-0.001), "0");
    }
}
